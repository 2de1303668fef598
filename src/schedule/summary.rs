use std::collections::BTreeMap;
use serde::Serialize;
use super::types::{is_core_grade, Person, ShiftOutcome, SUPERVISORY_GRADE};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    pub time_slot: String,
    pub available: u32,
    pub supervisory: u32,
    pub core: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonLoad {
    pub name: String,
    pub grade: u8,
    pub group: String,
    pub shifts: u32,
}

/// Counts who can work each slot, split by tier
pub fn slot_availability(people: &[Person], time_slots: &[String]) -> Vec<SlotAvailability> {
    time_slots
        .iter()
        .map(|slot| {
            let mut stats = SlotAvailability {
                time_slot: slot.clone(),
                available: 0,
                supervisory: 0,
                core: 0,
            };
            for person in people.iter().filter(|p| p.is_available(slot)) {
                stats.available += 1;
                if person.grade == SUPERVISORY_GRADE {
                    stats.supervisory += 1;
                } else if is_core_grade(person.grade) {
                    stats.core += 1;
                }
            }
            stats
        })
        .collect()
}

/// Roster headcount per group label
pub fn group_headcount(people: &[Person]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for person in people {
        *counts.entry(person.group.clone()).or_insert(0) += 1;
    }
    counts
}

/// Number of slots each person works in `outcome`, in roster order
pub fn person_load(people: &[Person], outcome: &ShiftOutcome) -> Vec<PersonLoad> {
    people
        .iter()
        .map(|person| PersonLoad {
            name: person.name.clone(),
            grade: person.grade,
            group: person.group.clone(),
            shifts: outcome
                .time_slots
                .iter()
                .filter(|slot| outcome.job_of(slot, &person.name).is_some())
                .count() as u32,
        })
        .collect()
}
