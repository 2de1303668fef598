use std::collections::{HashMap, HashSet};
use super::types::{is_core_grade, Person, CORE_GRADES};

/// A person picked for one slot+job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pick {
    pub name: String,
    pub grade: u8,
    /// The grade tier count was already bumped when the pick was made
    pub tier_counted: bool,
}

/// Counters and histories for a single scheduling run.
///
/// Owned by the caller and threaded through every slot+job step. Counts only
/// grow; nothing is ever rolled back.
#[derive(Debug, Clone, Default)]
pub struct SchedulingState {
    total_assigned: HashMap<String, u32>,
    assigned_slots: HashMap<String, Vec<usize>>,
    grade_assigned: HashMap<u8, u32>,
    assigned_by_slot: HashMap<usize, HashSet<String>>,
}

impl SchedulingState {
    pub fn new(people: &[Person]) -> Self {
        let mut state = Self::default();
        for person in people {
            state.total_assigned.insert(person.name.clone(), 0);
            state.assigned_slots.insert(person.name.clone(), Vec::new());
        }
        for grade in CORE_GRADES {
            state.grade_assigned.insert(grade, 0);
        }
        state
    }

    pub fn total_assigned(&self, name: &str) -> u32 {
        self.total_assigned.get(name).copied().unwrap_or(0)
    }

    pub fn grade_assigned(&self, grade: u8) -> u32 {
        self.grade_assigned.get(&grade).copied().unwrap_or(0)
    }

    pub fn assigned_slots(&self, name: &str) -> &[usize] {
        self.assigned_slots.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn is_assigned_in(&self, slot_idx: usize, name: &str) -> bool {
        self.assigned_by_slot
            .get(&slot_idx)
            .map(|names| names.contains(name))
            .unwrap_or(false)
    }

    /// Bumps the tier count as soon as a core-tier person is picked, so the
    /// next pick in the same pass sees it.
    pub fn count_tier_pick(&mut self, grade: u8) -> bool {
        if !is_core_grade(grade) {
            return false;
        }
        *self.grade_assigned.entry(grade).or_insert(0) += 1;
        true
    }

    /// Finalizes the picks for one slot+job
    pub fn commit(&mut self, slot_idx: usize, picks: &[Pick]) {
        let booked = self.assigned_by_slot.entry(slot_idx).or_default();
        for pick in picks {
            booked.insert(pick.name.clone());
        }

        for pick in picks {
            self.assigned_slots.entry(pick.name.clone()).or_default().push(slot_idx);
            *self.total_assigned.entry(pick.name.clone()).or_insert(0) += 1;
            if !pick.tier_counted && is_core_grade(pick.grade) {
                *self.grade_assigned.entry(pick.grade).or_insert(0) += 1;
            }
        }
    }
}
