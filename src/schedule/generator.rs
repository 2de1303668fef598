use std::cmp::Ordering;
use tracing::{debug, info, warn};
use super::eligibility::{eligible_candidates, SlotRef};
use super::state::{Pick, SchedulingState};
use super::types::{
    is_core_grade, JobConfig, Person, ShiftOutcome, ShiftTable, StaffingWarning, SUPERVISORY_GRADE,
};

/// Builds the shift table for every (time slot, job) pair.
///
/// Slots are processed in the given order and jobs in declaration order
/// within each slot. Each slot+job decision is final once committed; the
/// greedy pass never revisits it. Understaffing is reported through
/// `warnings` and never stops the run.
pub fn generate_shift(people: &[Person], jobs: &[JobConfig], time_slots: &[String]) -> ShiftOutcome {
    let mut state = SchedulingState::new(people);
    generate_shift_with_state(&mut state, people, jobs, time_slots)
}

/// Same as [`generate_shift`] but threads a caller-owned state
pub fn generate_shift_with_state(
    state: &mut SchedulingState,
    people: &[Person],
    jobs: &[JobConfig],
    time_slots: &[String],
) -> ShiftOutcome {
    info!(
        people = people.len(),
        jobs = jobs.len(),
        time_slots = time_slots.len(),
        "generating shift"
    );

    let mut assignments = ShiftTable::new();
    let mut warnings = Vec::new();

    for (index, time_slot) in time_slots.iter().enumerate() {
        let slot = SlotRef { id: time_slot, index };
        let by_job = assignments.entry(time_slot.clone()).or_default();

        for job in jobs {
            let picks = staff_job(people, job, slot, state, &mut warnings);
            state.commit(index, &picks);
            by_job.insert(job.name.clone(), picks.into_iter().map(|p| p.name).collect());
        }
    }

    info!(warnings = warnings.len(), "shift generated");

    ShiftOutcome {
        time_slots: time_slots.to_vec(),
        jobs: jobs.iter().map(|j| j.name.clone()).collect(),
        assignments,
        warnings,
    }
}

/// Personal load first, then name
fn load_rank<'p>(state: &SchedulingState, person: &'p Person) -> (u32, &'p str) {
    (state.total_assigned(&person.name), person.name.as_str())
}

/// Tier load, then personal load, then name
fn core_rank<'p>(state: &SchedulingState, person: &'p Person) -> (u32, u32, &'p str) {
    (
        state.grade_assigned(person.grade),
        state.total_assigned(&person.name),
        person.name.as_str(),
    )
}

fn by_load(state: &SchedulingState, a: &Person, b: &Person) -> Ordering {
    load_rank(state, a).cmp(&load_rank(state, b))
}

/// Runs the supervisory, core-tier and fallback passes for one slot+job
fn staff_job(
    people: &[Person],
    job: &JobConfig,
    slot: SlotRef<'_>,
    state: &mut SchedulingState,
    warnings: &mut Vec<StaffingWarning>,
) -> Vec<Pick> {
    let mut picks: Vec<Pick> = Vec::new();

    let supervisor = eligible_candidates(people, slot, state, |p| p.grade == SUPERVISORY_GRADE)
        .into_iter()
        .min_by(|a, b| by_load(state, a, b));

    match supervisor {
        Some(person) => {
            debug!(time_slot = slot.id, job = %job.name, name = %person.name, "supervisory pick");
            picks.push(Pick {
                name: person.name.clone(),
                grade: person.grade,
                tier_counted: false,
            });
        }
        None => {
            let warning = StaffingWarning::NoSupervisor {
                time_slot: slot.id.to_string(),
                job: job.name.clone(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    // Re-rank before every pick so the tier count of the previous pick applies
    let mut core = eligible_candidates(people, slot, state, |p| is_core_grade(p.grade));
    while job.is_short(picks.len()) && !core.is_empty() {
        core.sort_by(|a, b| core_rank(state, a).cmp(&core_rank(state, b)));
        let person = core.remove(0);
        let tier_counted = state.count_tier_pick(person.grade);
        debug!(time_slot = slot.id, job = %job.name, name = %person.name, grade = person.grade, "core pick");
        picks.push(Pick {
            name: person.name.clone(),
            grade: person.grade,
            tier_counted,
        });
    }

    if job.is_short(picks.len()) {
        let mut fallback = eligible_candidates(people, slot, state, |_| true);
        fallback.sort_by(|a, b| by_load(state, a, b));

        for person in fallback {
            if !job.is_short(picks.len()) {
                break;
            }
            // This job's picks are not booked until commit
            if picks.iter().any(|p| p.name == person.name) {
                continue;
            }
            debug!(time_slot = slot.id, job = %job.name, name = %person.name, "fallback pick");
            picks.push(Pick {
                name: person.name.clone(),
                grade: person.grade,
                tier_counted: false,
            });
        }

        if job.is_short(picks.len()) {
            let warning = StaffingWarning::Understaffed {
                time_slot: slot.id.to_string(),
                job: job.name.clone(),
                required: job.required,
                assigned: picks.len(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }
    }

    picks
}
