use super::state::SchedulingState;
use super::types::Person;

/// Position of a time slot within the day
#[derive(Debug, Clone, Copy)]
pub struct SlotRef<'a> {
    pub id: &'a str,
    pub index: usize,
}

/// True if taking `slot_idx` would give three assigned slots in a row
pub fn would_break_consecutive(assigned_slots: &[usize], slot_idx: usize) -> bool {
    if slot_idx < 2 {
        return false;
    }
    assigned_slots.contains(&(slot_idx - 1)) && assigned_slots.contains(&(slot_idx - 2))
}

/// Available, not yet booked in this slot, and no third consecutive slot
pub fn is_eligible(person: &Person, slot: SlotRef<'_>, state: &SchedulingState) -> bool {
    person.is_available(slot.id)
        && !state.is_assigned_in(slot.index, &person.name)
        && !would_break_consecutive(state.assigned_slots(&person.name), slot.index)
}

/// Eligible people matching `tier`, in roster order
pub fn eligible_candidates<'p, F>(
    people: &'p [Person],
    slot: SlotRef<'_>,
    state: &SchedulingState,
    tier: F,
) -> Vec<&'p Person>
where
    F: Fn(&Person) -> bool,
{
    people
        .iter()
        .filter(|p| is_eligible(p, slot, state) && tier(p))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::state::Pick;

    #[test]
    fn test_consecutive_rule() {
        assert!(!would_break_consecutive(&[], 5));
        assert!(!would_break_consecutive(&[0, 1], 1));
        assert!(would_break_consecutive(&[0, 1], 2));
        assert!(!would_break_consecutive(&[0, 2], 3));
        assert!(would_break_consecutive(&[0, 3, 4], 5));
    }

    #[test]
    fn test_filters_unavailable_booked_and_tired_people() {
        let slots = ["a-1", "b-2", "c-3"];
        let people = vec![
            Person::new("Aki", 2, "").available_at(slots),
            Person::new("Ben", 2, "").available_at(["a-1", "b-2"]),
            Person::new("Cho", 3, "").available_at(slots),
            Person::new("Dee", 4, "").available_at(slots),
        ];
        let mut state = SchedulingState::new(&people);
        let aki = Pick { name: "Aki".to_string(), grade: 2, tier_counted: false };
        let dee = Pick { name: "Dee".to_string(), grade: 4, tier_counted: false };
        state.commit(0, &[aki.clone()]);
        state.commit(1, &[aki]);
        state.commit(2, &[dee]);

        let slot = SlotRef { id: "c-3", index: 2 };
        let names: Vec<&str> = eligible_candidates(&people, slot, &state, |_| true)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Cho"]);

        let none = eligible_candidates(&people, slot, &state, |p| p.grade == 4);
        assert!(none.is_empty());
    }
}
