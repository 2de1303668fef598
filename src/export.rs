use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;
use crate::schedule::{Person, ShiftOutcome};

/// Writes one row per person: name, grade, group, then the job held in each
/// time slot (empty when off duty)
pub fn write_person_csv<W: Write>(
    out: W,
    people: &[Person],
    outcome: &ShiftOutcome,
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new().from_writer(out);

    let mut header = vec!["name".to_string(), "grade".to_string(), "group".to_string()];
    header.extend(outcome.time_slots.iter().cloned());
    wtr.write_record(&header)?;

    for person in people {
        let mut row = vec![person.name.clone(), person.grade.to_string(), person.group.clone()];
        for slot in &outcome.time_slots {
            row.push(outcome.job_of(slot, &person.name).unwrap_or("").to_string());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders the per-person CSV into memory, for downloads
pub fn person_csv_bytes(people: &[Person], outcome: &ShiftOutcome) -> Result<Vec<u8>, csv::Error> {
    let mut buf = Vec::new();
    write_person_csv(&mut buf, people, outcome)?;
    Ok(buf)
}

/// Writes the per-person CSV to a file
pub fn export_person_csv(
    csv_path: &Path,
    people: &[Person],
    outcome: &ShiftOutcome,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(csv_path)?;
    write_person_csv(file, people, outcome)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{generate_shift, JobConfig};

    #[test]
    fn test_rows_name_the_job_per_slot() {
        let slots = vec!["09-10".to_string(), "10-11".to_string()];
        let people = vec![
            Person::new("Sato", 4, "Events").available_at(slots.clone()),
            Person::new("Aki", 1, "Press").available_at(["10-11"]),
        ];
        let outcome = generate_shift(
            &people,
            &[JobConfig::new("Gate", 1), JobConfig::new("Desk", 1)],
            &slots,
        );

        let text = String::from_utf8(person_csv_bytes(&people, &outcome).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "name,grade,group,09-10,10-11");
        assert_eq!(lines[1], "Sato,4,Events,Gate,Gate");
        assert_eq!(lines[2], "Aki,1,Press,,Desk");
    }
}
