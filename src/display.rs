use std::fs::File;
use std::io::{self, Write};
use chrono::{DateTime, Local};
use crate::schedule::ShiftOutcome;

/// Formats the people of one job, e.g. "Sato, Aki"
pub fn format_names(names: &[String]) -> String {
    if names.is_empty() {
        "[EMPTY]".to_string()
    } else {
        names.join(", ")
    }
}

/// Renders the table slot by slot, jobs in declaration order, then warnings
pub fn render_shift_table<W: Write>(
    out: &mut W,
    title: &str,
    outcome: &ShiftOutcome,
    generated_at: DateTime<Local>,
) -> io::Result<()> {
    writeln!(out, "** {} **", title)?;
    writeln!(out, "Generated {}", generated_at.format("%Y-%m-%d %H:%M"))?;

    for slot in &outcome.time_slots {
        writeln!(out, "{}", slot)?;
        for job in &outcome.jobs {
            writeln!(out, "  {}: {}", job, format_names(outcome.assigned(slot, job)))?;
        }
    }

    if !outcome.warnings.is_empty() {
        writeln!(out, "Warnings ({}):", outcome.warnings.len())?;
        for warning in &outcome.warnings {
            writeln!(out, "  - {}", warning)?;
        }
    }

    Ok(())
}

/// Writes the shift table to a text file
pub fn write_shift_table_to_file(
    title: &str,
    outcome: &ShiftOutcome,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    render_shift_table(&mut file, title, outcome, Local::now())?;
    Ok(())
}

/// Prints the shift table in a readable format
pub fn print_shift_table(title: &str, outcome: &ShiftOutcome) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    render_shift_table(&mut lock, title, outcome, Local::now())
}
