use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

use crate::schedule::{validate_inputs, JobConfig, Person};

/// Header character that marks a time-slot column, e.g. "09-10"
pub const TIME_SLOT_SEPARATOR: char = '-';

#[derive(Debug)]
pub enum RosterError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingNameColumn,
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterError::Io(e) => write!(f, "could not read roster: {}", e),
            RosterError::Csv(e) => write!(f, "could not parse roster: {}", e),
            RosterError::MissingNameColumn => write!(f, "roster has no name column"),
        }
    }
}

impl std::error::Error for RosterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterError::Io(e) => Some(e),
            RosterError::Csv(e) => Some(e),
            RosterError::MissingNameColumn => None,
        }
    }
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::Io(err)
    }
}

impl From<csv::Error> for RosterError {
    fn from(err: csv::Error) -> Self {
        RosterError::Csv(err)
    }
}

/// People plus the time slots found in the header, in column order
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub people: Vec<Person>,
    pub time_slots: Vec<String>,
}

/// Parses an availability mark. Accepts the circle marks used in paper rosters.
fn parse_available(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    matches!(lower.as_str(), "〇" | "○" | "o" | "yes" | "true" | "1")
}

/// Parses a grade, returning 0 if empty or invalid
fn parse_grade(value: &str) -> u8 {
    value.trim().parse().unwrap_or(0)
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim().to_lowercase();
        names.iter().any(|n| h == *n)
    })
}

/// Time-slot columns in header order. A repeated header gets a `.1`, `.2`,
/// ... suffix so every slot keeps its own key.
fn time_slot_columns(headers: &csv::StringRecord) -> Vec<(usize, String)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cols = Vec::new();

    for (i, h) in headers.iter().enumerate() {
        if !h.contains(TIME_SLOT_SEPARATOR) {
            continue;
        }
        let base = h.trim();
        let mut label = base.to_string();
        let mut n = 1;
        while seen.contains(&label) {
            label = format!("{}.{}", base, n);
            n += 1;
        }
        if label != base {
            warn!(header = %base, renamed = %label, "duplicate time-slot column");
        }
        seen.insert(label.clone());
        cols.push((i, label));
    }

    cols
}

/// Loads a roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(csv_path: P) -> Result<Roster, RosterError> {
    let file = std::fs::File::open(csv_path)?;
    load_roster_from_reader(file)
}

/// Loads a roster from any CSV source.
///
/// A later row with the same name replaces the earlier one in place, so
/// names stay unique and the first row fixes the person's position.
pub fn load_roster_from_reader<R: Read>(source: R) -> Result<Roster, RosterError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(source);
    let headers = reader.headers()?.clone();

    let name_col = find_column(&headers, &["name", "名前"]).ok_or(RosterError::MissingNameColumn)?;
    let grade_col = find_column(&headers, &["grade", "学年"]);
    let group_col = find_column(&headers, &["group", "committee", "所属委員会"]);

    let time_cols = time_slot_columns(&headers);

    let mut people: Vec<Person> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for result in reader.records() {
        let record = result?;

        let name = record.get(name_col).unwrap_or("").trim().to_string();
        if name.is_empty() {
            continue;
        }

        let grade = grade_col.map(|c| parse_grade(record.get(c).unwrap_or(""))).unwrap_or(0);
        let group = group_col
            .map(|c| record.get(c).unwrap_or("").trim().to_string())
            .unwrap_or_default();
        let availability = time_cols
            .iter()
            .map(|(c, slot)| (slot.clone(), parse_available(record.get(*c).unwrap_or(""))))
            .collect();

        let person = Person { name: name.clone(), grade, group, availability };

        if let Some(&idx) = index_by_name.get(&name) {
            warn!(name = %name, "duplicate roster row, keeping the later one");
            people[idx] = person;
        } else {
            index_by_name.insert(name, people.len());
            people.push(person);
        }
    }

    debug!(people = people.len(), time_slots = time_cols.len(), "roster loaded");

    Ok(Roster {
        people,
        time_slots: time_cols.into_iter().map(|(_, slot)| slot).collect(),
    })
}

/// Parses a job list such as "Gate:2, Reception:1".
/// Blank names are skipped; a missing or invalid count becomes 0.
pub fn parse_jobs(spec: &str) -> Vec<JobConfig> {
    spec.split(',')
        .filter_map(|part| {
            let mut pieces = part.splitn(2, ':');
            let name = pieces.next().unwrap_or("").trim();
            if name.is_empty() {
                return None;
            }
            let required = pieces.next().and_then(|r| r.trim().parse().ok()).unwrap_or(0);
            Some(JobConfig::new(name, required))
        })
        .collect()
}

/// Names declared more than once, each reported once in first-repeat order
pub fn duplicate_job_names(jobs: &[JobConfig]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dups: Vec<String> = Vec::new();
    for job in jobs {
        if !seen.insert(job.name.as_str()) && !dups.contains(&job.name) {
            dups.push(job.name.clone());
        }
    }
    dups
}

/// Everything wrong with a job list before scheduling: the validator's
/// messages, then any job name declared twice
pub fn input_errors(jobs: &[JobConfig], time_slots: &[String]) -> Vec<String> {
    let mut errors: Vec<String> = validate_inputs(jobs, time_slots).iter().map(|e| e.to_string()).collect();
    for name in duplicate_job_names(jobs) {
        errors.push(format!("{}: job name is declared more than once", name));
    }
    errors
}
