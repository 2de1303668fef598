use std::collections::HashMap;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Grade of the supervisory tier. Exactly one is placed per job per slot.
pub const SUPERVISORY_GRADE: u8 = 4;

/// Grades that share the tier load balancing.
pub const CORE_GRADES: std::ops::RangeInclusive<u8> = 1..=3;

pub fn is_core_grade(grade: u8) -> bool {
    CORE_GRADES.contains(&grade)
}

/// A person from the availability roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub grade: u8,
    pub group: String, // informational only
    pub availability: HashMap<String, bool>, // time slot -> available
}

impl Person {
    pub fn new(name: impl Into<String>, grade: u8, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grade,
            group: group.into(),
            availability: HashMap::new(),
        }
    }

    /// Marks the person available for every given slot
    pub fn available_at<I, S>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for slot in slots {
            self.availability.insert(slot.into(), true);
        }
        self
    }

    pub fn is_available(&self, time_slot: &str) -> bool {
        self.availability.get(time_slot).copied().unwrap_or(false)
    }
}

/// A job that needs `required` people at every time slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub required: i32,
}

impl JobConfig {
    pub fn new(name: impl Into<String>, required: i32) -> Self {
        Self { name: name.into(), required }
    }

    /// True while `filled` people are fewer than the required headcount.
    /// A non-positive requirement is always satisfied.
    pub fn is_short(&self, filled: usize) -> bool {
        (filled as i64) < i64::from(self.required)
    }
}

/// time slot -> job name -> assigned names, in pick order
pub type ShiftTable = HashMap<String, HashMap<String, Vec<String>>>;

/// A staffing constraint that could not be met. Never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaffingWarning {
    NoSupervisor {
        time_slot: String,
        job: String,
    },
    Understaffed {
        time_slot: String,
        job: String,
        required: i32,
        assigned: usize,
    },
}

impl fmt::Display for StaffingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffingWarning::NoSupervisor { time_slot, job } => {
                write!(f, "{} / {}: could not secure a supervisory-tier person", time_slot, job)
            }
            StaffingWarning::Understaffed { time_slot, job, required, .. } => {
                write!(f, "{} / {}: required headcount ({}) could not be met", time_slot, job, required)
            }
        }
    }
}

/// Result of one scheduling run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShiftOutcome {
    pub time_slots: Vec<String>,
    pub jobs: Vec<String>,
    pub assignments: ShiftTable,
    pub warnings: Vec<StaffingWarning>,
}

impl ShiftOutcome {
    /// People assigned to `job` at `time_slot`, empty when unknown
    pub fn assigned(&self, time_slot: &str, job: &str) -> &[String] {
        self.assignments
            .get(time_slot)
            .and_then(|jobs| jobs.get(job))
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// Job held by `name` at `time_slot`, if any
    pub fn job_of(&self, time_slot: &str, name: &str) -> Option<&str> {
        let by_job = self.assignments.get(time_slot)?;
        self.jobs
            .iter()
            .find(|job| by_job.get(*job).map(|names| names.iter().any(|n| n == name)).unwrap_or(false))
            .map(|job| job.as_str())
    }

    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}
