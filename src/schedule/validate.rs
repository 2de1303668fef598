use std::fmt;
use serde::Serialize;
use super::types::JobConfig;

/// A configuration problem that stops scheduling before it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    NoJobs,
    BlankJobName,
    NonPositiveRequired { job: String },
    NoTimeSlots,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoJobs => write!(f, "no jobs were specified"),
            ValidationError::BlankJobName => write!(f, "a job name is empty"),
            ValidationError::NonPositiveRequired { job } => {
                let label = if job.is_empty() { "job" } else { job.as_str() };
                write!(f, "{}: required headcount must be at least 1", label)
            }
            ValidationError::NoTimeSlots => write!(
                f,
                "no time slots were found; time-slot column headers must contain '-'"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks jobs and time slots before scheduling.
/// Returns every problem found; an empty list means the input is usable.
pub fn validate_inputs(jobs: &[JobConfig], time_slots: &[String]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if jobs.is_empty() {
        errors.push(ValidationError::NoJobs);
    }

    for job in jobs {
        if job.name.is_empty() {
            errors.push(ValidationError::BlankJobName);
        }
        if job.required <= 0 {
            errors.push(ValidationError::NonPositiveRequired { job: job.name.clone() });
        }
    }

    if time_slots.is_empty() {
        errors.push(ValidationError::NoTimeSlots);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_jobs() {
        let errors = validate_inputs(&[], &slots(&["09-10"]));
        assert_eq!(errors, vec![ValidationError::NoJobs]);
        assert!(errors[0].to_string().contains("no jobs"));
    }

    #[test]
    fn test_zero_required() {
        let errors = validate_inputs(&[JobConfig::new("Gate", 0)], &slots(&["09-10"]));
        assert_eq!(errors, vec![ValidationError::NonPositiveRequired { job: "Gate".to_string() }]);
        assert!(errors[0].to_string().contains("required headcount"));
    }

    #[test]
    fn test_no_time_slots() {
        let errors = validate_inputs(&[JobConfig::new("Gate", 1)], &[]);
        assert_eq!(errors, vec![ValidationError::NoTimeSlots]);
        assert!(errors[0].to_string().contains("no time slots"));
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_inputs(&[JobConfig::new("Gate", 2)], &slots(&["09-10"])).is_empty());
    }

    #[test]
    fn test_blank_name_with_bad_count_reports_both_in_order() {
        let errors = validate_inputs(&[JobConfig::new("", -1)], &[]);
        assert_eq!(
            errors,
            vec![
                ValidationError::BlankJobName,
                ValidationError::NonPositiveRequired { job: String::new() },
                ValidationError::NoTimeSlots,
            ]
        );
        assert_eq!(errors[1].to_string(), "job: required headcount must be at least 1");
    }

    #[test]
    fn test_whitespace_name_is_not_empty() {
        // Adapters trim names before they get here
        assert!(validate_inputs(&[JobConfig::new(" ", 1)], &slots(&["09-10"])).is_empty());
    }
}
