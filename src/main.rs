mod config;
mod display;
mod export;
mod parser;
mod schedule;
mod web;

use std::fmt;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::AppConfig;
use display::{print_shift_table, write_shift_table_to_file};
use export::export_person_csv;
use parser::{input_errors, load_roster, parse_jobs, Roster};
use schedule::{generate_shift, JobConfig};

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Job list or roster that cannot be scheduled; one message per problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInput(pub Vec<String>);

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for InvalidInput {}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    enable_tracing();

    match AppConfig::from_env()? {
        AppConfig::Web { port, roster } => {
            println!("Access the site at http://localhost:{}", port);
            web::start_server(port, &roster).await?;
        }
        AppConfig::Run { roster, jobs } => {
            if let Err(e) = run_once(&roster, &jobs) {
                error!("{}", e);
                eprintln!("error: {}", e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Rejects input the scheduler must not run on
fn check_input(roster: &Roster, jobs: &[JobConfig]) -> Result<(), InvalidInput> {
    let errors = input_errors(jobs, &roster.time_slots);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(InvalidInput(errors))
    }
}

/// CLI mode: one roster, one job list, results to stdout and files
fn run_once(roster_path: &Path, jobs_spec: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %roster_path.display(), "loading roster");
    let roster = load_roster(roster_path)?;
    let jobs = parse_jobs(jobs_spec);

    check_input(&roster, &jobs)?;

    let outcome = generate_shift(&roster.people, &jobs, &roster.time_slots);

    print_shift_table("Shift", &outcome)?;

    write_shift_table_to_file("Shift", &outcome, "shift_output.txt")?;
    export_person_csv(Path::new("shift_output.csv"), &roster.people, &outcome)?;
    println!("Shift saved to:");
    println!("  - shift_output.txt");
    println!("  - shift_output.csv");

    Ok(())
}
