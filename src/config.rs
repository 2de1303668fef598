use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ROSTER: &str = "namesheet.csv";
pub const DEFAULT_JOBS: &str = "Gate:2";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort(value) => write!(f, "invalid port: {}", value),
        }
    }
}

impl std::error::Error for ConfigError {}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppConfig {
    /// `shift-maker web [port]`
    Web { port: u16, roster: PathBuf },
    /// `shift-maker [roster.csv] [jobs]`
    Run { roster: PathBuf, jobs: String },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Positional arguments win over `SHIFT_*` variables, which win over defaults
    pub fn resolve<F>(args: &[String], env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let roster_default = || {
            env("SHIFT_ROSTER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROSTER))
        };

        if args.first().map(|a| a == "web").unwrap_or(false) {
            let port = match args.get(1).cloned().or_else(|| env("SHIFT_PORT")) {
                Some(value) => value
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort(value.clone()))?,
                None => DEFAULT_PORT,
            };
            return Ok(AppConfig::Web { port, roster: roster_default() });
        }

        let roster = args.first().map(PathBuf::from).unwrap_or_else(roster_default);
        let jobs = args
            .get(1)
            .cloned()
            .or_else(|| env("SHIFT_JOBS"))
            .unwrap_or_else(|| DEFAULT_JOBS.to_string());

        Ok(AppConfig::Run { roster, jobs })
    }
}
