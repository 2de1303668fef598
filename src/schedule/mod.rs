pub mod types;
pub mod validate;
pub mod state;
pub mod eligibility;
pub mod generator;
pub mod summary;

pub use types::{JobConfig, Person, ShiftOutcome};
pub use validate::validate_inputs;
pub use generator::generate_shift;
