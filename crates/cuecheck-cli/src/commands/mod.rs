//! Command implementations.

pub mod aggregate;
pub mod score;
pub mod validate;

pub use self::aggregate::{execute_aggregate, run_aggregate};
pub use self::score::{execute_score, run_score, ScoreOutcome, RECORDS_FILE, REPORT_FILE};
pub use self::validate::{execute_validate, run_validate, ValidateOutcome};
