//! Resume state for interrupted or partially failed runs.
//!
//! Failures from one run are written to a plain-text log next to the
//! downloads and fed back into the next run's work list, so a rerun picks up
//! where the last one left off without operator intervention.

pub mod error;
pub mod failure_log;
pub mod types;

pub use error::StateError;
pub use failure_log::FailureLog;
pub use types::WorkItem;
