//! Writes against the interview service: create, cancel, feedback.
//!
//! All local checks run before any request is made.

pub mod flow;
pub mod form;

pub use flow::{CancelOutcome, ScheduleOutcome, SchedulingError};
pub use form::ScheduleForm;
