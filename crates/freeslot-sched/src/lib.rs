//! Availability computation: recurring-event expansion, plan subtraction,
//! topic classification, and the 21-day display index.
//!
//! The single entry point is [`schedule::compute_schedule`], a pure function
//! of the fetched event maps and an explicit `now`. Callers re-invoke it
//! when source data changes; nothing in this crate holds state.

pub mod day;
pub mod error;
pub mod filter;
pub mod materialize;
pub mod model;
pub mod recurrence;
pub mod schedule;
pub mod topic;

pub use error::{SchedError, SchedResult};
pub use materialize::MaterializeOptions;
pub use model::{Block, DayEntry, Schedule, Topic};
pub use recurrence::Horizon;
pub use schedule::compute_schedule;
