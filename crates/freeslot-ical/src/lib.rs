//! Calendar source adapter: raw iCalendar text into normalized event records.
//!
//! Only the fields the availability pipeline consumes survive parsing: uid,
//! component kind, summary, start, end, and the recurrence description
//! (rule string or explicit occurrence overrides).

pub mod event;
pub mod parse;

pub use event::{ComponentKind, EventMap, EventRecord, RecurrenceSpec};
pub use parse::parse_events;
