//! Normalized calendar event records.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

/// Component kind of a parsed calendar entry.
///
/// Only events participate in availability computation; everything else
/// (todos, journals, free-busy) is carried as `Other` and ignored downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Event,
    Other,
}

impl ComponentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Event => "VEVENT",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a record recurs, if at all.
///
/// Primary calendars describe recurrence with an RFC 5545 rule string; plan
/// calendars deliver explicit per-occurrence overrides keyed by the original
/// occurrence instant. Both representations funnel through one materializer
/// dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RecurrenceSpec {
    /// RFC 5545 RRULE text, e.g. `FREQ=WEEKLY;BYDAY=MO`.
    Rule(String),
    /// Overridden occurrences, keyed by the occurrence instant they replace.
    Overrides(BTreeMap<DateTime<Utc>, EventRecord>),
    #[default]
    None,
}

impl RecurrenceSpec {
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One calendar component as delivered by the source, immutable once parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub uid: String,
    pub kind: ComponentKind,
    pub summary: Option<String>,
    /// Start instant in UTC.
    pub start: DateTime<Utc>,
    /// End instant in UTC.
    pub end: DateTime<Utc>,
    pub recurrence: RecurrenceSpec,
}

impl EventRecord {
    /// Template duration, applied to every materialized occurrence.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }
}

/// Mapping of component id to event record for one fetched calendar.
///
/// Ordered so that materialization output is deterministic across runs.
pub type EventMap = BTreeMap<String, EventRecord>;
