//! Derived scheduling types handed to the booking UI.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

use crate::error::SchedError;

/// One concrete, dated occurrence ready for display and filtering.
///
/// Immutable value type; recomputed wholesale when source data changes.
/// Invariant: `start < end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Unique within a materialization batch: the event uid, or
    /// `uid/<occurrence instant>` for recurring and overridden occurrences.
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: Option<String>,
}

impl Block {
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }

    /// Occurrence id for one instance of a recurring or overridden series.
    #[must_use]
    pub fn occurrence_id(uid: &str, instant: DateTime<Utc>) -> String {
        format!("{uid}/{}", instant.to_rfc3339())
    }
}

/// One tile of the fixed-length display day sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntry {
    /// Local calendar day (in the configured display timezone).
    pub date: NaiveDate,
    /// "Today", "Tmrw", or a three-letter weekday name.
    pub label: String,
}

/// Classification bucket for free blocks.
///
/// A closed set: the booking UI offers exactly these five checkboxes, and
/// the rule table is a data-independent constant (see [`Topic::matches`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Lunch,
    Dinner,
    Work,
    Afternoon,
    Evening,
}

impl Topic {
    pub const ALL: [Self; 5] = [
        Self::Lunch,
        Self::Dinner,
        Self::Work,
        Self::Afternoon,
        Self::Evening,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Work => "work",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|topic| topic.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SchedError::UnknownTopic(s.to_string()))
    }
}

/// Output of one full availability computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Free blocks after plan subtraction and topic filtering, in
    /// materialization order.
    pub blocks: Vec<Block>,
    /// The full display day sequence (`weeks * 7` entries).
    pub days: Vec<DayEntry>,
    /// Days with at least one free block, before topic filtering.
    pub enabled_days: Vec<DayEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn occurrence_id_disambiguates_siblings() {
        let first = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2026, 3, 3, 9, 0, 0).unwrap();
        assert_ne!(
            Block::occurrence_id("standup", first),
            Block::occurrence_id("standup", second)
        );
    }

    #[test]
    fn topic_round_trips_through_from_str() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
        assert!("brunch".parse::<Topic>().is_err());
    }
}
