//! Topic classification of free blocks.
//!
//! The rule table is part of the external contract and must not drift:
//! summary substrings for lunch/dinner/work, local start hour for the
//! time-of-day buckets.

use std::collections::BTreeSet;

use chrono::Timelike;

use freeslot_core::constants::{AFTERNOON_START_HOUR, EVENING_START_HOUR, WORK_LATEST_HOUR};

use crate::model::{Block, Topic};

impl Topic {
    /// Whether this topic's rule matches a block, evaluated against the
    /// block's local wall-clock hour at its start instant.
    #[must_use]
    pub fn matches(self, block: &Block, tz: chrono_tz::Tz) -> bool {
        let hour = block.start.with_timezone(&tz).hour();
        let summary = block.summary.as_deref().unwrap_or_default();
        match self {
            Self::Lunch => summary.contains("Lunch"),
            Self::Dinner => summary.contains("Dinner"),
            Self::Work => summary.contains("Work") && hour < WORK_LATEST_HOUR,
            Self::Afternoon => (AFTERNOON_START_HOUR..EVENING_START_HOUR).contains(&hour),
            Self::Evening => hour >= EVENING_START_HOUR,
        }
    }
}

/// ## Summary
/// Keeps blocks matching at least one selected topic (logical OR).
///
/// An empty selection passes every block through unchanged, same order.
#[must_use]
pub fn filter_topics(blocks: Vec<Block>, selected: &BTreeSet<Topic>, tz: chrono_tz::Tz) -> Vec<Block> {
    if selected.is_empty() {
        return blocks;
    }
    blocks
        .into_iter()
        .filter(|block| selected.iter().any(|topic| topic.matches(block, tz)))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;

    fn block_at(summary: &str, start: DateTime<Utc>) -> Block {
        Block {
            id: summary.to_ascii_lowercase(),
            start,
            end: start + TimeDelta::hours(1),
            summary: Some(summary.to_string()),
        }
    }

    fn utc_hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 11, h, 0, 0).unwrap()
    }

    #[test]
    fn lunch_and_dinner_match_on_summary_substring() {
        let lunch = block_at("Lunch with Bob", utc_hour(12));
        let dinner = block_at("Dinner downtown", utc_hour(19));
        assert!(Topic::Lunch.matches(&lunch, chrono_tz::UTC));
        assert!(!Topic::Lunch.matches(&dinner, chrono_tz::UTC));
        assert!(Topic::Dinner.matches(&dinner, chrono_tz::UTC));
    }

    #[test]
    fn work_requires_summary_and_daytime_hour() {
        let morning = block_at("Work session", utc_hour(9));
        let late = block_at("Work session", utc_hour(17));
        assert!(Topic::Work.matches(&morning, chrono_tz::UTC));
        // 17:00 is no longer a work slot: the hour must be strictly less.
        assert!(!Topic::Work.matches(&late, chrono_tz::UTC));
    }

    #[test]
    fn afternoon_and_evening_bucket_boundaries() {
        let noon = block_at("Open", utc_hour(12));
        let five59 = Block {
            start: utc_hour(17) + TimeDelta::minutes(59),
            ..block_at("Open", utc_hour(17))
        };
        let six = block_at("Open", utc_hour(18));
        assert!(Topic::Afternoon.matches(&noon, chrono_tz::UTC));
        assert!(Topic::Afternoon.matches(&five59, chrono_tz::UTC));
        assert!(!Topic::Afternoon.matches(&six, chrono_tz::UTC));
        assert!(Topic::Evening.matches(&six, chrono_tz::UTC));
        assert!(!Topic::Evening.matches(&noon, chrono_tz::UTC));
    }

    #[test]
    fn hour_is_evaluated_in_local_time() {
        // 23:00 UTC is 19:00 in New York (EDT in March): an evening block
        // there, not a late-night one that fails every bucket.
        let block = block_at("Open", utc_hour(23));
        assert!(Topic::Evening.matches(&block, chrono_tz::America::New_York));
        assert!(!Topic::Evening.matches(&block, chrono_tz::UTC));
    }

    #[test]
    fn empty_selection_passes_everything_unchanged() {
        let blocks = vec![
            block_at("Lunch with Bob", utc_hour(12)),
            block_at("Open", utc_hour(9)),
        ];
        let filtered = filter_topics(blocks.clone(), &BTreeSet::new(), chrono_tz::UTC);
        assert_eq!(filtered, blocks);
    }

    #[test]
    fn selection_is_or_across_topics() {
        let blocks = vec![
            block_at("Lunch with Bob", utc_hour(12)),
            block_at("Dinner downtown", utc_hour(19)),
            block_at("Open", utc_hour(9)),
        ];
        let selected: BTreeSet<Topic> = [Topic::Lunch, Topic::Dinner].into_iter().collect();
        let filtered = filter_topics(blocks, &selected, chrono_tz::UTC);
        let ids: Vec<&str> = filtered.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["lunch with bob", "dinner downtown"]);
    }
}
