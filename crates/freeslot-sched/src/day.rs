//! The fixed-length display day sequence and its enabled subset.

use chrono::{DateTime, Days, NaiveDate, Utc};

use freeslot_core::constants::{DAYS_PER_WEEK, TODAY_LABEL, TOMORROW_LABEL};

use crate::model::{Block, DayEntry};

/// ## Summary
/// Builds `weeks * 7` consecutive local calendar days starting at today.
///
/// Day 0 is labeled "Today", day 1 "Tmrw", the rest carry a three-letter
/// weekday name.
#[must_use]
pub fn day_sequence(now: DateTime<Utc>, tz: chrono_tz::Tz, weeks: i64) -> Vec<DayEntry> {
    let today = now.with_timezone(&tz).date_naive();
    let count = weeks * DAYS_PER_WEEK;
    (0..count)
        .filter_map(|i| {
            let date = today.checked_add_days(Days::new(u64::try_from(i).ok()?))?;
            let label = if date == today {
                TODAY_LABEL.to_string()
            } else if Some(date) == today.succ_opt() {
                TOMORROW_LABEL.to_string()
            } else {
                date.format("%a").to_string()
            };
            Some(DayEntry { date, label })
        })
        .collect()
}

/// ## Summary
/// The subsequence of days on which at least one block falls, by local-day
/// equality of the block's start instant.
#[must_use]
pub fn enabled_days(days: &[DayEntry], blocks: &[Block], tz: chrono_tz::Tz) -> Vec<DayEntry> {
    days.iter()
        .filter(|day| {
            blocks
                .iter()
                .any(|block| block.start.with_timezone(&tz).date_naive() == day.date)
        })
        .cloned()
        .collect()
}

/// ## Summary
/// Auto-corrects the selected day: a selection that is absent or no longer
/// enabled falls back to the first enabled day.
#[must_use]
pub fn resolve_selected_day(
    selected: Option<NaiveDate>,
    enabled: &[DayEntry],
) -> Option<NaiveDate> {
    selected
        .filter(|date| enabled.iter().any(|day| day.date == *date))
        .or_else(|| enabled.first().map(|day| day.date))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    fn noon(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 12, 0, 0).unwrap()
    }

    fn block_at(id: &str, start: DateTime<Utc>) -> Block {
        Block {
            id: id.to_string(),
            start,
            end: start + TimeDelta::hours(1),
            summary: None,
        }
    }

    #[test]
    fn sequence_has_21_days_with_labels() {
        // 2026-03-11 is a Wednesday.
        let days = day_sequence(noon(11), chrono_tz::UTC, 3);
        assert_eq!(days.len(), 21);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 11).unwrap());
        assert_eq!(days[0].label, "Today");
        assert_eq!(days[1].label, "Tmrw");
        assert_eq!(days[2].label, "Fri");
        assert_eq!(days[20].date, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
        assert_eq!(days[20].label, "Tue");
    }

    #[test]
    fn sequence_starts_at_local_today() {
        // 2026-03-11 01:00 UTC is still 2026-03-10 in New York.
        let now = Utc.with_ymd_and_hms(2026, 3, 11, 1, 0, 0).unwrap();
        let days = day_sequence(now, chrono_tz::America::New_York, 3);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
    }

    #[test]
    fn enabled_days_match_block_local_days() {
        let days = day_sequence(noon(11), chrono_tz::UTC, 3);
        let blocks = [block_at("a", noon(12)), block_at("b", noon(15))];
        let enabled = enabled_days(&days, &blocks, chrono_tz::UTC);
        let dates: Vec<NaiveDate> = enabled.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            [
                NaiveDate::from_ymd_opt(2026, 3, 12).unwrap(),
                NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
            ]
        );
    }

    #[test]
    fn no_blocks_means_no_enabled_days() {
        let days = day_sequence(noon(11), chrono_tz::UTC, 3);
        assert!(enabled_days(&days, &[], chrono_tz::UTC).is_empty());
    }

    #[test]
    fn stale_selection_falls_back_to_first_enabled() {
        let days = day_sequence(noon(11), chrono_tz::UTC, 3);
        let blocks = [block_at("a", noon(12))];
        let enabled = enabled_days(&days, &blocks, chrono_tz::UTC);

        let stale = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();
        let resolved = resolve_selected_day(Some(stale), &enabled);
        assert_eq!(resolved, Some(NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()));

        let kept = resolve_selected_day(Some(enabled[0].date), &enabled);
        assert_eq!(kept, Some(enabled[0].date));

        assert_eq!(resolve_selected_day(None, &[]), None);
    }
}
