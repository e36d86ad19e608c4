//! Recurrence expansion within the rolling horizon.
//!
//! Expansion runs the rule engine in UTC and then applies a timezone-day
//! correction: the engine computes day rollovers at a fixed wall-clock time
//! before the local UTC offset is applied, so near timezone boundaries a
//! daily or weekly rule can land occurrences on the wrong calendar day. The
//! correction lives in one named function ([`correct_occurrence_day`]) so it
//! can be swapped out without touching callers if the engine is replaced.

use chrono::{DateTime, Datelike, Offset, TimeDelta, TimeZone, Utc};
use rrule::{RRule, Tz as RRuleTz, Unvalidated};

use crate::error::{SchedError, SchedResult};

/// The rolling window `[now, now + weeks)` within which occurrences are
/// materialized. Both bounds are treated as strictly exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Horizon {
    #[must_use]
    pub fn rolling(now: DateTime<Utc>, weeks: i64) -> Self {
        Self {
            start: now,
            end: now + TimeDelta::weeks(weeks),
        }
    }

    /// Strict containment: both bounds exclusive.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start < instant && instant < self.end
    }
}

/// UTC-minus-local offset of `tz` at `at`, in minutes.
///
/// Positive west of Greenwich (UTC-5 New York winter gives `300`), matching
/// the sign convention the day correction was written against.
#[must_use]
pub fn utc_minus_local_minutes(tz: chrono_tz::Tz, at: DateTime<Utc>) -> i64 {
    let local_minus_utc = tz
        .offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc();
    -i64::from(local_minus_utc) / 60
}

/// ## Summary
/// Re-stamps a raw engine occurrence onto the correct local calendar day.
///
/// The transform, applied identically to the query window and to each raw
/// occurrence: shift the occurrence backward by the offset, then take its
/// day-of-month from an auxiliary instant shifted forward by the offset.
/// Time-of-day stays as authored; only the day component moves. If the
/// re-stamped day does not exist in the shifted month, the occurrence is
/// kept unshifted-day (end-of-month edge).
///
/// Known limitation: the caller supplies the offset of the *current*
/// instant, so a DST transition inside the horizon is not accounted for.
#[must_use]
pub fn correct_occurrence_day(raw: DateTime<Utc>, utc_minus_local: i64) -> DateTime<Utc> {
    let offset = TimeDelta::minutes(utc_minus_local);
    let shifted = raw - offset;
    let aux = raw + offset;
    shifted.with_day(aux.day()).unwrap_or(shifted)
}

/// ## Summary
/// Expands a recurrence rule into concrete occurrence instants strictly
/// inside the horizon, day-corrected for the given offset.
///
/// ## Errors
/// Returns an error if the rule text cannot be parsed or validated against
/// the event's start.
pub fn expand_rule(
    rule_text: &str,
    dtstart: DateTime<Utc>,
    horizon: &Horizon,
    utc_minus_local: i64,
) -> SchedResult<Vec<DateTime<Utc>>> {
    let rrule = rule_text
        .parse::<RRule<Unvalidated>>()
        .map_err(|err| SchedError::InvalidRule(err.to_string()))?;
    let dt_start = dtstart.with_timezone(&RRuleTz::UTC);
    let rrule_set = rrule
        .build(dt_start)
        .map_err(|err| SchedError::InvalidRule(err.to_string()))?;

    // The query window gets the same forward shift as the per-occurrence
    // correction, so the window itself is not under-covered.
    let offset = TimeDelta::minutes(utc_minus_local);
    let rrule_set = rrule_set
        .after((horizon.start + offset).with_timezone(&RRuleTz::UTC))
        .before((horizon.end + offset).with_timezone(&RRuleTz::UTC));

    let occurrences: Vec<DateTime<RRuleTz>> = rrule_set.all(u16::MAX).dates;
    tracing::trace!(
        rule = %rule_text,
        count = occurrences.len(),
        "Expanded recurrence rule"
    );

    Ok(occurrences
        .into_iter()
        .map(|occ| correct_occurrence_day(occ.with_timezone(&Utc), utc_minus_local))
        .filter(|instant| horizon.contains(*instant))
        .collect())
}
