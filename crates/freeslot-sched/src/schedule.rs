//! The full availability pipeline as one pure function.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use freeslot_ical::EventMap;

use crate::day::{day_sequence, enabled_days};
use crate::filter::free_blocks;
use crate::materialize::{MaterializeOptions, materialize};
use crate::model::{Schedule, Topic};
use crate::recurrence::{Horizon, utc_minus_local_minutes};
use crate::topic::filter_topics;

/// ## Summary
/// Computes the open scheduling windows for one snapshot of source data.
///
/// Pure and idempotent: the same event maps, topic selection, and `now`
/// always produce the same schedule. The caller owns `now` and decides when
/// to recompute (on fetch, on a cadence, on interaction); nothing here is
/// cached or mutated.
///
/// `enabled_days` reflects availability before topic filtering, so day
/// tiles stay stable while the user toggles topics; `blocks` is the
/// post-filter display set.
#[must_use]
pub fn compute_schedule(
    primary: &EventMap,
    plans: &[EventMap],
    topics: &BTreeSet<Topic>,
    now: DateTime<Utc>,
    tz: chrono_tz::Tz,
    weeks: i64,
    opts: &MaterializeOptions,
) -> Schedule {
    let horizon = Horizon::rolling(now, weeks);
    let offset = utc_minus_local_minutes(tz, now);

    let candidate_blocks = materialize(primary, &horizon, offset, opts);
    let plan_blocks: Vec<_> = plans
        .iter()
        .flat_map(|plan| materialize(plan, &horizon, offset, opts))
        .collect();

    let free = free_blocks(candidate_blocks, &plan_blocks);

    let days = day_sequence(now, tz, weeks);
    let enabled = enabled_days(&days, &free, tz);
    let blocks = filter_topics(free, topics, tz);

    tracing::info!(
        blocks = blocks.len(),
        enabled_days = enabled.len(),
        "Computed schedule"
    );

    Schedule {
        blocks,
        days,
        enabled_days: enabled,
    }
}
