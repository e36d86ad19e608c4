//! Occurrence materialization: event records into concrete dated blocks.

use freeslot_ical::{ComponentKind, EventMap, EventRecord, RecurrenceSpec};

use crate::model::Block;
use crate::recurrence::{Horizon, expand_rule};

/// Knobs for materialization behavior.
#[derive(Debug, Clone, Copy)]
pub struct MaterializeOptions {
    /// When a record's own base start coincides with an overridden
    /// occurrence instant, emit only the override block. The reference
    /// behavior emitted both; `false` preserves that quirk.
    pub dedupe_overridden_base: bool,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self {
            dedupe_overridden_base: true,
        }
    }
}

/// ## Summary
/// Converts raw event records into concrete blocks inside the horizon.
///
/// One dispatch point over the recurrence representation serves both
/// calendar kinds: rule-based series (primary calendars), explicit
/// occurrence overrides (plan calendars), and plain one-off events. A
/// record that fails expansion or violates `start < end` is skipped with a
/// warning; it never aborts the batch.
///
/// Every emitted block id is unique within the returned batch: the event
/// uid for one-off events, `uid/<instant>` for series occurrences.
#[must_use]
pub fn materialize(
    events: &EventMap,
    horizon: &Horizon,
    utc_minus_local: i64,
    opts: &MaterializeOptions,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    for record in events.values() {
        materialize_record(record, horizon, utc_minus_local, opts, &mut blocks);
    }
    tracing::debug!(
        events = events.len(),
        blocks = blocks.len(),
        "Materialized event map"
    );
    blocks
}

fn materialize_record(
    record: &EventRecord,
    horizon: &Horizon,
    utc_minus_local: i64,
    opts: &MaterializeOptions,
    blocks: &mut Vec<Block>,
) {
    if record.kind != ComponentKind::Event {
        tracing::trace!(uid = %record.uid, kind = %record.kind, "Skipping non-event component");
        return;
    }
    if record.end < record.start {
        tracing::warn!(uid = %record.uid, "Event ends before it starts, skipping");
        return;
    }

    match &record.recurrence {
        RecurrenceSpec::Rule(rule_text) => {
            let occurrences = match expand_rule(rule_text, record.start, horizon, utc_minus_local) {
                Ok(occurrences) => occurrences,
                Err(err) => {
                    tracing::warn!(uid = %record.uid, error = %err, "Skipping unexpandable rule");
                    return;
                }
            };
            let duration = record.duration();
            for instant in occurrences {
                push_block(
                    blocks,
                    Block {
                        id: Block::occurrence_id(&record.uid, instant),
                        start: instant,
                        end: instant + duration,
                        summary: record.summary.clone(),
                    },
                );
            }
        }
        RecurrenceSpec::Overrides(map) => {
            for (instant, override_record) in map {
                if !horizon.contains(*instant) {
                    continue;
                }
                push_block(
                    blocks,
                    Block {
                        id: Block::occurrence_id(&record.uid, *instant),
                        start: override_record.start,
                        end: override_record.end,
                        summary: override_record
                            .summary
                            .clone()
                            .or_else(|| record.summary.clone()),
                    },
                );
            }
            // The base occurrence contributes independently of its
            // overrides, unless it has itself been overridden and
            // deduplication is on.
            let base_overridden = map.contains_key(&record.start);
            if horizon.contains(record.start) && !(opts.dedupe_overridden_base && base_overridden) {
                push_block(
                    blocks,
                    Block {
                        id: record.uid.clone(),
                        start: record.start,
                        end: record.end,
                        summary: record.summary.clone(),
                    },
                );
            }
        }
        RecurrenceSpec::None => {
            // Strictly inside the open horizon: an event that has already
            // started but not ended is not offered.
            if horizon.contains(record.start) {
                push_block(
                    blocks,
                    Block {
                        id: record.uid.clone(),
                        start: record.start,
                        end: record.end,
                        summary: record.summary.clone(),
                    },
                );
            }
        }
    }
}

/// Emits a block only if it upholds `start < end`. A zero-length block
/// (a DTSTART-only event has zero duration per RFC 5545) is not a
/// bookable slot and must not enable its day tile.
fn push_block(blocks: &mut Vec<Block>, block: Block) {
    if block.start < block.end {
        blocks.push(block);
    } else {
        tracing::warn!(id = %block.id, "Dropping zero-length block");
    }
}
