//! Availability filtering: subtract plan commitments from candidate blocks.

use crate::model::Block;

/// Interval overlap with adjacent-exclusive semantics: touching endpoints
/// (one block ending exactly when another starts) do not overlap.
#[must_use]
pub fn overlaps(a: &Block, b: &Block) -> bool {
    a.start < b.end && b.start < a.end
}

/// ## Summary
/// Retains each primary block iff no plan block time-overlaps it.
///
/// A plain O(primary × plan) scan; the three-week horizon keeps both sides
/// small enough that indexing would not pay for itself.
#[must_use]
pub fn free_blocks(primary: Vec<Block>, plan: &[Block]) -> Vec<Block> {
    let before = primary.len();
    let free: Vec<Block> = primary
        .into_iter()
        .filter(|block| !plan.iter().any(|busy| overlaps(block, busy)))
        .collect();
    tracing::debug!(
        candidates = before,
        plan = plan.len(),
        free = free.len(),
        "Filtered availability"
    );
    free
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};

    use super::*;

    fn block(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Block {
        Block {
            id: id.to_string(),
            start,
            end,
            summary: None,
        }
    }

    fn utc(d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, h, mi, 0).unwrap()
    }

    #[test]
    fn overlapping_block_is_excluded() {
        let primary = vec![block("a", utc(11, 12, 0), utc(11, 13, 0))];
        let plan = [block("p", utc(11, 12, 30), utc(11, 14, 0))];
        assert!(free_blocks(primary, &plan).is_empty());
    }

    #[test]
    fn contained_block_is_excluded() {
        let primary = vec![block("a", utc(11, 12, 0), utc(11, 13, 0))];
        let plan = [block("p", utc(11, 9, 0), utc(11, 18, 0))];
        assert!(free_blocks(primary, &plan).is_empty());
    }

    #[test]
    fn disjoint_block_is_retained() {
        let primary = vec![block("a", utc(11, 12, 0), utc(11, 13, 0))];
        let plan = [block("p", utc(12, 12, 0), utc(12, 13, 0))];
        assert_eq!(free_blocks(primary, &plan).len(), 1);
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        // Back-to-back: plan ends exactly when the candidate starts, and
        // another starts exactly when it ends.
        let candidate = block("a", utc(11, 12, 0), utc(11, 13, 0));
        let ends_at_start = block("p1", utc(11, 11, 0), utc(11, 12, 0));
        let starts_at_end = block("p2", utc(11, 13, 0), utc(11, 14, 0));
        assert!(!overlaps(&candidate, &ends_at_start));
        assert!(!overlaps(&candidate, &starts_at_end));

        let free = free_blocks(vec![candidate], &[ends_at_start, starts_at_end]);
        assert_eq!(free.len(), 1);
    }

    #[test]
    fn retained_blocks_keep_input_order() {
        let primary = vec![
            block("a", utc(11, 12, 0), utc(11, 13, 0)),
            block("b", utc(12, 12, 0), utc(12, 13, 0)),
            block("c", utc(13, 12, 0), utc(13, 13, 0)),
        ];
        let plan = [block("p", utc(12, 12, 30), utc(12, 12, 45))];
        let free = free_blocks(primary, &plan);
        let ids: Vec<&str> = free.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
