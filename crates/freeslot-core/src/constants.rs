/// Scheduling constants shared across crates.
///
/// These values are part of the external contract: the booking UI assumes a
/// three-week horizon (21 day tiles) and the topic hour thresholds below.
pub const DEFAULT_HORIZON_WEEKS: i64 = 3;
pub const DAYS_PER_WEEK: i64 = 7;

/// A "Work" block must start strictly before this local hour.
pub const WORK_LATEST_HOUR: u32 = 17;
/// An "Afternoon" block starts at or after this local hour...
pub const AFTERNOON_START_HOUR: u32 = 12;
/// ...and strictly before this one, which also begins "Evening".
pub const EVENING_START_HOUR: u32 = 18;

pub const TODAY_LABEL: &str = "Today";
pub const TOMORROW_LABEL: &str = "Tmrw";
