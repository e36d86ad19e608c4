use thiserror::Error;

/// Scheduling errors.
///
/// These only surface at isolation boundaries: a per-event failure during
/// materialization is logged and skipped, never propagated to the batch.
#[derive(Error, Debug)]
pub enum SchedError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),
}

pub type SchedResult<T> = std::result::Result<T, SchedError>;
