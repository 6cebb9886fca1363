use thiserror::Error;

/// Errors raised by the tracking core.
///
/// Per-frame conditions (missing landmarks, unknown exercise, a failed
/// detection) are never errors; they are folded into the frame snapshot.
#[derive(Error, Debug)]
pub enum TrackingError {
    #[error("Fatigue level must be between 1 and 10, got {0}")]
    InvalidFatigueLevel(u8),
    #[error("Pose detection failed: {0}")]
    Detection(String),
    #[error("Invalid tracking configuration: {0}")]
    InvalidConfig(String),
    #[error("Tracker has already been finished")]
    AlreadyFinished,
    #[error("Tracker task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
