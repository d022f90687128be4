use thiserror::Error;

/// Tracker error types
///
/// None of these are fatal to the host process: a malformed sample is
/// skipped, a missing start marker degrades into calibration after the wait
/// budget, and an unreachable transport is reported once so the caller can
/// fall back to the synthetic source.
#[derive(Error, Debug, Clone)]
pub enum TrackerError {
    #[error("malformed sample line: {0:?}")]
    MalformedSample(String),

    #[error("no stream start marker within {0:.1}s, proceeding to calibration")]
    StreamTimeout(f64),

    #[error("transport unavailable: {0}")]
    TransportUnavailable(String),
}

/// Result type for tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;
