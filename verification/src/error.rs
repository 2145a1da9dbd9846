use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("challenge window is empty: end {end} is not after start {start}")]
    EmptyWindow { start: u64, end: u64 },

    #[error("target distance must be positive, got {0}")]
    InvalidTarget(f64),

    #[error("distance bounds are inconsistent: min {min} exceeds max {max}")]
    InconsistentBounds { min: f64, max: f64 },

    #[error("distance tolerance must be non-negative, got {0}")]
    InvalidTolerance(f64),
}
