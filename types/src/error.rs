//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing shared types.
#[derive(Debug, Error)]
pub enum FitstakeError {
    #[error("invalid identity: {0:?}")]
    InvalidIdentity(String),

    #[error("invalid verification parameters: {0}")]
    InvalidParams(String),
}
