//! The completion oracle.
//!
//! Turns an untrusted activity into a [`VerificationDecision`], logs it to
//! the audit trail, and when the decision passes and the caller is the
//! configured oracle identity, performs the single permitted ledger mutation:
//! marking a participant complete.
//!
//! [`VerificationDecision`]: fitstake_verification::VerificationDecision

pub mod authorization;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod service;

pub use authorization::OracleAuthorization;
pub use authorizer::CompletionAuthorizer;
pub use config::OracleConfig;
pub use error::{ConfigError, OracleError};
pub use service::{audit, OracleService};

/// Tracing target for verification decisions.
pub const AUDIT_TARGET: &str = "fitstake::audit";
/// Tracing target for rejected oracle callers.
pub const SECURITY_TARGET: &str = "fitstake::security";
