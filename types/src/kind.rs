//! Machine-readable error kinds reported at the oracle boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes callers branch on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    MalformedInput,
    ValidationFailed,
    UnauthorizedOracle,
    AlreadyCompleted,
    NotJoined,
    ChallengeFinalized,
    LedgerUnavailable,
    UnknownChallenge,
    DuplicateActivity,
    InvalidStateTransition,
    CriteriaMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "MALFORMED_INPUT",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::UnauthorizedOracle => "UNAUTHORIZED_ORACLE",
            Self::AlreadyCompleted => "ALREADY_COMPLETED",
            Self::NotJoined => "NOT_JOINED",
            Self::ChallengeFinalized => "CHALLENGE_FINALIZED",
            Self::LedgerUnavailable => "LEDGER_UNAVAILABLE",
            Self::UnknownChallenge => "UNKNOWN_CHALLENGE",
            Self::DuplicateActivity => "DUPLICATE_ACTIVITY",
            Self::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            Self::CriteriaMismatch => "CRITERIA_MISMATCH",
        }
    }

    /// Only a failed remote call is worth retrying unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LedgerUnavailable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
