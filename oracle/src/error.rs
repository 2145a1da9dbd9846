use fitstake_activity::ActivityError;
use fitstake_ledger::LedgerError;
use fitstake_types::{ChallengeId, ErrorKind, FitstakeError, Identity};
use fitstake_verification::{Stage, VerificationError};
use thiserror::Error;

/// Every failure the oracle reports to its caller.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("{0}")]
    MalformedInput(String),

    #[error("verification failed: {reason}")]
    ValidationFailed {
        stage: Option<Stage>,
        reason: String,
    },

    #[error("{caller} is not the oracle for scope {scope}")]
    UnauthorizedOracle { caller: Identity, scope: String },

    #[error("{participant} has already completed challenge {challenge}")]
    AlreadyCompleted {
        challenge: ChallengeId,
        participant: Identity,
    },

    #[error("{participant} has not joined challenge {challenge}")]
    NotJoined {
        challenge: ChallengeId,
        participant: Identity,
    },

    #[error("challenge {0} is finalized")]
    ChallengeFinalized(ChallengeId),

    #[error("ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("challenge {0} does not exist")]
    UnknownChallenge(ChallengeId),

    #[error("activity {activity_id} was already used to complete challenge {challenge}")]
    DuplicateActivity {
        challenge: ChallengeId,
        activity_id: String,
    },

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("criteria for challenge {challenge} disagree with the ledger: {detail}")]
    CriteriaMismatch {
        challenge: ChallengeId,
        detail: String,
    },
}

impl OracleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::UnauthorizedOracle { .. } => ErrorKind::UnauthorizedOracle,
            Self::AlreadyCompleted { .. } => ErrorKind::AlreadyCompleted,
            Self::NotJoined { .. } => ErrorKind::NotJoined,
            Self::ChallengeFinalized(_) => ErrorKind::ChallengeFinalized,
            Self::LedgerUnavailable(_) => ErrorKind::LedgerUnavailable,
            Self::UnknownChallenge(_) => ErrorKind::UnknownChallenge,
            Self::DuplicateActivity { .. } => ErrorKind::DuplicateActivity,
            Self::InvalidStateTransition(_) => ErrorKind::InvalidStateTransition,
            Self::CriteriaMismatch { .. } => ErrorKind::CriteriaMismatch,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// A repeated completion already took effect; callers may treat it as success.
    pub fn is_success_equivalent(&self) -> bool {
        matches!(self, Self::AlreadyCompleted { .. })
    }
}

impl From<LedgerError> for OracleError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::UnknownChallenge(id) => Self::UnknownChallenge(id),
            LedgerError::NotJoined {
                challenge,
                participant,
            } => Self::NotJoined {
                challenge,
                participant,
            },
            LedgerError::AlreadyCompleted {
                challenge,
                participant,
            } => Self::AlreadyCompleted {
                challenge,
                participant,
            },
            LedgerError::ChallengeFinalized(id) => Self::ChallengeFinalized(id),
            LedgerError::DuplicateActivity {
                challenge,
                activity_id,
            } => Self::DuplicateActivity {
                challenge,
                activity_id,
            },
            LedgerError::Unavailable(msg) => Self::LedgerUnavailable(msg),
            other @ (LedgerError::InvalidChallenge(_)
            | LedgerError::AlreadyJoined { .. }
            | LedgerError::StakeMismatch { .. }
            | LedgerError::ChallengeClosed { .. }
            | LedgerError::NotYetEnded { .. }) => Self::InvalidStateTransition(other.to_string()),
        }
    }
}

impl From<ActivityError> for OracleError {
    fn from(err: ActivityError) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

impl From<VerificationError> for OracleError {
    fn from(err: VerificationError) -> Self {
        Self::MalformedInput(format!("invalid challenge criteria: {err}"))
    }
}

/// Errors loading or validating an [`crate::OracleConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<FitstakeError> for ConfigError {
    fn from(err: FitstakeError) -> Self {
        Self::Invalid(err.to_string())
    }
}
