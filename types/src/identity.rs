//! Participant / oracle identity.

use crate::FitstakeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// An account identity on the ledger (e.g. `0xAbC...`).
///
/// Identities compare case-insensitively: `0xABCD` and `0xabcd` are the same
/// principal. The original spelling is kept for display.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a raw string, trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Self {
        let s: String = raw.into();
        Self(s.trim().to_string())
    }

    /// Create an identity, rejecting empty strings and embedded whitespace.
    pub fn parse(raw: impl Into<String>) -> Result<Self, FitstakeError> {
        let id = Self::new(raw);
        if id.is_valid() {
            Ok(id)
        } else {
            Err(FitstakeError::InvalidIdentity(id.0))
        }
    }

    /// Return the identity as originally spelled.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used for hashing and digests.
    pub fn canonical(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Case-insensitive comparison against a raw identity string.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }

    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && !self.0.chars().any(char::is_whitespace)
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Identity {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
