//! Oracle identity check for one deployment scope.

use crate::{ConfigError, OracleConfig, OracleError, SECURITY_TARGET};
use fitstake_types::Identity;

/// Who may mark completions, and where.
///
/// Fixed for the lifetime of the value; rotating the oracle means building a
/// new one from new configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OracleAuthorization {
    scope: String,
    oracle: Identity,
}

impl OracleAuthorization {
    pub fn new(scope: impl Into<String>, oracle: Identity) -> Self {
        Self {
            scope: scope.into(),
            oracle,
        }
    }

    pub fn from_config(config: &OracleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config.scope.clone(), config.oracle()?))
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn oracle(&self) -> &Identity {
        &self.oracle
    }

    /// Case-insensitive match of `caller` against the configured oracle.
    pub fn is_oracle(&self, caller: &Identity) -> bool {
        *caller == self.oracle
    }

    pub fn check(&self, caller: &Identity) -> Result<(), OracleError> {
        if self.is_oracle(caller) {
            return Ok(());
        }
        tracing::warn!(
            target: SECURITY_TARGET,
            scope = %self.scope,
            caller = %caller,
            "rejected completion from non-oracle identity"
        );
        Err(OracleError::UnauthorizedOracle {
            caller: caller.clone(),
            scope: self.scope.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitstake_types::ErrorKind;

    #[test]
    fn caller_matches_case_insensitively() {
        let auth = OracleAuthorization::new("scope-a", Identity::new("0xAbCdEf"));
        assert!(auth.check(&Identity::new("0xabcdef")).is_ok());
        assert!(auth.check(&Identity::new("0XABCDEF")).is_ok());
    }

    #[test]
    fn other_caller_is_unauthorized() {
        let auth = OracleAuthorization::new("scope-a", Identity::new("0xoracle"));
        let err = auth.check(&Identity::new("0xmallory")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnauthorizedOracle);
        assert!(err.to_string().contains("scope-a"));
    }

    #[test]
    fn scopes_are_isolated() {
        let a = OracleAuthorization::new("a", Identity::new("0xone"));
        let b = OracleAuthorization::new("b", Identity::new("0xtwo"));
        let one = Identity::new("0xone");
        assert!(a.is_oracle(&one));
        assert!(!b.is_oracle(&one));
    }

    #[test]
    fn from_config_requires_identity() {
        assert!(OracleAuthorization::from_config(&OracleConfig::default()).is_err());
        let config = OracleConfig {
            oracle_identity: "0xoracle".into(),
            ..OracleConfig::default()
        };
        let auth = OracleAuthorization::from_config(&config).unwrap();
        assert_eq!(auth.scope(), "local");
    }
}
