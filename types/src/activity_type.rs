//! Activity type as reported by the fitness-data provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An activity type such as `Run`, `Walk` or `Ride`.
///
/// Comparison is exact and case-sensitive: a challenge requiring `Run`
/// is not satisfied by `run`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityType(String);

impl ActivityType {
    pub const RUN: &'static str = "Run";
    pub const WALK: &'static str = "Walk";
    pub const RIDE: &'static str = "Ride";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn run() -> Self {
        Self::new(Self::RUN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Challenges require a run unless configured otherwise.
impl Default for ActivityType {
    fn default() -> Self {
        Self::run()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActivityType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
