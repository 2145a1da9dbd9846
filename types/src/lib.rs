//! Fundamental types for the fitstake oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, challenge ids, stake amounts, timestamps, activity types, error kinds
//! and verification parameters.

pub mod activity_type;
pub mod amount;
pub mod error;
pub mod id;
pub mod identity;
pub mod kind;
pub mod params;
pub mod time;

pub use activity_type::ActivityType;
pub use amount::StakeAmount;
pub use error::FitstakeError;
pub use id::ChallengeId;
pub use identity::Identity;
pub use kind::ErrorKind;
pub use params::VerificationParams;
pub use time::{Clock, SystemClock, Timestamp};
