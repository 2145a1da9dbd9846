//! Activity verification against challenge criteria.
//!
//! A fixed, short-circuiting pipeline of pure stages:
//! 1. **Completeness**: the payload normalizes into a plausible record.
//! 2. **Type**: the activity type matches the challenge exactly.
//! 3. **Distance**: the distance clears the tolerance-adjusted bounds.
//! 4. **Timestamp**: the activity started inside the challenge window.
//!
//! The first failing stage ends evaluation and becomes the decision's reason.
//! The resulting [`VerificationDecision`] is the only thing the completion
//! authorizer accepts; acceptance rules live here and nowhere else.

pub mod criteria;
pub mod decision;
pub mod error;
pub mod stage;
pub mod verifier;

pub use criteria::ChallengeCriteria;
pub use decision::{ActivityEvidence, StageResults, VerificationDecision};
pub use error::VerificationError;
pub use stage::{DistanceBounds, FailureCode, Stage, StageFailure};
pub use verifier::ActivityVerifier;
