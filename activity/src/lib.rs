//! Activity normalization.
//!
//! Turns an untrusted fitness-provider payload (`{id, type, distance,
//! moving_time, elapsed_time, start_date, average_speed, ...}`) into a typed
//! [`ActivityRecord`], or a [`CompletenessReport`] listing every problem found.
//!
//! Field-level problems are never faults: they are collected as issues so the
//! caller can report all of them at once. Only a payload that is not a JSON
//! object at all is rejected with [`ActivityError::Malformed`].

pub mod error;
pub mod normalize;
pub mod payload;
pub mod record;

pub use error::ActivityError;
pub use normalize::{normalize, CompletenessReport};
pub use payload::ActivityPayload;
pub use record::ActivityRecord;
