//! Nullable infrastructure for deterministic testing.
//!
//! The oracle reaches the outside world through two seams: the [`Clock`]
//! and the [`ChallengeLedger`]. This crate provides implementations of both
//! that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Can simulate an unavailable ledger
//!
//! Usage: swap real implementations for nullables in tests.
//!
//! [`Clock`]: fitstake_types::Clock
//! [`ChallengeLedger`]: fitstake_ledger::ChallengeLedger

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::{LedgerCall, NullLedger};
