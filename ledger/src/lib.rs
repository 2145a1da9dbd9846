//! Challenge ledger: challenges, participants and their lifecycle.
//!
//! The ledger is an external collaborator (escrow contract, database, ...)
//! reached through the [`ChallengeLedger`] trait. This crate defines the
//! trait, the lifecycle rules every implementation enforces, the events a
//! ledger emits, and [`InMemoryLedger`], a thread-safe reference implementation.
//!
//! Per participant: `NotJoined → Joined → Completed`.
//! Per challenge: `Open → Finalized`. `Completed` and `Finalized` are terminal.

pub mod challenge;
pub mod error;
pub mod event;
pub mod ledger;
pub mod lifecycle;
pub mod memory;

pub use challenge::{
    Challenge, ChallengeTerms, CompletionMetadata, FinalizationSummary, Participant,
};
pub use error::LedgerError;
pub use event::{CompletionEvent, EventBus, LedgerEvent};
pub use ledger::ChallengeLedger;
pub use lifecycle::{ChallengePhase, ParticipantPhase};
pub use memory::InMemoryLedger;
