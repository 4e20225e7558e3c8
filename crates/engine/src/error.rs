//! The module contains the errors the domain layer can report.
//!
//! Every variant marks a guarded misuse: nothing here is fatal, the caller
//! surfaces the error and the user can retry the action.
use thiserror::Error;

use crate::ledger::EntryId;

/// Domain errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// A connect step ran before any wallet provider was detected.
    #[error("no wallet provider detected")]
    NoProvider,
    /// Contract binding requires an authorized account first.
    #[error("no account authorized")]
    MissingAccount,
    /// The session already reached its terminal phase.
    #[error("contract already bound")]
    AlreadyBound,
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("ledger entry {0} not found")]
    EntryNotFound(EntryId),
    #[error("malformed call result: {0}")]
    Decode(String),
}
