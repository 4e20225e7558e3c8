//! Domain logic for the sportello client.
//!
//! The crate is pure: the wallet session lifecycle, the calldata for the ATM
//! contract and the local income/expense ledger live here, with no I/O.
//! Transport (the wallet provider's JSON-RPC surface) belongs to the client.

pub use error::EngineError;
pub use ledger::{EntryId, EntryKind, Ledger, LedgerEntry};
pub use money::MoneyCents;
pub use session::{Phase, Session};

pub mod abi;
mod error;
mod ledger;
mod money;
mod session;

type ResultEngine<T> = Result<T, EngineError>;
