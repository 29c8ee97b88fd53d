// Application layer - the ledger's use cases.
// Every client (HTTP API, shell) goes through LedgerService; nothing else
// writes to the account store.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
