//! journal-tx - journal creation on a Sui-style object network
//!
//! Builds the `journal::new_journal` transaction, checks it, verifies the
//! account can pay for it, hands it to a wallet and reports the created object.

pub mod client;
pub mod config;
pub mod errors;
pub mod gas;
pub mod journal;
pub mod observability;
pub mod test_utils;
pub mod tx_builder;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use errors::JournalError;
pub use journal::{JournalCreator, SubmissionReport, WorkflowState};
