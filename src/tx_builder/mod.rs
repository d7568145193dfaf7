//! Transaction builder
//!
//! ## Architecture
//!
//! - **errors**: build errors recorded on the envelope
//! - **transaction**: envelope, inputs, commands and argument ordering checks
//! - **builder**: `create_transaction` from a [`FeeConfiguration`]
//! - **validate**: structural check before submission
//!
//! ## Usage Example
//!
//! ```rust
//! use journal_tx::tx_builder::{create_transaction, validate_transaction, FeeConfiguration};
//! use journal_tx::types::MoveTarget;
//!
//! let mut tx = create_transaction(&FeeConfiguration::with_budget(100_000_000));
//! let title = tx.pure_string("My Diary");
//! let target = MoveTarget::new_journal("0x42".parse().unwrap());
//! let journal = tx.move_call(target, vec![], vec![title]);
//! let owner = tx.pure_address("0x7");
//! tx.transfer_objects(vec![journal], owner);
//!
//! assert!(validate_transaction(&tx).valid);
//! ```

pub mod errors;
pub use errors::TransactionBuilderError;

mod builder;
mod transaction;
mod validate;

pub use builder::{create_transaction, FeeConfiguration};
pub use transaction::{
    Argument, CallArg, Command, FeeConfig, MoveCall, ObjectRef, Transaction, TransactionData,
};
pub use validate::{validate_transaction, ValidationResult};
