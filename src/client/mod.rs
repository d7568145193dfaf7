//! Blockchain client seam
//!
//! The network is consumed through two capabilities:
//! - [`ChainClient`]: read side (coin query, finality wait), implemented over
//!   JSON-RPC by [`RpcClient`]
//! - [`TransactionSigner`]: the wallet that signs and submits a transaction
//!
//! Nothing in this crate holds keys; signers are supplied by the embedding
//! application.

pub mod errors;
mod rpc;

pub use errors::ProviderError;
pub use rpc::{RpcClient, RpcSettings};

use crate::tx_builder::{ObjectRef, Transaction};
use crate::types::{ObjectId, SuiAddress};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Native fee currency coin type
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// One spendable coin object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    pub coin_type: String,
    pub coin_object_id: ObjectId,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: u64,
    pub digest: String,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub balance: u64,
}

impl CoinRecord {
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            object_id: self.coin_object_id,
            version: self.version,
            digest: self.digest.clone(),
        }
    }
}

/// Outcome reported by the network for an executed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failure { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedObject {
    #[serde(default)]
    pub owner: serde_json::Value,
    pub reference: CreatedReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedReference {
    pub object_id: ObjectId,
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub version: u64,
    pub digest: String,
}

/// State changes of a finalized transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEffects {
    pub status: ExecutionStatus,
    #[serde(default)]
    pub created: Vec<CreatedObject>,
}

impl ExecutionEffects {
    /// Id of the first object created by the transaction, if any
    pub fn first_created(&self) -> Option<ObjectId> {
        self.created.first().map(|c| c.reference.object_id)
    }
}

/// Returned by the signer once the network accepted the transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReceipt {
    pub digest: String,
}

/// Read access to the network
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// All coins of `coin_type` owned by `owner`, every page
    async fn get_coins(
        &self,
        owner: &SuiAddress,
        coin_type: &str,
    ) -> Result<Vec<CoinRecord>, ProviderError>;

    /// Block until the transaction is final and return its effects
    async fn wait_for_transaction(&self, digest: &str) -> Result<ExecutionEffects, ProviderError>;
}

/// Wallet capability: sign a transaction and submit it for execution
///
/// Takes the transaction by value; it belongs to the signer from here on.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_and_execute(&self, tx: Transaction) -> anyhow::Result<ExecutionReceipt>;
}

/// Full nodes send u64 values as decimal strings
fn u64_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not an unsigned integer", s))),
    }
}
