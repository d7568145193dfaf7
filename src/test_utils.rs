//! Test Utilities Module
//!
//! Deterministic stand-ins for the network and the wallet. No I/O happens here.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use crate::client::{
    ChainClient, CoinRecord, CreatedObject, CreatedReference, ExecutionEffects,
    ExecutionReceipt, ExecutionStatus, ProviderError, TransactionSigner, SUI_COIN_TYPE,
};
use crate::tx_builder::{Transaction, TransactionData};
use crate::types::{ObjectId, SuiAddress, ID_LENGTH};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Coin with a deterministic object id derived from `id`
pub fn coin(id: u8, balance: u64) -> CoinRecord {
    let mut bytes = [0u8; ID_LENGTH];
    bytes[ID_LENGTH - 1] = id;
    CoinRecord {
        coin_type: SUI_COIN_TYPE.to_string(),
        coin_object_id: ObjectId::new(bytes),
        version: id as u64,
        digest: format!("coin-digest-{}", id),
        balance,
    }
}

/// Object id used as the created journal in successful effects
pub fn created_journal_id() -> ObjectId {
    ObjectId::new([0xab; ID_LENGTH])
}

/// Effects with a successful status and one created object
pub fn success_effects(created: ObjectId) -> ExecutionEffects {
    ExecutionEffects {
        status: ExecutionStatus::Success,
        created: vec![CreatedObject {
            owner: serde_json::Value::Null,
            reference: CreatedReference {
                object_id: created,
                version: 1,
                digest: "created-digest".to_string(),
            },
        }],
    }
}

/// Mock ChainClient for testing
#[derive(Clone)]
pub struct MockChainClient {
    coins: Arc<Mutex<Result<Vec<CoinRecord>, ProviderError>>>,
    effects: Arc<Mutex<Result<ExecutionEffects, ProviderError>>>,

    /// Coin type of every coin query served
    pub requested_coin_types: Arc<Mutex<Vec<String>>>,

    /// Digests passed to wait_for_transaction
    pub waited_digests: Arc<Mutex<Vec<String>>>,
}

impl MockChainClient {
    pub fn new(coins: Vec<CoinRecord>) -> Self {
        Self::from_coin_result(Ok(coins))
    }

    fn from_coin_result(coins: Result<Vec<CoinRecord>, ProviderError>) -> Self {
        Self {
            coins: Arc::new(Mutex::new(coins)),
            effects: Arc::new(Mutex::new(Ok(success_effects(created_journal_id())))),
            requested_coin_types: Arc::new(Mutex::new(Vec::new())),
            waited_digests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// One coin per balance, ids 1..=n
    pub fn with_balances(balances: &[u64]) -> Self {
        Self::new(
            balances
                .iter()
                .enumerate()
                .map(|(i, b)| coin(i as u8 + 1, *b))
                .collect(),
        )
    }

    /// Coin queries fail with a transport error
    pub fn failing_coins() -> Self {
        Self::from_coin_result(Err(ProviderError::Transport {
            endpoint: "mock".to_string(),
            message: "connection refused".to_string(),
        }))
    }

    pub async fn set_effects(&self, effects: Result<ExecutionEffects, ProviderError>) {
        *self.effects.lock().await = effects;
    }

    pub async fn get_coins_count(&self) -> usize {
        self.requested_coin_types.lock().await.len()
    }

    pub async fn wait_count(&self) -> usize {
        self.waited_digests.lock().await.len()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_coins(
        &self,
        _owner: &SuiAddress,
        coin_type: &str,
    ) -> Result<Vec<CoinRecord>, ProviderError> {
        self.requested_coin_types
            .lock()
            .await
            .push(coin_type.to_string());
        self.coins.lock().await.clone()
    }

    async fn wait_for_transaction(&self, digest: &str) -> Result<ExecutionEffects, ProviderError> {
        self.waited_digests.lock().await.push(digest.to_string());
        self.effects.lock().await.clone()
    }
}

/// Mock TransactionSigner for testing
///
/// Records every transaction it receives and answers with a fixed digest.
#[derive(Clone)]
pub struct MockSigner {
    should_succeed: bool,

    /// Data of every transaction handed to the signer
    pub signed: Arc<Mutex<Vec<TransactionData>>>,

    pub digest: String,
}

impl MockSigner {
    /// Create a new MockSigner that succeeds by default
    pub fn new() -> Self {
        Self::with_outcome(true)
    }

    fn with_outcome(should_succeed: bool) -> Self {
        Self {
            should_succeed,
            signed: Arc::new(Mutex::new(Vec::new())),
            digest: "mock-digest".to_string(),
        }
    }

    /// Create a MockSigner whose wallet always rejects
    pub fn new_failing() -> Self {
        Self::with_outcome(false)
    }

    pub async fn sign_count(&self) -> usize {
        self.signed.lock().await.len()
    }
}

impl Default for MockSigner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn sign_and_execute(&self, tx: Transaction) -> anyhow::Result<ExecutionReceipt> {
        if !self.should_succeed {
            anyhow::bail!("User rejected the request");
        }

        let data = tx
            .data()
            .map_err(|e| anyhow::anyhow!("signer could not read transaction: {}", e))?
            .clone();
        self.signed.lock().await.push(data);

        Ok(ExecutionReceipt {
            digest: self.digest.clone(),
        })
    }
}
