//! Journal-creation workflow
//!
//! Drives one submission through the states below, strictly in order:
//!
//! ```text
//! Idle -> Building -> Validating -> Provisioning -> AwaitingSignature
//!      -> AwaitingExecution -> Completed
//! ```
//!
//! Any failure moves the run to `Failed`. Nothing is retried; the caller may
//! start a new submission from `Idle`.
//!
//! The entry guard (connected account, non-empty title) is checked here as well,
//! so the workflow is safe to call from any front end.

use crate::client::{ChainClient, ExecutionStatus, TransactionSigner, SUI_COIN_TYPE};
use crate::config::Config;
use crate::errors::JournalError;
use crate::gas::{ensure_sufficient_funds, ProvisioningReport};
use crate::observability::CorrelationId;
use crate::tx_builder::{create_transaction, validate_transaction, FeeConfiguration, Transaction};
use crate::types::{MoveTarget, ObjectId, SuiAddress};
use serde::Serialize;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkflowState {
    Idle,
    Building,
    Validating,
    Provisioning,
    AwaitingSignature,
    AwaitingExecution,
    Completed,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Completed | WorkflowState::Failed)
    }
}

/// Everything known about one submission once it reached a terminal state
#[derive(Debug)]
pub struct SubmissionReport {
    pub correlation_id: CorrelationId,
    /// Every state the run passed through, starting with `Idle`
    pub history: Vec<WorkflowState>,
    pub provisioning: Option<ProvisioningReport>,
    /// Set once the signer accepted the transaction
    pub digest: Option<String>,
    pub outcome: Result<ObjectId, JournalError>,
}

impl SubmissionReport {
    /// Final state of the run
    pub fn state(&self) -> WorkflowState {
        self.history
            .last()
            .copied()
            .unwrap_or(WorkflowState::Idle)
    }

    pub fn reached(&self, state: WorkflowState) -> bool {
        self.history.contains(&state)
    }
}

struct Run {
    correlation_id: CorrelationId,
    history: Vec<WorkflowState>,
    provisioning: Option<ProvisioningReport>,
    digest: Option<String>,
}

impl Run {
    fn new() -> Self {
        Self {
            correlation_id: CorrelationId::new(),
            history: vec![WorkflowState::Idle],
            provisioning: None,
            digest: None,
        }
    }

    fn enter(&mut self, state: WorkflowState) {
        debug!(correlation_id = %self.correlation_id, state = ?state, "Workflow transition");
        self.history.push(state);
    }

    fn finish(mut self, outcome: Result<ObjectId, JournalError>) -> SubmissionReport {
        match &outcome {
            Ok(object_id) => {
                self.enter(WorkflowState::Completed);
                info!(
                    correlation_id = %self.correlation_id,
                    object_id = %object_id,
                    digest = ?self.digest,
                    "Journal created"
                );
            }
            Err(e) => {
                self.enter(WorkflowState::Failed);
                error!(
                    correlation_id = %self.correlation_id,
                    category = e.category(),
                    retryable = e.is_retryable(),
                    error = %e,
                    "Journal creation failed"
                );
            }
        }

        SubmissionReport {
            correlation_id: self.correlation_id,
            history: self.history,
            provisioning: self.provisioning,
            digest: self.digest,
            outcome,
        }
    }
}

/// Creates journal objects owned by the connected account
pub struct JournalCreator<C, S> {
    client: C,
    signer: S,
    target: MoveTarget,
    fee: FeeConfiguration,
    coin_type: String,
}

impl<C: ChainClient, S: TransactionSigner> JournalCreator<C, S> {
    pub fn new(client: C, signer: S, package: ObjectId, fee: FeeConfiguration) -> Self {
        Self {
            client,
            signer,
            target: MoveTarget::new_journal(package),
            fee,
            coin_type: SUI_COIN_TYPE.to_string(),
        }
    }

    /// Pay fees in a different coin type
    pub fn with_coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Package, fee settings and fee coin type from a loaded [`Config`]
    pub fn from_config(client: C, signer: S, config: &Config) -> anyhow::Result<Self> {
        let package = config.network.package_id()?;
        Ok(Self::new(client, signer, package, config.gas.fee_configuration())
            .with_coin_type(config.gas.coin_type.clone()))
    }

    /// Run the entry guard, build and validate, without touching the network
    pub fn prepare(&self, account: Option<&str>, title: &str) -> Result<Transaction, JournalError> {
        prepare_journal_transaction(&self.target, &self.fee, account, title)
    }

    /// Run the whole workflow once
    pub async fn submit(&self, account: Option<&str>, title: &str) -> SubmissionReport {
        let mut run = Run::new();
        info!(
            correlation_id = %run.correlation_id,
            target = %self.target,
            "Submitting journal creation"
        );
        let outcome = self.drive(&mut run, account, title).await;
        run.finish(outcome)
    }

    /// Run the workflow and hand the created journal id to `on_created`
    ///
    /// `on_created` is called exactly once on success and never on failure.
    pub async fn create_journal<F>(
        &self,
        account: Option<&str>,
        title: &str,
        on_created: F,
    ) -> Result<ObjectId, JournalError>
    where
        F: FnOnce(&ObjectId),
    {
        let report = self.submit(account, title).await;
        let object_id = report.outcome?;
        on_created(&object_id);
        Ok(object_id)
    }

    async fn drive(
        &self,
        run: &mut Run,
        account: Option<&str>,
        title: &str,
    ) -> Result<ObjectId, JournalError> {
        let owner = check_preconditions(account, title)?;

        run.enter(WorkflowState::Building);
        let tx = build_journal_transaction(&self.target, &self.fee, &owner, title);

        run.enter(WorkflowState::Validating);
        ensure_valid(&tx)?;

        run.enter(WorkflowState::Provisioning);
        let report =
            ensure_sufficient_funds(&self.client, &owner, &self.coin_type, &tx, &self.fee).await?;
        run.provisioning = Some(report);

        run.enter(WorkflowState::AwaitingSignature);
        let receipt = self
            .signer
            .sign_and_execute(tx)
            .await
            .map_err(|e| JournalError::SigningOrExecution(format!("{:#}", e)))?;
        run.digest = Some(receipt.digest.clone());

        run.enter(WorkflowState::AwaitingExecution);
        let effects = self.client.wait_for_transaction(&receipt.digest).await?;

        if let ExecutionStatus::Failure { error } = &effects.status {
            return Err(JournalError::SigningOrExecution(error.clone()));
        }

        effects
            .first_created()
            .ok_or(JournalError::MissingResult {
                digest: receipt.digest,
            })
    }
}

/// new_journal(title), then transfer the result to the owner
pub fn build_journal_transaction(
    target: &MoveTarget,
    fee: &FeeConfiguration,
    owner: &SuiAddress,
    title: &str,
) -> Transaction {
    let mut tx = create_transaction(fee);
    let title_arg = tx.pure_string(title);
    let journal = tx.move_call(target.clone(), vec![], vec![title_arg]);
    let owner_arg = tx.pure_address(&owner.to_string());
    tx.transfer_objects(vec![journal], owner_arg);
    tx
}

/// Entry guard, build and validation in one step
pub fn prepare_journal_transaction(
    target: &MoveTarget,
    fee: &FeeConfiguration,
    account: Option<&str>,
    title: &str,
) -> Result<Transaction, JournalError> {
    let owner = check_preconditions(account, title)?;
    let tx = build_journal_transaction(target, fee, &owner, title);
    ensure_valid(&tx)?;
    Ok(tx)
}

fn check_preconditions(account: Option<&str>, title: &str) -> Result<SuiAddress, JournalError> {
    let account =
        account.ok_or_else(|| JournalError::Precondition("no account connected".to_string()))?;

    if title.trim().is_empty() {
        return Err(JournalError::Precondition("title is empty".to_string()));
    }

    account
        .parse()
        .map_err(|e| JournalError::Precondition(format!("invalid account address: {}", e)))
}

/// Fails only on a bad build; the journal transaction built by `submit` always
/// declares two inputs, so `Validating -> Failed` is not reached from there.
fn ensure_valid(tx: &Transaction) -> Result<(), JournalError> {
    let validation = validate_transaction(tx);
    if validation.valid {
        Ok(())
    } else {
        Err(JournalError::MalformedTransaction(validation.errors))
    }
}
