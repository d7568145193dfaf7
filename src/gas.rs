//! Gas provisioning
//!
//! Checks that an address holds enough of the fee currency before a transaction
//! is handed to the signer. The check is read-only; when the account is spread
//! over many small coins the report carries a [`ConsolidationAdvice`] and the
//! caller decides whether to run [`build_consolidation_transaction`].

use crate::client::{ChainClient, CoinRecord};
use crate::errors::JournalError;
use crate::tx_builder::{create_transaction, Argument, FeeConfiguration, Transaction};
use crate::types::SuiAddress;
use crate::units::{format_sui, Mist};
use serde::Serialize;
use tracing::{debug, warn};

/// Minimum balance required when no fee budget is configured (0.1 SUI)
pub const DEFAULT_MIN_GAS_BALANCE: u64 = 100_000_000;

/// Coin count above which consolidation is advised
pub const CONSOLIDATION_THRESHOLD: usize = 5;

/// Hint that the account holds many coins that could be merged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsolidationAdvice {
    pub coin_count: usize,
    pub coins: Vec<CoinRecord>,
}

/// Result of a successful provisioning check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvisioningReport {
    pub total_balance: Mist,
    pub required: Mist,
    pub coin_count: usize,
    pub consolidation: Option<ConsolidationAdvice>,
}

/// Minimum balance the account must hold for the given fee configuration
pub fn required_balance(config: &FeeConfiguration) -> Mist {
    Mist::from(config.budget.unwrap_or(DEFAULT_MIN_GAS_BALANCE))
}

/// Verify that `address` holds at least the required amount of `coin_type`
///
/// Coins are fetched fresh on every call. The transaction is not modified.
pub async fn ensure_sufficient_funds<C: ChainClient + ?Sized>(
    client: &C,
    address: &SuiAddress,
    coin_type: &str,
    _tx: &Transaction,
    config: &FeeConfiguration,
) -> Result<ProvisioningReport, JournalError> {
    let coins = client.get_coins(address, coin_type).await?;

    if coins.is_empty() {
        return Err(JournalError::NoFunds {
            address: address.to_string(),
        });
    }

    let total_balance: Mist = coins.iter().map(|c| Mist::from(c.balance)).sum();
    let required = required_balance(config);
    debug!(
        address = %address,
        coin_count = coins.len(),
        total_balance = %total_balance,
        required = %required,
        "Gas balance checked"
    );

    if total_balance < required {
        return Err(JournalError::InsufficientFunds {
            available: total_balance,
            required,
        });
    }

    let coin_count = coins.len();
    let consolidation = if coin_count > CONSOLIDATION_THRESHOLD {
        warn!(
            address = %address,
            coin_count,
            total_sui = %format_sui(total_balance),
            "Many small coins held; consider merging them for cheaper transactions"
        );
        Some(ConsolidationAdvice { coin_count, coins })
    } else {
        None
    };

    Ok(ProvisioningReport {
        total_balance,
        required,
        coin_count,
        consolidation,
    })
}

/// Build a transaction that merges the advised coins into the gas coin
///
/// The largest coin is left out of the inputs so the wallet can pick it as gas;
/// every other coin is merged into `GasCoin`. At most
/// `config.max_fee_object_count` coins take part, gas coin included. Returns
/// `None` when no coin would be merged.
pub fn build_consolidation_transaction(
    advice: &ConsolidationAdvice,
    config: &FeeConfiguration,
) -> Option<Transaction> {
    let limit = config
        .max_fee_object_count
        .map(|n| n as usize)
        .unwrap_or(usize::MAX);

    // Descending by balance; coins[0] is the one the wallet pays with
    let mut coins: Vec<&CoinRecord> = advice.coins.iter().collect();
    coins.sort_by(|a, b| b.balance.cmp(&a.balance));
    coins.truncate(limit);

    if coins.len() < 2 {
        return None;
    }

    let mut tx = create_transaction(config);
    let sources = coins[1..]
        .iter()
        .map(|c| tx.object(c.object_ref()))
        .collect();
    tx.merge_coins(Argument::GasCoin, sources);
    Some(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SUI_COIN_TYPE;
    use crate::test_utils::{coin, MockChainClient};
    use crate::tx_builder::{CallArg, Command};

    fn owner() -> SuiAddress {
        "0x7".parse().unwrap()
    }

    async fn check(
        balances: &[u64],
        config: FeeConfiguration,
    ) -> Result<ProvisioningReport, JournalError> {
        let client = MockChainClient::with_balances(balances);
        ensure_sufficient_funds(&client, &owner(), SUI_COIN_TYPE, &Transaction::new(), &config)
            .await
    }

    #[tokio::test]
    async fn test_no_coins_fails_regardless_of_budget() {
        for budget in [None, Some(0), Some(1), Some(u64::MAX)] {
            let config = FeeConfiguration {
                budget,
                ..Default::default()
            };
            let err = check(&[], config).await.unwrap_err();
            assert!(matches!(err, JournalError::NoFunds { .. }), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_exact_balance_is_sufficient() {
        let report = check(&[60_000_000, 40_000_000], FeeConfiguration::default())
            .await
            .unwrap();
        assert_eq!(report.total_balance, Mist(100_000_000));
        assert_eq!(report.required, Mist(DEFAULT_MIN_GAS_BALANCE as u128));
        assert!(report.consolidation.is_none());
    }

    #[tokio::test]
    async fn test_one_unit_short_reports_deficit() {
        let err = check(&[499_999], FeeConfiguration::with_budget(500_000))
            .await
            .unwrap_err();
        assert_eq!(err.deficit(), Some(Mist(1)));
        assert!(err.to_string().contains("short by 1 MIST"));
    }

    #[tokio::test]
    async fn test_large_balances_sum_exactly() {
        let report = check(&[u64::MAX, u64::MAX], FeeConfiguration::with_budget(u64::MAX))
            .await
            .unwrap();
        assert_eq!(report.total_balance, Mist(2 * u64::MAX as u128));
    }

    #[tokio::test]
    async fn test_many_coins_yield_advice_only() {
        let report = check(&[30_000_000; 6], FeeConfiguration::default())
            .await
            .unwrap();
        let advice = report.consolidation.expect("advice");
        assert_eq!(advice.coin_count, 6);
        assert_eq!(advice.coins.len(), 6);

        let five = check(&[30_000_000; 5], FeeConfiguration::default())
            .await
            .unwrap();
        assert!(five.consolidation.is_none());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let client = MockChainClient::failing_coins();
        let err = ensure_sufficient_funds(
            &client,
            &owner(),
            SUI_COIN_TYPE,
            &Transaction::new(),
            &FeeConfiguration::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, JournalError::Provider(_)));
    }

    #[test]
    fn test_consolidation_merges_into_gas_coin() {
        let coins = vec![coin(1, 10), coin(2, 30), coin(3, 20)];
        let advice = ConsolidationAdvice {
            coin_count: coins.len(),
            coins: coins.clone(),
        };
        let tx = build_consolidation_transaction(&advice, &FeeConfiguration::with_budget(5_000_000))
            .expect("transaction");
        let data = tx.data().unwrap();

        assert_eq!(data.fee.budget, Some(5_000_000));
        assert_eq!(data.inputs.len(), coins.len() - 1);
        let largest = coin(2, 30).coin_object_id;
        for input in &data.inputs {
            let CallArg::Object(object) = input else {
                panic!("expected object input");
            };
            assert_ne!(object.object_id, largest);
        }

        assert_eq!(data.commands.len(), 1);
        let Command::MergeCoins { destination, sources } = &data.commands[0] else {
            panic!("expected merge");
        };
        assert_eq!(*destination, Argument::GasCoin);
        assert_eq!(sources, &vec![Argument::Input(0), Argument::Input(1)]);
    }

    #[test]
    fn test_consolidation_of_six_equal_coins_keeps_one_for_gas() {
        let advice = ConsolidationAdvice {
            coin_count: 6,
            coins: (1..=6).map(|i| coin(i, 30_000_000)).collect(),
        };
        let tx = build_consolidation_transaction(&advice, &FeeConfiguration::with_budget(5_000_000))
            .unwrap();
        assert_eq!(tx.input_count(), 5);
        assert!(matches!(
            &tx.data().unwrap().commands[0],
            Command::MergeCoins { destination: Argument::GasCoin, .. }
        ));
    }

    #[test]
    fn test_consolidation_respects_object_limit() {
        let advice = ConsolidationAdvice {
            coin_count: 4,
            coins: vec![coin(1, 10), coin(2, 20), coin(3, 30), coin(4, 40)],
        };
        let config = FeeConfiguration {
            max_fee_object_count: Some(3),
            ..Default::default()
        };
        let tx = build_consolidation_transaction(&advice, &config).unwrap();
        assert_eq!(tx.input_count(), 2);

        let config = FeeConfiguration {
            max_fee_object_count: Some(1),
            ..Default::default()
        };
        assert!(build_consolidation_transaction(&advice, &config).is_none());
    }
}
