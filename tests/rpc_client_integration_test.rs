//! Integration tests for the JSON-RPC client
//!
//! This test validates:
//! - Coin pagination follows nextCursor until hasNextPage is false
//! - A cursor that does not advance ends pagination
//! - RPC error objects and HTTP failures map to ProviderError
//! - Finality polling retries "not found" answers and times out

use journal_tx::client::{
    ChainClient, ExecutionStatus, ProviderError, RpcClient, RpcSettings, SUI_COIN_TYPE,
};
use journal_tx::types::{ObjectId, SuiAddress};
use mockito::Matcher;
use serde_json::json;
use std::time::Duration;

fn owner() -> SuiAddress {
    "0x7".parse().unwrap()
}

fn settings() -> RpcSettings {
    RpcSettings {
        request_timeout: Duration::from_secs(5),
        wait_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(20),
    }
}

fn coin_json(id: &str, balance: &str) -> serde_json::Value {
    json!({
        "coinType": SUI_COIN_TYPE,
        "coinObjectId": id,
        "version": "10",
        "digest": "HdfF8cFz",
        "balance": balance,
        "previousTransaction": "Fv3x"
    })
}

fn rpc_result(result: serde_json::Value) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string()
}

#[tokio::test]
async fn test_get_coins_follows_pagination() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "suix_getCoins",
            "params": [owner().to_string(), SUI_COIN_TYPE, null, 50]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "data": [coin_json("0x1", "150000000")],
            "nextCursor": "0x1",
            "hasNextPage": true
        })))
        .create_async()
        .await;

    let second = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "suix_getCoins",
            "params": [owner().to_string(), SUI_COIN_TYPE, "0x1", 50]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "data": [coin_json("0x2", "50000000")],
            "nextCursor": "0x2",
            "hasNextPage": false
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let coins = client.get_coins(&owner(), SUI_COIN_TYPE).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(coins.len(), 2);
    assert_eq!(coins[0].balance, 150_000_000);
    assert_eq!(coins[1].balance, 50_000_000);
}

#[tokio::test]
async fn test_get_coins_stops_on_stuck_cursor() {
    let mut server = mockito::Server::new_async().await;

    let first = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "params": [owner().to_string(), SUI_COIN_TYPE, null, 50]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "data": [coin_json("0x1", "10")],
            "nextCursor": "0x1",
            "hasNextPage": true
        })))
        .expect(1)
        .create_async()
        .await;

    let repeated = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "params": [owner().to_string(), SUI_COIN_TYPE, "0x1", 50]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "data": [coin_json("0x2", "20")],
            "nextCursor": "0x1",
            "hasNextPage": true
        })))
        .expect(1)
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let coins = client.get_coins(&owner(), SUI_COIN_TYPE).await.unwrap();

    first.assert_async().await;
    repeated.assert_async().await;
    assert_eq!(coins.len(), 2);
}

#[tokio::test]
async fn test_rpc_error_object() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": -32602, "message": "Invalid params" }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let err = client.get_coins(&owner(), SUI_COIN_TYPE).await.unwrap_err();

    assert!(matches!(
        err,
        ProviderError::RpcResponse { code: Some(-32602), .. }
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_http_failure_is_retryable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let err = client.get_coins(&owner(), SUI_COIN_TYPE).await.unwrap_err();

    assert!(matches!(
        err,
        ProviderError::RpcResponse { code: Some(503), .. }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_undecodable_balance() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "data": [coin_json("0x1", "not-a-number")],
            "nextCursor": null,
            "hasNextPage": false
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let err = client.get_coins(&owner(), SUI_COIN_TYPE).await.unwrap_err();

    assert!(matches!(err, ProviderError::Decode { .. }));
}

#[tokio::test]
async fn test_wait_for_transaction_returns_effects() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "sui_getTransactionBlock",
            "params": ["8Fq1", { "showEffects": true }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(rpc_result(json!({
            "digest": "8Fq1",
            "effects": {
                "status": { "status": "success" },
                "created": [{
                    "owner": { "AddressOwner": "0x7" },
                    "reference": { "objectId": "0xabc", "version": 5, "digest": "Ay1" }
                }]
            }
        })))
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let effects = client.wait_for_transaction("8Fq1").await.unwrap();

    mock.assert_async().await;
    assert_eq!(effects.status, ExecutionStatus::Success);
    assert_eq!(effects.first_created(), Some("0xabc".parse::<ObjectId>().unwrap()));
}

#[tokio::test]
async fn test_wait_for_transaction_times_out_while_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": {
                    "code": -32602,
                    "message": "Could not find the referenced transaction [TransactionDigest(8Fq1)]."
                }
            })
            .to_string(),
        )
        .expect_at_least(2)
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), settings()).unwrap();
    let err = client.wait_for_transaction("8Fq1").await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, ProviderError::Timeout { timeout_ms: 300, .. }));
}
