//! HTTP estimation and proposal backends against mock services.

mod common;

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, B256, U256};
use serde_json::Value;
use tokio::sync::mpsc;

use common::fakes::{call, FakeProposer, Journal, JournalModal, JournalSink};
use common::start_recording_backend;
use stepper_transact::blockchain::Network;
use stepper_transact::config::{GasEstimationConfig, SafeConfig};
use stepper_transact::gas::{self, GasEstimationError, SimulationClient, SimulationRequest};
use stepper_transact::safe::{HttpSafeProposer, SafeError, SafeProposer, SafeTransaction, SafeTxParams};
use stepper_transact::transact::{
    DirectSigner, StepEvent, SubmittedTransaction, TransactError, TransactPayload, TransactionSpec, Transactor,
    WalletState,
};

const SAFE: Address = Address::repeat_byte(0x5a);

fn estimation_config(addr: std::net::SocketAddr) -> GasEstimationConfig {
    GasEstimationConfig {
        endpoint: format!("http://{}/api/tenderly/simulate", addr),
        timeout_secs: 5,
    }
}

fn safe_config(addr: std::net::SocketAddr) -> SafeConfig {
    SafeConfig {
        enabled: true,
        address: SAFE.to_string(),
        proposal_url: format!("http://{}/api/safe/propose", addr),
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_simulation_client_sums_and_buffers() {
    let (addr, recorded) = start_recording_backend(
        200,
        r#"{"simulation_results":[{"simulation":{"gas_used":21000}},{"simulation":{"gas_used":50000}}]}"#,
    )
    .await;
    let client = SimulationClient::new(&estimation_config(addr)).unwrap();

    let data = Bytes::from(vec![0xde, 0xad]);
    let request = SimulationRequest::for_batch(
        137,
        SAFE,
        [(Address::repeat_byte(1), &data), (Address::repeat_byte(2), &data)],
    );
    let gas_limit = gas::estimate_batch_gas(&client, &request).await.unwrap();
    assert_eq!(gas_limit, 78_100);

    let bodies = recorded.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body: Value = serde_json::from_str(&bodies[0]).unwrap();
    let simulations = body["simulations"].as_array().unwrap();
    assert_eq!(simulations.len(), 2);
    for simulation in simulations {
        assert_eq!(simulation["network_id"], "137");
        assert_eq!(simulation["save"], true);
        assert_eq!(simulation["save_if_fails"], true);
        assert_eq!(simulation["value"], 0);
        assert_eq!(simulation["input"], "0xdead");
        assert_eq!(
            simulation["from"].as_str().unwrap().to_lowercase(),
            SAFE.to_string().to_lowercase()
        );
    }
}

#[tokio::test]
async fn test_simulation_client_reports_status() {
    let (addr, _recorded) = start_recording_backend(500, r#"{"error":"upstream"}"#).await;
    let client = SimulationClient::new(&estimation_config(addr)).unwrap();
    let request = SimulationRequest::for_batch(1, SAFE, std::iter::empty::<(Address, &Bytes)>());

    let err = gas::estimate_batch_gas(&client, &request).await.unwrap_err();
    assert!(matches!(err, GasEstimationError::Status { status: 500, ref body } if body.contains("upstream")));
}

#[tokio::test]
async fn test_malformed_estimate_aborts_safe_flow_before_signature() {
    let (addr, recorded) = start_recording_backend(200, r#"{"results":[]}"#).await;
    let journal = Journal::default();
    let proposer = Arc::new(FakeProposer::new(journal.clone()));
    let transactor = Transactor::new(
        Arc::new(JournalModal(journal.clone())),
        Arc::new(SimulationClient::new(&estimation_config(addr)).unwrap()),
    )
    .with_safe_proposer(proposer.clone());
    let wallet = WalletState::new(Network::new(1, "mainnet")).with_safe(SAFE);
    let payload: TransactPayload =
        TransactPayload::new(|_| vec![TransactionSpec::populated(call(1)), TransactionSpec::populated(call(2))]);

    let (tx, mut rx) = mpsc::unbounded_channel::<StepEvent>();
    transactor.transact(&tx, &wallet, payload).unwrap();
    let StepEvent::Await(step) = rx.recv().await.unwrap();
    let err = step.run(Arc::new(JournalSink(journal.clone()))).await.unwrap_err();

    assert!(matches!(
        err,
        TransactError::GasEstimation(GasEstimationError::Malformed(_))
    ));
    assert_eq!(recorded.lock().unwrap().len(), 1);
    assert!(journal.entries_with_prefix("status").is_empty());
    assert!(proposer.proposals.lock().unwrap().is_empty());
    assert_eq!(journal.entries(), vec!["hideable=false", "hideable=true"]);
}

#[tokio::test]
async fn test_proposal_body_and_hash() {
    let hash = B256::repeat_byte(0xab);
    let response: &'static str = Box::leak(format!(r#"{{"safeTxHash":"{}"}}"#, hash).into_boxed_str());
    let (addr, recorded) = start_recording_backend(200, response).await;
    let proposer = HttpSafeProposer::new(&safe_config(addr)).unwrap();

    let txs = vec![
        SafeTransaction {
            to: Address::repeat_byte(1),
            data: Bytes::from(vec![0x01]),
            value: "0".into(),
        },
        SafeTransaction {
            to: Address::repeat_byte(2),
            data: Bytes::from(vec![0x02]),
            value: "0".into(),
        },
    ];
    let returned = proposer
        .propose_batch(&txs, SafeTxParams::with_gas(78_100))
        .await
        .unwrap();
    assert_eq!(returned, hash);

    let body: Value = serde_json::from_str(&recorded.lock().unwrap()[0]).unwrap();
    assert_eq!(body["params"]["safeTxGas"], 78_100);
    let sent = body["txs"].as_array().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0]["value"], "0");
    assert_eq!(sent[1]["data"], "0x02");
}

#[tokio::test]
async fn test_single_call_proposed_without_gas() {
    let hash = B256::repeat_byte(0xcd);
    let response: &'static str = Box::leak(format!(r#"{{"safeTxHash":"{}"}}"#, hash).into_boxed_str());
    let (addr, recorded) = start_recording_backend(200, response).await;
    let proposer = HttpSafeProposer::new(&safe_config(addr)).unwrap();

    let submitted = proposer.send_transaction(&call(3)).await.unwrap();
    assert_eq!(submitted.hash(), hash);

    let body: Value = serde_json::from_str(&recorded.lock().unwrap()[0]).unwrap();
    assert_eq!(body["txs"].as_array().unwrap().len(), 1);
    assert!(body["params"].get("safeTxGas").is_none());
}

#[tokio::test]
async fn test_proposal_rejected_by_service() {
    let (addr, _recorded) = start_recording_backend(400, r#"{"message":"bad nonce"}"#).await;
    let proposer = HttpSafeProposer::new(&safe_config(addr)).unwrap();

    let err = proposer
        .propose_batch(&[], SafeTxParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SafeError::Status { status: 400, .. }));
}

#[tokio::test]
async fn test_single_value_transfer_is_not_proposed() {
    let (addr, recorded) = start_recording_backend(200, r#"{"safeTxHash":"0x00"}"#).await;
    let proposer = HttpSafeProposer::new(&safe_config(addr)).unwrap();

    let transfer = call(3).with_value(U256::from(1_000_000_000_000_000_000u128));
    let err = proposer.send_transaction(&transfer).await.err().unwrap();

    assert!(matches!(err, TransactError::Safe(SafeError::InvalidCall(_))));
    assert!(recorded.lock().unwrap().is_empty());
}
