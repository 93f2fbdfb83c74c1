// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Scripted mock collaborators and fixtures shared across unit tests.

use crate::avail_connection::AvailConnector;
use crate::avail_driver::{
    AvailRuntime, AvailSigner, ExtrinsicStatus, ExtrinsicWatcher, SubmitError, VectorExecuteCall,
};
use crate::error::{ClaimError, ClaimResult};
use crate::eth_driver::{EthBridgeWallet, ReceiveMessageTuple, ReceiveProofTuple, WalletError};
use crate::ledger::TransactionSink;
use crate::orchestrator::AvailWallet;
use crate::proof_client::ProofApi;
use crate::types::{
    AccountStorageProofs, AddressedMessage, AvailHead, BridgedMessage, Chain, DataType, EthHead,
    FetchedHeads, FungibleToken, MerkleProof, MessagePayload, Transaction, TransactionStatus,
    NATIVE_ASSET_ID,
};
use async_trait::async_trait;
use ethers::types::{Address as EthAddress, H256, U256};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Install a test subscriber once so `RUST_LOG` controls log output under
/// `cargo test`. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ---------- fixtures ----------

pub fn transaction_fixture(source: Chain, index: u32, status: TransactionStatus) -> Transaction {
    Transaction {
        source_chain: source,
        destination_chain: source.counterpart(),
        source_transaction_hash: H256::repeat_byte(index as u8),
        source_transaction_index: index,
        source_block_hash: H256::repeat_byte(0xb0 ^ index as u8),
        source_block_number: 100 + index as u64,
        source_timestamp: 1_700_000_000_000 + index as u64,
        destination_transaction_hash: None,
        amount: U256::from(1_000_000_000_000_000_000u64),
        depositor_address: "0x90c2b01a9759b9c1c5bd5c64577a5b6f80b4f9e1".to_string(),
        receiver_address: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string(),
        message_id: index as u64,
        data_type: DataType::Erc20,
        status,
    }
}

pub fn merkle_proof_fixture(message_id: u64, amount: U256) -> MerkleProof {
    MerkleProof {
        message: BridgedMessage {
            from: H256::repeat_byte(0x01),
            to: H256::repeat_byte(0x02),
            origin_domain: 1,
            destination_domain: 2,
            id: message_id,
            message: MessagePayload {
                fungible_token: FungibleToken {
                    asset_id: NATIVE_ASSET_ID,
                    amount,
                },
            },
        },
        data_root_proof: vec![H256::repeat_byte(0x10)],
        leaf_proof: vec![H256::repeat_byte(0x20)],
        range_hash: H256::repeat_byte(0x30),
        data_root_index: 4,
        blob_root: H256::repeat_byte(0x40),
        bridge_root: H256::repeat_byte(0x50),
        leaf: H256::repeat_byte(0x60),
        leaf_index: 5,
    }
}

pub fn addressed_message(message_id: u64) -> AddressedMessage {
    AddressedMessage {
        message: MessagePayload {
            fungible_token: FungibleToken {
                asset_id: NATIVE_ASSET_ID,
                amount: U256::from(1u64),
            },
        },
        from: "0x90c2b01a9759b9c1c5bd5c64577a5b6f80b4f9e1".to_string(),
        to: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string(),
        origin_domain: 2,
        destination_domain: 1,
        id: message_id,
    }
}

pub fn fetched_heads_fixture(slot: u64) -> FetchedHeads {
    FetchedHeads {
        latest_block_hash: H256::repeat_byte(0xfa),
        avail_head: AvailHead {
            end_timestamp: 1_700_000_000_000,
        },
        eth_head: EthHead {
            slot,
            timestamp: 1_700_000_000,
        },
    }
}

pub fn avail_signer_fixture() -> AvailSigner {
    AvailSigner {
        address: "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY".to_string(),
        source: "talisman".to_string(),
    }
}

// ---------- AVAIL runtime ----------

#[derive(Debug)]
pub struct MockAvailRuntime {
    connected: AtomicBool,
    statuses: Mutex<Vec<ExtrinsicStatus>>,
    submit_error: Mutex<Option<SubmitError>>,
    heads: Mutex<ClaimResult<FetchedHeads>>,
    calls: Mutex<Vec<VectorExecuteCall>>,
}

impl MockAvailRuntime {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(true),
            statuses: Mutex::new(Vec::new()),
            submit_error: Mutex::new(None),
            heads: Mutex::new(Ok(fetched_heads_fixture(123))),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_statuses(self, statuses: Vec<ExtrinsicStatus>) -> Self {
        *self.statuses.lock().unwrap() = statuses;
        self
    }

    pub fn with_submit_error(self, err: SubmitError) -> Self {
        *self.submit_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_heads(self, heads: FetchedHeads) -> Self {
        *self.heads.lock().unwrap() = Ok(heads);
        self
    }

    pub fn with_heads_error(self, err: ClaimError) -> Self {
        *self.heads.lock().unwrap() = Err(err);
        self
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn recorded_calls(&self) -> Vec<VectorExecuteCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AvailRuntime for MockAvailRuntime {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn latest_heads(&self) -> anyhow::Result<FetchedHeads> {
        match self.heads.lock().unwrap().clone() {
            Ok(heads) => Ok(heads),
            Err(e) => Err(anyhow::anyhow!(e.to_string())),
        }
    }

    async fn submit_vector_execute(
        &self,
        call: VectorExecuteCall,
        _signer: &AvailSigner,
    ) -> Result<ExtrinsicWatcher, SubmitError> {
        self.calls.lock().unwrap().push(call);
        if let Some(err) = self.submit_error.lock().unwrap().clone() {
            return Err(err);
        }
        let statuses = self.statuses.lock().unwrap().clone();
        let (tx, watcher) = ExtrinsicWatcher::channel(statuses.len().max(1));
        for status in statuses {
            // Buffer is sized for the script; try_send cannot fail here.
            tx.try_send(status).expect("scripted status overflow");
        }
        // Dropping the sender ends the stream after the script is consumed.
        Ok(watcher)
    }
}

// ---------- connector ----------

enum ConnectorMode {
    Succeed,
    FailAlways(String),
    FailTimes(u32),
}

pub struct MockConnector {
    mode: ConnectorMode,
    attempts: AtomicU32,
    current: Mutex<Option<Arc<MockAvailRuntime>>>,
}

impl MockConnector {
    pub fn succeeding() -> Self {
        Self {
            mode: ConnectorMode::Succeed,
            attempts: AtomicU32::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn always_failing(msg: &str) -> Self {
        Self {
            mode: ConnectorMode::FailAlways(msg.to_string()),
            attempts: AtomicU32::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn failing_times(n: u32) -> Self {
        Self {
            mode: ConnectorMode::FailTimes(n),
            attempts: AtomicU32::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn disconnect_current(&self) {
        if let Some(runtime) = self.current.lock().unwrap().as_ref() {
            runtime.set_connected(false);
        }
    }
}

#[async_trait]
impl AvailConnector for MockConnector {
    async fn connect(&self) -> anyhow::Result<Arc<dyn AvailRuntime>> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.mode {
            ConnectorMode::Succeed => {}
            ConnectorMode::FailAlways(msg) => return Err(anyhow::anyhow!(msg.clone())),
            ConnectorMode::FailTimes(n) => {
                if attempt <= *n {
                    return Err(anyhow::anyhow!("connect attempt {attempt} failed"));
                }
            }
        }
        let runtime = Arc::new(MockAvailRuntime::new());
        *self.current.lock().unwrap() = Some(runtime.clone());
        Ok(runtime)
    }
}

/// Connector that always hands out the same pre-built runtime. Used by
/// orchestrator tests that need to script submissions up front.
pub struct FixedConnector {
    runtime: Arc<MockAvailRuntime>,
}

impl FixedConnector {
    pub fn new(runtime: Arc<MockAvailRuntime>) -> Self {
        Self { runtime }
    }
}

#[async_trait]
impl AvailConnector for FixedConnector {
    async fn connect(&self) -> anyhow::Result<Arc<dyn AvailRuntime>> {
        Ok(self.runtime.clone())
    }
}

// ---------- ETH wallet ----------

pub struct MockEthWallet {
    address: Option<EthAddress>,
    active_chain: Mutex<u64>,
    switch_error: Mutex<Option<WalletError>>,
    receive_result: Mutex<Option<Result<H256, WalletError>>>,
    receive_delay: Mutex<Duration>,
    receive_calls: Mutex<Vec<ReceiveMessageTuple>>,
    switch_requests: Mutex<Vec<u64>>,
}

impl MockEthWallet {
    pub fn connected(chain_id: u64) -> Self {
        Self {
            address: Some(EthAddress::repeat_byte(0xee)),
            active_chain: Mutex::new(chain_id),
            switch_error: Mutex::new(None),
            receive_result: Mutex::new(Some(Ok(H256::repeat_byte(0xaa)))),
            receive_delay: Mutex::new(Duration::ZERO),
            receive_calls: Mutex::new(Vec::new()),
            switch_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn disconnected() -> Self {
        let mut wallet = Self::connected(0);
        wallet.address = None;
        wallet
    }

    pub fn with_switch_error(self, err: WalletError) -> Self {
        *self.switch_error.lock().unwrap() = Some(err);
        self
    }

    pub fn with_receive_result(self, result: Result<H256, WalletError>) -> Self {
        *self.receive_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_receive_delay(self, delay: Duration) -> Self {
        *self.receive_delay.lock().unwrap() = delay;
        self
    }

    pub fn receive_calls(&self) -> Vec<ReceiveMessageTuple> {
        self.receive_calls.lock().unwrap().clone()
    }

    pub fn switch_requests(&self) -> Vec<u64> {
        self.switch_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl EthBridgeWallet for MockEthWallet {
    fn connected_address(&self) -> Option<EthAddress> {
        self.address
    }

    async fn active_chain_id(&self) -> Result<u64, WalletError> {
        Ok(*self.active_chain.lock().unwrap())
    }

    async fn switch_network(&self, chain_id: u64) -> Result<(), WalletError> {
        self.switch_requests.lock().unwrap().push(chain_id);
        if let Some(err) = self.switch_error.lock().unwrap().clone() {
            return Err(err);
        }
        *self.active_chain.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn receive_avail(
        &self,
        message: ReceiveMessageTuple,
        _proof: ReceiveProofTuple,
    ) -> Result<H256, WalletError> {
        let delay = *self.receive_delay.lock().unwrap();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
        self.receive_calls.lock().unwrap().push(message);
        self.receive_result
            .lock()
            .unwrap()
            .clone()
            .expect("receive result not scripted")
    }
}

// ---------- AVAIL wallet ----------

pub struct MockAvailWallet {
    account: Option<AvailSigner>,
}

impl MockAvailWallet {
    pub fn selected() -> Self {
        Self {
            account: Some(avail_signer_fixture()),
        }
    }

    pub fn none() -> Self {
        Self { account: None }
    }
}

impl AvailWallet for MockAvailWallet {
    fn selected_account(&self) -> Option<AvailSigner> {
        self.account.clone()
    }
}

// ---------- proof API ----------

pub struct MockProofApi {
    merkle: Mutex<VecDeque<ClaimResult<MerkleProof>>>,
    storage: Mutex<VecDeque<ClaimResult<AccountStorageProofs>>>,
    avail_head: Mutex<ClaimResult<AvailHead>>,
    eth_head: Mutex<ClaimResult<EthHead>>,
    merkle_requests: Mutex<Vec<(H256, u32)>>,
    storage_requests: Mutex<Vec<(H256, u64)>>,
}

impl MockProofApi {
    pub fn new() -> Self {
        Self {
            merkle: Mutex::new(VecDeque::new()),
            storage: Mutex::new(VecDeque::new()),
            avail_head: Mutex::new(Ok(AvailHead {
                end_timestamp: 1_700_000_000_000,
            })),
            eth_head: Mutex::new(Ok(EthHead {
                slot: 123,
                timestamp: 1_700_000_000,
            })),
            merkle_requests: Mutex::new(Vec::new()),
            storage_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push_merkle(&self, result: ClaimResult<MerkleProof>) {
        self.merkle.lock().unwrap().push_back(result);
    }

    pub fn push_storage(&self, result: ClaimResult<AccountStorageProofs>) {
        self.storage.lock().unwrap().push_back(result);
    }

    pub fn merkle_requests(&self) -> Vec<(H256, u32)> {
        self.merkle_requests.lock().unwrap().clone()
    }

    pub fn storage_requests(&self) -> Vec<(H256, u64)> {
        self.storage_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProofApi for MockProofApi {
    async fn merkle_proof(&self, block_hash: H256, tx_index: u32) -> ClaimResult<MerkleProof> {
        self.merkle_requests
            .lock()
            .unwrap()
            .push((block_hash, tx_index));
        self.merkle
            .lock()
            .unwrap()
            .pop_front()
            .expect("merkle proof not scripted")
    }

    async fn account_storage_proofs(
        &self,
        block_hash: H256,
        message_id: u64,
    ) -> ClaimResult<AccountStorageProofs> {
        self.storage_requests
            .lock()
            .unwrap()
            .push((block_hash, message_id));
        self.storage
            .lock()
            .unwrap()
            .pop_front()
            .expect("storage proofs not scripted")
    }

    async fn avail_head(&self) -> ClaimResult<AvailHead> {
        self.avail_head.lock().unwrap().clone()
    }

    async fn eth_head(&self) -> ClaimResult<EthHead> {
        self.eth_head.lock().unwrap().clone()
    }
}

// ---------- ledger sinks ----------

pub struct RecordingSink {
    persisted: Mutex<Vec<Transaction>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            persisted: Mutex::new(Vec::new()),
        }
    }

    pub fn persisted(&self) -> Vec<Transaction> {
        self.persisted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSink for RecordingSink {
    async fn persist(&self, record: &Transaction) -> anyhow::Result<()> {
        self.persisted.lock().unwrap().push(record.clone());
        Ok(())
    }
}

pub struct FailingSink;

#[async_trait]
impl TransactionSink for FailingSink {
    async fn persist(&self, _record: &Transaction) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("storage unavailable"))
    }
}
