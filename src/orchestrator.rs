// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Claim orchestration for both bridge directions.
//!
//! The orchestrator sequences one claim end to end: preconditions, proof
//! fetch, destination-chain submission, ledger append. It holds no chain
//! state of its own; wallets, the proof service, the AVAIL runtime and the
//! ledger are collaborators. At most one claim per transfer key is in
//! flight at a time, and a transfer whose claim was already submitted is
//! refused up front.

use crate::avail_connection::SharedAvailConnection;
use crate::avail_driver::{AvailSigner, AvailSubmissionDriver, VectorExecuteCall};
use crate::config::EthNetworkConfig;
use crate::error::{ClaimError, ClaimResult};
use crate::eth_driver::{EthBridgeWallet, EthSubmissionDriver};
use crate::head_tracker::HeadTracker;
use crate::ledger::LocalTransactionLedger;
use crate::metrics::ClaimMetrics;
use crate::proof_client::ProofApi;
use crate::types::{
    pad_to_bytes32_hex, AddressedMessage, Chain, ExecuteParams, FungibleToken, MessagePayload,
    Transaction, TransactionStatus, TxKey, NATIVE_ASSET_ID,
};
use ethers::types::{H256, U256};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

const DIRECTION_AVAIL_TO_ETH: &str = "avail_to_eth";
const DIRECTION_ETH_TO_AVAIL: &str = "eth_to_avail";

/// An AVAIL wallet able to name the account that will sign `vector.execute`.
/// Account selection UI lives outside this crate.
pub trait AvailWallet: Send + Sync {
    fn selected_account(&self) -> Option<AvailSigner>;
}

/// Result of a settled claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimOutcome {
    /// Transaction hash (ETH) or inclusion block hash (AVAIL) on the
    /// destination chain.
    pub destination_tx_hash: H256,
    /// Set when the claim went through on chain but the local ledger append
    /// failed. The claim itself still succeeded.
    pub ledger_warning: Option<String>,
}

pub struct ClaimOrchestrator {
    eth_wallet: Arc<dyn EthBridgeWallet>,
    avail_wallet: Arc<dyn AvailWallet>,
    proof_api: Arc<dyn ProofApi>,
    connection: Arc<SharedAvailConnection>,
    heads: Arc<HeadTracker>,
    ledger: Arc<LocalTransactionLedger>,
    eth_network: EthNetworkConfig,
    metrics: ClaimMetrics,
    in_flight: Mutex<HashSet<TxKey>>,
}

/// Removes its key from the in-flight set when the claim settles, on every
/// exit path.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<TxKey>>,
    key: TxKey,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut set = self.set.lock().unwrap_or_else(|e| e.into_inner());
        set.remove(&self.key);
    }
}

impl ClaimOrchestrator {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eth_wallet: Arc<dyn EthBridgeWallet>,
        avail_wallet: Arc<dyn AvailWallet>,
        proof_api: Arc<dyn ProofApi>,
        connection: Arc<SharedAvailConnection>,
        heads: Arc<HeadTracker>,
        ledger: Arc<LocalTransactionLedger>,
        eth_network: EthNetworkConfig,
        metrics: ClaimMetrics,
    ) -> Self {
        Self {
            eth_wallet,
            avail_wallet,
            proof_api,
            connection,
            heads,
            ledger,
            eth_network,
            metrics,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Claim an AVAIL-origin transfer on Ethereum via `receiveAVAIL`.
    pub async fn claim_avail_to_eth(&self, tx: &Transaction) -> ClaimResult<ClaimOutcome> {
        self.instrumented(DIRECTION_AVAIL_TO_ETH, self.avail_to_eth_inner(tx))
            .await
    }

    /// Claim an ETH-origin transfer on AVAIL via `vector.execute`.
    pub async fn claim_eth_to_avail(
        &self,
        tx: &Transaction,
        params: &ExecuteParams,
    ) -> ClaimResult<ClaimOutcome> {
        self.instrumented(DIRECTION_ETH_TO_AVAIL, self.eth_to_avail_inner(tx, params))
            .await
    }

    async fn instrumented<F>(&self, direction: &str, claim: F) -> ClaimResult<ClaimOutcome>
    where
        F: Future<Output = ClaimResult<ClaimOutcome>>,
    {
        self.metrics
            .claims_started
            .with_label_values(&[direction])
            .inc();
        let timer = self
            .metrics
            .claim_latency
            .with_label_values(&[direction])
            .start_timer();
        let result = claim.await;
        timer.observe_duration();
        match &result {
            Ok(outcome) => {
                self.metrics
                    .claims_succeeded
                    .with_label_values(&[direction])
                    .inc();
                info!(
                    direction,
                    destination_tx_hash = ?outcome.destination_tx_hash,
                    "claim settled"
                );
            }
            Err(e) => {
                self.metrics
                    .claims_failed
                    .with_label_values(&[direction, e.error_type()])
                    .inc();
                warn!(direction, error = %e, "claim failed");
            }
        }
        result
    }

    async fn avail_to_eth_inner(&self, tx: &Transaction) -> ClaimResult<ClaimOutcome> {
        if tx.source_chain != Chain::Avail {
            return Err(ClaimError::Unknown(format!(
                "AVAIL->ETH claim for a {}-origin transfer",
                tx.source_chain
            )));
        }
        let _guard = self.begin(tx.key())?;
        if self.ledger.claim_submitted(&tx.key()).await {
            return Err(ClaimError::AlreadyProcessed);
        }
        if self.eth_wallet.connected_address().is_none() {
            return Err(ClaimError::NoEthAccount);
        }

        // Proof fetch comes before network validation: a missing proof is
        // reported even when the wallet sits on the wrong network.
        let proof = self
            .proof_api
            .merkle_proof(tx.source_block_hash, tx.source_transaction_index)
            .await;
        self.note_proof_fetch("merkle", proof.is_ok());
        let proof = proof?;

        self.ensure_eth_network().await?;

        let tx_hash = EthSubmissionDriver::submit(self.eth_wallet.as_ref(), &proof).await?;
        let ledger_warning = self.append_claim_pending(tx, tx_hash).await;
        Ok(ClaimOutcome {
            destination_tx_hash: tx_hash,
            ledger_warning,
        })
    }

    async fn eth_to_avail_inner(
        &self,
        tx: &Transaction,
        params: &ExecuteParams,
    ) -> ClaimResult<ClaimOutcome> {
        if tx.source_chain != Chain::Eth {
            return Err(ClaimError::Unknown(format!(
                "ETH->AVAIL claim for a {}-origin transfer",
                tx.source_chain
            )));
        }
        let _guard = self.begin(tx.key())?;
        if self.ledger.claim_submitted(&tx.key()).await {
            return Err(ClaimError::AlreadyProcessed);
        }
        let signer = self
            .avail_wallet
            .selected_account()
            .ok_or(ClaimError::NoAvailAccount)?;

        // A light-client slot must have been observed at least once before
        // anything is fetched or submitted.
        match self.heads.eth_head().await {
            Some(head) if head.slot > 0 => {}
            _ => return Err(ClaimError::HeadUnavailable),
        }

        let runtime = self.connection.get_or_init().await?;
        let fetched = runtime
            .latest_heads()
            .await
            .map_err(|e| ClaimError::HeadFetchError(e.to_string()))?;
        self.heads.update_avail_head(fetched.avail_head).await;
        self.heads.update_eth_head(fetched.eth_head).await;

        // Storage proofs bind to the block hash fetched just now, never to
        // one cached at claim-initiation time.
        let proofs = self
            .proof_api
            .account_storage_proofs(fetched.latest_block_hash, params.message_id)
            .await;
        self.note_proof_fetch("storage", proofs.is_ok());
        let proofs = proofs?;

        // Domains are swapped relative to the caller's params; see
        // `AddressedMessage`.
        let message = AddressedMessage {
            message: MessagePayload {
                fungible_token: FungibleToken {
                    asset_id: NATIVE_ASSET_ID,
                    amount: U256::from(params.amount),
                },
            },
            from: pad_to_bytes32_hex(&params.from),
            to: params.to.clone(),
            origin_domain: params.destination_domain,
            destination_domain: params.origin_domain,
            id: params.message_id,
        };
        let call = VectorExecuteCall {
            slot: fetched.eth_head.slot,
            message,
            account_proof: proofs.account_proof,
            storage_proof: proofs.storage_proof,
        };

        let block_hash =
            AvailSubmissionDriver::submit_and_watch(runtime.as_ref(), call, &signer).await?;
        let ledger_warning = self.append_claim_pending(tx, block_hash).await;
        Ok(ClaimOutcome {
            destination_tx_hash: block_hash,
            ledger_warning,
        })
    }

    fn begin(&self, key: TxKey) -> ClaimResult<InFlightGuard<'_>> {
        let mut set = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if !set.insert(key) {
            return Err(ClaimError::AlreadyInProgress);
        }
        Ok(InFlightGuard {
            set: &self.in_flight,
            key,
        })
    }

    /// Bring the wallet onto the configured network, asking it to switch if
    /// needed and re-checking afterwards.
    async fn ensure_eth_network(&self) -> ClaimResult<()> {
        let wanted = self.eth_network.chain_id;
        let active = self
            .eth_wallet
            .active_chain_id()
            .await
            .map_err(|e| ClaimError::Unknown(e.to_string()))?;
        if active == wanted {
            return Ok(());
        }
        info!(
            active,
            wanted,
            network = %self.eth_network.name,
            "wallet on wrong network, requesting switch"
        );
        self.eth_wallet.switch_network(wanted).await.map_err(|e| {
            ClaimError::UnsupportedNetwork(format!(
                "{} network(id: {wanted}): {e}",
                self.eth_network.name
            ))
        })?;
        let active = self
            .eth_wallet
            .active_chain_id()
            .await
            .map_err(|e| ClaimError::Unknown(e.to_string()))?;
        if active != wanted {
            return Err(ClaimError::UnsupportedNetwork(format!(
                "{} network(id: {wanted})",
                self.eth_network.name
            )));
        }
        Ok(())
    }

    /// Record the submitted claim as `ClaimPending`. A ledger failure after
    /// a successful on-chain submission is a warning, not a claim failure.
    async fn append_claim_pending(
        &self,
        tx: &Transaction,
        destination_tx_hash: H256,
    ) -> Option<String> {
        let mut record = tx.clone();
        record.status = TransactionStatus::ClaimPending;
        record.destination_transaction_hash = Some(destination_tx_hash);
        match self.ledger.add_to_local_transaction(record).await {
            Ok(()) => None,
            Err(e) => {
                self.metrics.ledger_append_warnings.inc();
                warn!(error = %e, "claim submitted but ledger append failed");
                Some(e.to_string())
            }
        }
    }

    fn note_proof_fetch(&self, kind: &str, ok: bool) {
        let outcome = if ok { "ok" } else { "error" };
        self.metrics
            .proof_fetches
            .with_label_values(&[kind, outcome])
            .inc();
    }
}
