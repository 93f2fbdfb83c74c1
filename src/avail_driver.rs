// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! AVAIL-side claim submission.
//!
//! Submits a signed `vector.execute` extrinsic and resolves it by watching
//! inclusion notifications, never by polling. Inclusion alone is not
//! success: the emitted runtime events decide. The subscription is torn down
//! on the first terminal event and the driver resolves exactly once.

use crate::error::{ClaimError, ClaimResult};
use crate::types::{AddressedMessage, FetchedHeads, SubmissionPhase};
use async_trait::async_trait;
use ethers::types::{Bytes, H256};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Decoded dispatch error attached to an `ExtrinsicFailed` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchErrorInfo {
    /// Decodable module error, e.g. pallet `Vector`, error `AlreadyProcessed`.
    Module { pallet: String, name: String },
    /// Anything the registry could not decode.
    Other(String),
}

impl std::fmt::Display for DispatchErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchErrorInfo::Module { pallet, name } => write!(f, "{pallet}.{name}"),
            DispatchErrorInfo::Other(raw) => f.write_str(raw),
        }
    }
}

/// Runtime events relevant to settling a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeEvent {
    ExtrinsicSuccess,
    ExtrinsicFailed(DispatchErrorInfo),
    /// Events the driver does not interpret.
    Other(String),
}

/// Progress notifications for a broadcast extrinsic.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtrinsicStatus {
    Broadcast,
    /// Included in a block together with the events emitted for it.
    InBlock {
        block_hash: H256,
        events: Vec<RuntimeEvent>,
    },
}

/// Owned subscription to inclusion notifications for one extrinsic.
/// Dropping it tears the underlying subscription down.
pub struct ExtrinsicWatcher {
    rx: mpsc::Receiver<ExtrinsicStatus>,
}

impl ExtrinsicWatcher {
    pub fn new(rx: mpsc::Receiver<ExtrinsicStatus>) -> Self {
        Self { rx }
    }

    /// Channel pair for implementations; the sender side is handed to the
    /// connection's notification pump.
    pub fn channel(buffer: usize) -> (mpsc::Sender<ExtrinsicStatus>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self { rx })
    }

    pub async fn next(&mut self) -> Option<ExtrinsicStatus> {
        self.rx.recv().await
    }
}

/// Arguments of the `vector.execute` extrinsic.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorExecuteCall {
    pub slot: u64,
    pub message: AddressedMessage,
    pub account_proof: Vec<Bytes>,
    pub storage_proof: Vec<Bytes>,
}

/// An AVAIL account selected in a connected wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailSigner {
    /// SS58 address.
    pub address: String,
    /// Wallet extension that owns the key.
    pub source: String,
}

/// Submission-time failures reported by the runtime connection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SubmitError {
    /// The user declined the signature request.
    #[error("Cancelled: {0}")]
    Rejected(String),

    /// The extrinsic never reached the node.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Live connection to the AVAIL runtime. Signing and SS58 decoding are the
/// implementation's concern; the driver only sequences the protocol.
#[async_trait]
pub trait AvailRuntime: Send + Sync + std::fmt::Debug {
    fn is_connected(&self) -> bool;

    /// Latest finalized AVAIL block hash plus tracked heads, read through
    /// this connection. Storage proofs must be fetched against the returned
    /// block hash, not one cached at claim-initiation time.
    async fn latest_heads(&self) -> anyhow::Result<FetchedHeads>;

    /// Sign and broadcast `vector.execute`, returning the inclusion watcher.
    async fn submit_vector_execute(
        &self,
        call: VectorExecuteCall,
        signer: &AvailSigner,
    ) -> Result<ExtrinsicWatcher, SubmitError>;
}

pub struct AvailSubmissionDriver;

impl AvailSubmissionDriver {
    /// Submit and suspend until the chain settles the extrinsic.
    ///
    /// Resolution rules:
    /// - wallet rejection settles as `SubmissionRejected`;
    /// - `ExtrinsicFailed` settles as `SubmissionFailed` with the decoded
    ///   module error surfaced verbatim;
    /// - `ExtrinsicSuccess` settles as success with the inclusion block hash;
    /// - a stream that ends before any terminal event is a transport drop and
    ///   surfaces `RpcUnavailable` (no internal retry or timeout here).
    pub async fn submit_and_watch(
        runtime: &dyn AvailRuntime,
        call: VectorExecuteCall,
        signer: &AvailSigner,
    ) -> ClaimResult<H256> {
        let mut phase = SubmissionPhase::Unsigned;
        debug!(slot = call.slot, message_id = call.message.id, %phase, "vector.execute submission");

        phase = SubmissionPhase::Signing;
        debug!(%phase, signer = %signer.address, "requesting signature");
        let mut watcher = runtime
            .submit_vector_execute(call, signer)
            .await
            .map_err(|e| match e {
                SubmitError::Rejected(reason) => ClaimError::SubmissionRejected(reason),
                SubmitError::Transport(reason) => ClaimError::RpcUnavailable(reason),
            })?;

        phase = SubmissionPhase::Submitted;
        debug!(%phase, "extrinsic broadcast, watching inclusion");

        while let Some(status) = watcher.next().await {
            match status {
                ExtrinsicStatus::Broadcast => {}
                ExtrinsicStatus::InBlock { block_hash, events } => {
                    phase = SubmissionPhase::InBlock;
                    debug!(%phase, ?block_hash, "extrinsic included, inspecting events");
                    // First terminal event observed settles the submission;
                    // the watcher is dropped on return, tearing the
                    // subscription down.
                    for event in events {
                        match event {
                            RuntimeEvent::ExtrinsicFailed(error) => {
                                let reason = error.to_string();
                                warn!(%reason, ?block_hash, "ExtrinsicFailed");
                                return Err(ClaimError::SubmissionFailed { reason });
                            }
                            RuntimeEvent::ExtrinsicSuccess => {
                                info!(?block_hash, "extrinsic succeeded");
                                return Ok(block_hash);
                            }
                            RuntimeEvent::Other(_) => {}
                        }
                    }
                    // Included but no terminal event in this notification;
                    // keep watching.
                }
            }
        }

        warn!("inclusion stream ended before a terminal event");
        Err(ClaimError::RpcUnavailable(
            "inclusion stream ended before a terminal event".to_string(),
        ))
    }
}
