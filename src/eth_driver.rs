// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Ethereum-side claim submission.
//!
//! Invokes the bridge contract's `receiveAVAIL(messageTuple, proofTuple)`
//! entry point through the connected wallet. Contract-level success is
//! implicit in the absence of a revert: the driver resolves with the
//! transaction hash once the node accepts the call.

use crate::error::{ClaimError, ClaimResult};
use crate::types::{MerkleProof, SubmissionPhase};
use async_trait::async_trait;
use ethers::abi::Token;
use ethers::types::{Address as EthAddress, Bytes, H256, U256};
use tracing::{debug, info};

/// Message type tag for fungible-token transfers in the bridge ABI.
pub const FUNGIBLE_TOKEN_MESSAGE_TYPE: u8 = 0x02;

/// `Message` tuple of `receiveAVAIL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveMessageTuple {
    pub message_type: u8,
    pub from: H256,
    pub to: H256,
    pub origin_domain: u32,
    pub destination_domain: u32,
    /// ABI-encoded `(bytes32 assetId, uint256 amount)`.
    pub data: Bytes,
    pub message_id: u64,
}

/// Proof tuple of `receiveAVAIL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveProofTuple {
    pub data_root_proof: Vec<H256>,
    pub leaf_proof: Vec<H256>,
    pub range_hash: H256,
    pub data_root_index: U256,
    pub blob_root: H256,
    pub bridge_root: H256,
    pub leaf: H256,
    pub leaf_index: U256,
}

/// Wallet-side failures during an ETH contract call.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WalletError {
    /// The user declined the signature request.
    #[error("User rejected the request: {0}")]
    Rejected(String),

    /// The wallet cannot or will not switch networks.
    #[error("denied network switch: {0}")]
    SwitchFailed(String),

    /// Revert, transport failure, or anything else the wallet reports.
    #[error("{0}")]
    Other(String),
}

/// A connected Ethereum wallet able to read its network and sign the bridge
/// contract call. Wallet-connect UI and key custody live outside this crate.
#[async_trait]
pub trait EthBridgeWallet: Send + Sync {
    /// Currently connected account, if any.
    fn connected_address(&self) -> Option<EthAddress>;

    async fn active_chain_id(&self) -> Result<u64, WalletError>;

    async fn switch_network(&self, chain_id: u64) -> Result<(), WalletError>;

    /// Sign and submit `receiveAVAIL`, resolving with the transaction hash.
    async fn receive_avail(
        &self,
        message: ReceiveMessageTuple,
        proof: ReceiveProofTuple,
    ) -> Result<H256, WalletError>;
}

/// Build the `receiveAVAIL` argument tuples from a fetched merkle proof.
pub fn build_receive_call(proof: &MerkleProof) -> (ReceiveMessageTuple, ReceiveProofTuple) {
    let token = &proof.message.message.fungible_token;
    let data = ethers::abi::encode(&[
        Token::FixedBytes(token.asset_id.as_bytes().to_vec()),
        Token::Uint(token.amount),
    ]);
    let message = ReceiveMessageTuple {
        message_type: FUNGIBLE_TOKEN_MESSAGE_TYPE,
        from: proof.message.from,
        to: proof.message.to,
        origin_domain: proof.message.origin_domain,
        destination_domain: proof.message.destination_domain,
        data: Bytes::from(data),
        message_id: proof.message.id,
    };
    let proof_tuple = ReceiveProofTuple {
        data_root_proof: proof.data_root_proof.clone(),
        leaf_proof: proof.leaf_proof.clone(),
        range_hash: proof.range_hash,
        data_root_index: U256::from(proof.data_root_index),
        blob_root: proof.blob_root,
        bridge_root: proof.bridge_root,
        leaf: proof.leaf,
        leaf_index: U256::from(proof.leaf_index),
    };
    (message, proof_tuple)
}

pub struct EthSubmissionDriver;

impl EthSubmissionDriver {
    /// Submit the claim and resolve with the destination transaction hash.
    /// Wallet rejection settles as `SubmissionRejected`; any other wallet or
    /// contract failure settles as `SubmissionFailed`.
    pub async fn submit(
        wallet: &dyn EthBridgeWallet,
        proof: &MerkleProof,
    ) -> ClaimResult<H256> {
        let mut phase = SubmissionPhase::Unsigned;
        let (message, proof_tuple) = build_receive_call(proof);
        debug!(message_id = message.message_id, %phase, "receiveAVAIL submission");

        phase = SubmissionPhase::Signing;
        debug!(%phase, "requesting signature");
        let tx_hash = wallet
            .receive_avail(message, proof_tuple)
            .await
            .map_err(|e| match e {
                WalletError::Rejected(reason) => ClaimError::SubmissionRejected(reason),
                other => ClaimError::SubmissionFailed {
                    reason: other.to_string(),
                },
            })?;

        phase = SubmissionPhase::Success;
        info!(?tx_hash, %phase, "receiveAVAIL accepted");
        Ok(tx_hash)
    }
}
