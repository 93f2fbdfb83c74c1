// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

use ethers::types::{Bytes, H256, U256};
use serde::{Deserialize, Serialize};

/// The two chains bridged by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Avail,
    Eth,
}

impl Chain {
    /// The chain a transfer originating here lands on.
    pub fn counterpart(self) -> Chain {
        match self {
            Chain::Avail => Chain::Eth,
            Chain::Eth => Chain::Avail,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Avail => "AVAIL",
            Chain::Eth => "ETH",
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a cross-chain transfer.
///
/// `Bridged` is an intermediate display status: the claim has been submitted
/// but downstream finalization has not been observed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Initiated,
    Pending,
    ReadyToClaim,
    Bridged,
    ClaimPending,
    Claimed,
}

impl TransactionStatus {
    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Same-status rewrites are allowed so display fields can be refreshed.
    /// `Initiated -> ReadyToClaim` is the documented skip for transfers whose
    /// proof is already available at creation time.
    pub fn can_transition_to(self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Initiated, Pending)
                | (Initiated, ReadyToClaim)
                | (Pending, ReadyToClaim)
                | (ReadyToClaim, ClaimPending)
                | (ClaimPending, Bridged)
                | (ClaimPending, Claimed)
                | (Bridged, Claimed)
        )
    }

    /// `Claimed` records are immutable except for display fields.
    pub fn is_terminal(self) -> bool {
        matches!(self, TransactionStatus::Claimed)
    }

    /// Whether a claim for this transfer has already been submitted on the
    /// destination chain.
    pub fn claim_submitted(self) -> bool {
        matches!(
            self,
            TransactionStatus::ClaimPending | TransactionStatus::Bridged | TransactionStatus::Claimed
        )
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TransactionStatus::Initiated => "INITIATED",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::ReadyToClaim => "READY_TO_CLAIM",
            TransactionStatus::Bridged => "BRIDGED",
            TransactionStatus::ClaimPending => "CLAIM_PENDING",
            TransactionStatus::Claimed => "CLAIMED",
        };
        f.write_str(s)
    }
}

/// Source-side identity of a transfer. One claim may be in flight per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxKey {
    pub source_chain: Chain,
    pub source_transaction_hash: H256,
    pub source_transaction_index: u32,
}

/// Asset kind carried by a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "ERC20")]
    Erc20,
}

/// One cross-chain transfer instance as held in the local ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub source_chain: Chain,
    pub destination_chain: Chain,
    pub source_transaction_hash: H256,
    /// Ordinal position within the source block. Required for AVAIL-origin
    /// merkle proofs.
    pub source_transaction_index: u32,
    pub source_block_hash: H256,
    pub source_block_number: u64,
    /// Unix milliseconds.
    pub source_timestamp: u64,
    pub destination_transaction_hash: Option<H256>,
    /// Atomic amount in chain-native decimals.
    pub amount: U256,
    pub depositor_address: String,
    pub receiver_address: String,
    /// Cross-chain message identifier issued by the bridging protocol.
    pub message_id: u64,
    pub data_type: DataType,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn key(&self) -> TxKey {
        TxKey {
            source_chain: self.source_chain,
            source_transaction_hash: self.source_transaction_hash,
            source_transaction_index: self.source_transaction_index,
        }
    }
}

/// Latest finalized AVAIL head as reported by the attestation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailHead {
    /// Unix milliseconds of the end of the last proven range.
    pub end_timestamp: u64,
}

/// Latest finalized ETH head as tracked by the light client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthHead {
    pub slot: u64,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Heads fetched through the AVAIL runtime connection immediately before a
/// storage-proof fetch. Storage proofs bind to `latest_block_hash`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedHeads {
    pub latest_block_hash: H256,
    pub avail_head: AvailHead,
    pub eth_head: EthHead,
}

/// Fungible-token payload carried inside a bridged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FungibleToken {
    #[serde(rename = "asset_id")]
    pub asset_id: H256,
    pub amount: U256,
}

/// Message body; only fungible-token transfers are bridged today.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub fungible_token: FungibleToken,
}

/// Cross-chain message as embedded in an AVAIL->ETH merkle proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgedMessage {
    pub from: H256,
    pub to: H256,
    pub origin_domain: u32,
    pub destination_domain: u32,
    pub id: u64,
    pub message: MessagePayload,
}

/// Merkle inclusion proof for an AVAIL-origin transfer. Immutable once
/// fetched; binds a specific leaf index and block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof {
    pub message: BridgedMessage,
    pub data_root_proof: Vec<H256>,
    pub leaf_proof: Vec<H256>,
    pub range_hash: H256,
    pub data_root_index: u64,
    pub blob_root: H256,
    pub bridge_root: H256,
    pub leaf: H256,
    pub leaf_index: u64,
}

/// Account and storage proofs for an ETH-origin transfer, bound to the AVAIL
/// block hash they were fetched against and a message id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStorageProofs {
    pub account_proof: Vec<Bytes>,
    pub storage_proof: Vec<Bytes>,
}

/// Caller-supplied message descriptor for an ETH->AVAIL claim, expressed from
/// the initiating chain's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteParams {
    #[serde(rename = "messageid")]
    pub message_id: u64,
    pub amount: u128,
    pub from: String,
    pub to: String,
    pub origin_domain: u32,
    pub destination_domain: u32,
}

/// Message tuple handed to the `vector.execute` extrinsic.
///
/// Note the domains here are swapped relative to [`ExecuteParams`]: AVAIL and
/// ETH use inverted domain numbering per the bridge protocol convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressedMessage {
    pub message: MessagePayload,
    /// Source address, zero-padded to 32 bytes of hex.
    pub from: String,
    /// Receiver address on AVAIL (SS58); decoding to the runtime's public key
    /// representation is the signing collaborator's concern.
    pub to: String,
    pub origin_domain: u32,
    pub destination_domain: u32,
    pub id: u64,
}

/// Lifecycle of one destination-chain submission attempt, shared by both
/// chain drivers. `Signing` may fail (wallet rejection) and terminates the
/// attempt; `Submitted -> InBlock` may never happen on transport drop, which
/// is the caller's timeout to impose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Unsigned,
    Signing,
    Submitted,
    InBlock,
    Success,
    Failed,
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SubmissionPhase::Unsigned => "unsigned",
            SubmissionPhase::Signing => "signing",
            SubmissionPhase::Submitted => "submitted",
            SubmissionPhase::InBlock => "in_block",
            SubmissionPhase::Success => "success",
            SubmissionPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Zero asset id denotes the native AVAIL token on both sides.
pub const NATIVE_ASSET_ID: H256 = H256::zero();

/// Pad a `0x`-prefixed hex address to a 66-char (32-byte) hex string.
pub fn pad_to_bytes32_hex(addr: &str) -> String {
    let mut out = addr.to_string();
    while out.len() < 66 {
        out.push('0');
    }
    out
}
