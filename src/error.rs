// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

/// Failure modes of a claim attempt.
///
/// Transient conditions (`ProofUnavailable`, `ProofFetchError`,
/// `RpcUnavailable`, `HeadFetchError`) are surfaced to the caller, which owns
/// the retry policy; only the AVAIL RPC connection carries bounded internal
/// retry. Wallet rejection and on-chain failure are terminal for the attempt
/// and leave the ledger untouched so the user may retry the same claim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    #[error("Connect a Eth account")]
    NoEthAccount,

    #[error("Connect a Avail account")]
    NoAvailAccount,

    #[error("Network not supported: {0}")]
    UnsupportedNetwork(String),

    /// The prover/indexer has not yet produced a proof for this block/index.
    #[error("proof not yet available: {0}")]
    ProofUnavailable(String),

    /// Transport failure talking to the proof service.
    #[error("Failed to fetch proofs from api: {0}")]
    ProofFetchError(String),

    /// AVAIL runtime connection could not be (re-)established.
    #[error("RPC unavailable: {0}")]
    RpcUnavailable(String),

    /// Head tracking has not completed; proceeding would bind to an invalid
    /// light-client checkpoint.
    #[error("Failed to fetch latest slot")]
    HeadUnavailable,

    #[error("Failed to fetch heads from api: {0}")]
    HeadFetchError(String),

    /// The user declined the wallet signature. Pre-broadcast only.
    #[error("transaction rejected in wallet: {0}")]
    SubmissionRejected(String),

    /// The destination chain settled the submission as failed, with the
    /// decoded module error or revert reason.
    #[error("Transaction failed with error: {reason}")]
    SubmissionFailed { reason: String },

    /// Another claim for the same source-transaction identity is in flight.
    #[error("claim already in progress for this transaction")]
    AlreadyInProgress,

    /// The ledger already records a submitted claim for this transaction.
    #[error("claim already processed for this transaction")]
    AlreadyProcessed,

    #[error("{0}")]
    Unknown(String),
}

impl ClaimError {
    /// Short stable label for metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            ClaimError::NoEthAccount => "no_eth_account",
            ClaimError::NoAvailAccount => "no_avail_account",
            ClaimError::UnsupportedNetwork(_) => "unsupported_network",
            ClaimError::ProofUnavailable(_) => "proof_unavailable",
            ClaimError::ProofFetchError(_) => "proof_fetch_error",
            ClaimError::RpcUnavailable(_) => "rpc_unavailable",
            ClaimError::HeadUnavailable => "head_unavailable",
            ClaimError::HeadFetchError(_) => "head_fetch_error",
            ClaimError::SubmissionRejected(_) => "submission_rejected",
            ClaimError::SubmissionFailed { .. } => "submission_failed",
            ClaimError::AlreadyInProgress => "already_in_progress",
            ClaimError::AlreadyProcessed => "already_processed",
            ClaimError::Unknown(_) => "unknown",
        }
    }

    /// Whether a later identical attempt can reasonably succeed without user
    /// intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClaimError::ProofUnavailable(_)
                | ClaimError::ProofFetchError(_)
                | ClaimError::RpcUnavailable(_)
                | ClaimError::HeadFetchError(_)
        )
    }
}

pub type ClaimResult<T> = Result<T, ClaimError>;
