// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Maps raw failure text from wallets, RPC nodes and chain runtimes into a
//! closed set of user-facing categories. Pure and total: never fails, never
//! loses the original message.

use crate::error::ClaimError;

const GENERIC_ERROR_MESSAGE: &str = "Something went wrong!";

/// Closed set of user-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UserRejected,
    WrongNetwork,
    InsufficientBalance,
    ProofUnavailable,
    NoAccountConnected,
    GasTooLow,
    NonceTooLow,
    AlreadyProcessed,
    BurnTxMismatch,
    AllowanceFetchFailed,
    Unknown,
}

/// A classified error: category, fixed user-facing sentence, and the raw
/// message preserved for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub user_message: String,
    pub raw: String,
}

// Known message fragments, matched case-insensitively in order. Wallet
// wordings differ per vendor (Metamask browser/mobile, Rabby) so several
// fragments map to the same category.
const PATTERNS: &[(&str, ErrorKind, &str)] = &[
    (
        "cancelled",
        ErrorKind::UserRejected,
        "You have rejected the transaction on your connected wallet.",
    ),
    (
        "connect a eth account",
        ErrorKind::NoAccountConnected,
        "Connect an Ethereum account to proceed.",
    ),
    (
        "connect a avail account",
        ErrorKind::NoAccountConnected,
        "Connect an Avail account to proceed.",
    ),
    (
        "no account selected",
        ErrorKind::NoAccountConnected,
        "Please connect your accounts",
    ),
    (
        "exceeds balance",
        ErrorKind::InsufficientBalance,
        "Transfer amount is more than amount available in your wallet.",
    ),
    (
        "insufficient balance",
        ErrorKind::InsufficientBalance,
        "You do not have sufficient balance.",
    ),
    (
        "denied network switch",
        ErrorKind::WrongNetwork,
        "You denied the network switch. Please allow the switching to continue.",
    ),
    (
        "walletconnect network switch not supported",
        ErrorKind::WrongNetwork,
        "You may need to manually switch it to the correct network.",
    ),
    (
        "invalid network",
        ErrorKind::WrongNetwork,
        "Network not supported. Please switch to the correct network.",
    ),
    (
        "network not supported",
        ErrorKind::WrongNetwork,
        "Network not supported, switching to the correct network. Retry the transaction.",
    ),
    (
        "failed to fetch proofs from api",
        ErrorKind::ProofUnavailable,
        "Failed to fetch proofs from API. Contact Support",
    ),
    (
        "proof not yet available",
        ErrorKind::ProofUnavailable,
        "Proof is not available yet, retry in a while.",
    ),
    (
        "denied transaction",
        ErrorKind::UserRejected,
        "You have rejected the transaction on your connected wallet.",
    ),
    (
        "user rejected the transaction",
        ErrorKind::UserRejected,
        "You have rejected the transaction on your connected wallet.",
    ),
    (
        "user rejected the request",
        ErrorKind::UserRejected,
        "You have rejected the transaction on your connected wallet.",
    ),
    (
        "user rejected transaction",
        ErrorKind::UserRejected,
        "You have rejected the transaction on your connected wallet.",
    ),
    (
        "intrinsic gas too low",
        ErrorKind::GasTooLow,
        "Provided gas is too low to complete this deposit, please allow suggested gas amount",
    ),
    (
        "transaction underpriced",
        ErrorKind::GasTooLow,
        "Provided gas is too low to complete this deposit, please allow suggested gas amount",
    ),
    (
        "nonce too low",
        ErrorKind::NonceTooLow,
        "Please clear the queue of your previous transactions on your wallet before proceeding with this transaction.",
    ),
    (
        "alreadyprocessed",
        ErrorKind::AlreadyProcessed,
        "This claim has already been processed.",
    ),
    (
        "exit_already_processed",
        ErrorKind::AlreadyProcessed,
        "Exit already processed",
    ),
    (
        "incorrect burn tx or event signature!",
        ErrorKind::BurnTxMismatch,
        "Please check if it is the current burn transaction hash and correct network/bridge selected. If the issue persists, please contact support.",
    ),
    (
        "error fetching allowance",
        ErrorKind::AllowanceFetchFailed,
        "Error fetching allowance.",
    ),
];

/// Classify a raw error message. Total: unmatched input yields
/// [`ErrorKind::Unknown`] with the generic fallback sentence and the original
/// text preserved in `raw`.
pub fn classify_error(raw: &str) -> ClassifiedError {
    let haystack = raw.to_lowercase();
    for (fragment, kind, message) in PATTERNS {
        if haystack.contains(fragment) {
            return ClassifiedError {
                kind: *kind,
                user_message: (*message).to_string(),
                raw: raw.to_string(),
            };
        }
    }
    ClassifiedError {
        kind: ErrorKind::Unknown,
        user_message: GENERIC_ERROR_MESSAGE.to_string(),
        raw: raw.to_string(),
    }
}

/// Classify a [`ClaimError`]. Structured variants map directly; free-text
/// variants fall through to message matching.
pub fn classify_claim_error(err: &ClaimError) -> ClassifiedError {
    let raw = err.to_string();
    match err {
        ClaimError::NoEthAccount => ClassifiedError {
            kind: ErrorKind::NoAccountConnected,
            user_message: "Connect an Ethereum account to proceed.".into(),
            raw,
        },
        ClaimError::NoAvailAccount => ClassifiedError {
            kind: ErrorKind::NoAccountConnected,
            user_message: "Connect an Avail account to proceed.".into(),
            raw,
        },
        ClaimError::UnsupportedNetwork(_) => ClassifiedError {
            kind: ErrorKind::WrongNetwork,
            user_message:
                "Network not supported, switching to the correct network. Retry the transaction."
                    .into(),
            raw,
        },
        ClaimError::ProofUnavailable(_) | ClaimError::ProofFetchError(_) => ClassifiedError {
            kind: ErrorKind::ProofUnavailable,
            user_message: "Failed to fetch proofs from API. Contact Support".into(),
            raw,
        },
        ClaimError::SubmissionRejected(reason) => classify_error(reason),
        ClaimError::SubmissionFailed { reason } => classify_error(reason),
        _ => classify_error(&raw),
    }
}
