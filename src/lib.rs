// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Client-side claim orchestration for the AVAIL <> Ethereum token bridge.
//!
//! Transfers initiated on one chain are claimed on the other once the
//! bridge's attestation service has proven them. This crate sequences a
//! claim end to end: proof fetch, destination-chain submission through a
//! connected wallet, and local ledger bookkeeping. Wallet UIs, key custody
//! and the chain connections themselves are collaborators behind traits.

pub mod avail_connection;
pub mod avail_driver;
pub mod classifier;
pub mod config;
pub mod error;
pub mod eth_driver;
pub mod head_tracker;
pub mod ledger;
pub mod metrics;
pub mod orchestrator;
pub mod proof_client;
#[cfg(test)]
pub mod test_utils;
pub mod types;

pub use error::{ClaimError, ClaimResult};
pub use orchestrator::{ClaimOrchestrator, ClaimOutcome};
