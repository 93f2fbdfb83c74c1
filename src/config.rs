// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ethereum network the claim contract lives on.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EthNetworkConfig {
    // Chain id the wallet must be on before submitting receiveAVAIL.
    pub chain_id: u64,
    // Human-readable name used in error messages ("Sepolia", "Mainnet").
    pub name: String,
    // The proxy address of the bridge contract. Consumed by the wallet
    // implementation when it builds the receiveAVAIL call; this crate only
    // carries it.
    pub bridge_proxy_address: String,
}

/// Attestation cadence per chain, used only for ETA display estimates.
/// Protocol-specific; configurable rather than assumed.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProofWindowConfig {
    // Light-client update interval for ETH-origin transfers (telepathy).
    #[serde(default = "default_eth_update_interval_secs")]
    pub eth_update_interval_secs: u64,
    // Data-root range commitment interval for AVAIL-origin transfers (vectorx).
    #[serde(default = "default_avail_update_interval_secs")]
    pub avail_update_interval_secs: u64,
}

fn default_eth_update_interval_secs() -> u64 {
    // 20 minutes.
    1200
}

fn default_avail_update_interval_secs() -> u64 {
    // 120 minutes.
    7200
}

impl Default for ProofWindowConfig {
    fn default() -> Self {
        Self {
            eth_update_interval_secs: default_eth_update_interval_secs(),
            avail_update_interval_secs: default_avail_update_interval_secs(),
        }
    }
}

impl ProofWindowConfig {
    pub fn eth_update_interval(&self) -> Duration {
        Duration::from_secs(self.eth_update_interval_secs)
    }

    pub fn avail_update_interval(&self) -> Duration {
        Duration::from_secs(self.avail_update_interval_secs)
    }
}

/// Retry policy for re-initializing the AVAIL runtime connection.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RpcRetryConfig {
    #[serde(default = "default_rpc_max_attempts")]
    pub max_attempts: u32,
    // Base backoff; attempt n waits base * n before the next try.
    #[serde(default = "default_rpc_backoff_millis")]
    pub backoff_millis: u64,
}

fn default_rpc_max_attempts() -> u32 {
    3
}

fn default_rpc_backoff_millis() -> u64 {
    2000
}

impl Default for RpcRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_rpc_max_attempts(),
            backoff_millis: default_rpc_backoff_millis(),
        }
    }
}

impl RpcRetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_millis)
    }
}

/// Top-level client configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BridgeClientConfig {
    // Base url of the proof/head indexing service.
    pub bridge_api_url: String,
    // Websocket/http endpoint of the AVAIL runtime.
    pub avail_rpc_url: String,
    // Ethereum side configuration.
    pub eth: EthNetworkConfig,
    #[serde(default)]
    pub proof_windows: ProofWindowConfig,
    #[serde(default)]
    pub rpc_retry: RpcRetryConfig,
}
