// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the off-chain prover/indexer service.
//!
//! Two failure modes are kept apart on purpose: `ProofUnavailable` means the
//! service answered but has not produced the proof yet (pre-finality or
//! prover lag, retryable by the caller), `ProofFetchError` means transport
//! failure (timeout, 5xx). Head endpoints fail with `HeadFetchError`.

use crate::error::{ClaimError, ClaimResult};
use crate::types::{AccountStorageProofs, AvailHead, EthHead, MerkleProof};
use async_trait::async_trait;
use ethers::types::H256;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Proof/head service operations consumed by the orchestrator.
#[async_trait]
pub trait ProofApi: Send + Sync {
    /// Merkle inclusion proof for an AVAIL-origin transfer.
    async fn merkle_proof(&self, block_hash: H256, tx_index: u32) -> ClaimResult<MerkleProof>;

    /// Account/storage proofs for an ETH-origin transfer, keyed by the AVAIL
    /// block hash fetched immediately beforehand.
    async fn account_storage_proofs(
        &self,
        block_hash: H256,
        message_id: u64,
    ) -> ClaimResult<AccountStorageProofs>;

    async fn avail_head(&self) -> ClaimResult<AvailHead>;

    async fn eth_head(&self) -> ClaimResult<EthHead>;
}

#[derive(Clone, Debug)]
pub struct BridgeApiClient {
    http_client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct AvailHeadEnvelope {
    data: AvailHead,
}

fn shared_http_client() -> reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                .pool_max_idle_per_host(16)
                .connect_timeout(Duration::from_secs(5))
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to build reqwest client")
        })
        .clone()
}

/// Map a non-success proof-endpoint status to the right failure category.
/// The service answers 404 when the proof for a block/index does not exist
/// yet; anything else is a transport-level problem.
fn proof_status_error(status: StatusCode, body: &str) -> ClaimError {
    if status == StatusCode::NOT_FOUND {
        ClaimError::ProofUnavailable(format!("HTTP {status}: {body}"))
    } else {
        ClaimError::ProofFetchError(format!("HTTP {status}: {body}"))
    }
}

fn transport_error(err: reqwest::Error) -> ClaimError {
    ClaimError::ProofFetchError(err.to_string())
}

impl BridgeApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self {
            http_client: shared_http_client(),
            base_url: Url::parse(base_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> ClaimResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClaimError::ProofFetchError(format!("bad endpoint {path}: {e}")))
    }

    async fn get_proof_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> ClaimResult<T> {
        debug!("[API] >>> GET {url}");
        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("[API] <<< {status} {body}");
            return Err(proof_status_error(status, &body));
        }
        let value: serde_json::Value = response.json().await.map_err(transport_error)?;
        if value.is_null() {
            // The service answers 200/null while the prover is still behind.
            return Err(ClaimError::ProofUnavailable(format!(
                "proof not yet available at {url}"
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| ClaimError::ProofFetchError(format!("malformed proof response: {e}")))
    }

    async fn get_head_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ClaimResult<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ClaimError::HeadFetchError(format!("bad endpoint {path}: {e}")))?;
        debug!("[API] >>> GET {url}");
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ClaimError::HeadFetchError(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClaimError::HeadFetchError(format!("HTTP {status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| ClaimError::HeadFetchError(format!("malformed head response: {e}")))
    }
}

#[async_trait]
impl ProofApi for BridgeApiClient {
    async fn merkle_proof(&self, block_hash: H256, tx_index: u32) -> ClaimResult<MerkleProof> {
        let mut url = self.endpoint(&format!("eth/proof/{block_hash:?}"))?;
        url.query_pairs_mut()
            .append_pair("index", &tx_index.to_string());
        self.get_proof_json(url).await
    }

    async fn account_storage_proofs(
        &self,
        block_hash: H256,
        message_id: u64,
    ) -> ClaimResult<AccountStorageProofs> {
        let url = self.endpoint(&format!("avl/proof/{block_hash:?}/{message_id}"))?;
        self.get_proof_json(url).await
    }

    async fn avail_head(&self) -> ClaimResult<AvailHead> {
        let envelope: AvailHeadEnvelope = self.get_head_json("avl/head").await?;
        Ok(envelope.data)
    }

    async fn eth_head(&self) -> ClaimResult<EthHead> {
        self.get_head_json("eth/head").await
    }
}
