// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Process-wide cache of the latest known finalized head per chain.
//!
//! Refreshed out-of-band (head service or runtime connection); reads are
//! tolerant of staleness because heads are only used for ETA estimation and
//! the ETH->AVAIL slot precondition. Last successful write wins. If no head
//! was ever fetched, readers get `None` and must fail closed rather than
//! proceed with a default.

use crate::config::ProofWindowConfig;
use crate::error::ClaimResult;
use crate::proof_client::ProofApi;
use crate::types::{AvailHead, Chain, EthHead};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct HeadTracker {
    avail: RwLock<Option<AvailHead>>,
    eth: RwLock<Option<EthHead>>,
}

/// Estimated wait until the next proof window. Never negative: a window in
/// the past displays as `Soon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eta {
    Soon,
    Approx(Duration),
}

impl std::fmt::Display for Eta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Eta::Soon => f.write_str("Soon"),
            Eta::Approx(d) => {
                let minutes = (d.as_secs() + 59) / 60;
                write!(f, "~{} minutes", minutes.max(1))
            }
        }
    }
}

impl HeadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn update_avail_head(&self, head: AvailHead) {
        debug!(end_timestamp = head.end_timestamp, "avail head updated");
        *self.avail.write().await = Some(head);
    }

    pub async fn update_eth_head(&self, head: EthHead) {
        debug!(slot = head.slot, timestamp = head.timestamp, "eth head updated");
        *self.eth.write().await = Some(head);
    }

    pub async fn avail_head(&self) -> Option<AvailHead> {
        *self.avail.read().await
    }

    pub async fn eth_head(&self) -> Option<EthHead> {
        *self.eth.read().await
    }

    /// Pull both heads from the proof service. Partial failure leaves the
    /// previously cached head for the failing chain in place.
    pub async fn refresh_from_api(&self, api: &dyn ProofApi) -> ClaimResult<()> {
        let avail = api.avail_head().await?;
        self.update_avail_head(avail).await;
        let eth = api.eth_head().await?;
        self.update_eth_head(eth).await;
        Ok(())
    }

    /// Estimated time until the next attestation window for transfers
    /// originating on `source`, given `now_ms` (unix milliseconds).
    ///
    /// `None` means the relevant head was never fetched: the window is
    /// unknown and callers must not fabricate an estimate.
    pub async fn proof_window_eta(
        &self,
        source: Chain,
        now_ms: u64,
        windows: &ProofWindowConfig,
    ) -> Option<Eta> {
        let (last_proof_ms, interval) = match source {
            // Ethereum head timestamp is in seconds.
            Chain::Eth => {
                let head = self.eth_head().await?;
                (head.timestamp * 1000, windows.eth_update_interval())
            }
            Chain::Avail => {
                let head = self.avail_head().await?;
                (head.end_timestamp, windows.avail_update_interval())
            }
        };
        let next_proof_ms = last_proof_ms + interval.as_millis() as u64;
        if next_proof_ms < now_ms {
            Some(Eta::Soon)
        } else {
            Some(Eta::Approx(Duration::from_millis(next_proof_ms - now_ms)))
        }
    }
}
