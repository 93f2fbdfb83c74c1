// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Local transaction ledger: append/update store of in-flight and completed
//! transfers, keyed by source transaction identity.
//!
//! Records are held in memory and mirrored into an optional persistence sink
//! (browser storage, a file, a database - a collaborator's concern). Status
//! changes must follow the lifecycle transition table; `Claimed` records only
//! accept display-field rewrites.

use crate::types::{Transaction, TransactionStatus, TxKey};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Persistence collaborator. Failures are surfaced to the caller and must
/// not be silently swallowed, but they do not undo the in-memory append.
#[async_trait]
pub trait TransactionSink: Send + Sync {
    async fn persist(&self, record: &Transaction) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid status transition {from} -> {to}")]
    InvalidTransition {
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("failed to persist transaction record: {0}")]
    PersistFailed(String),
}

#[derive(Default)]
pub struct LocalTransactionLedger {
    records: RwLock<HashMap<TxKey, Transaction>>,
    sink: Option<Arc<dyn TransactionSink>>,
}

impl LocalTransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: Arc<dyn TransactionSink>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            sink: Some(sink),
        }
    }

    /// Append a new record or update the existing one for the same key.
    ///
    /// Rejects lifecycle violations before touching anything. On a valid
    /// record the in-memory map is updated first; a sink failure is then
    /// reported as `PersistFailed` so callers can surface it as a warning
    /// while keeping the record visible.
    pub async fn add_to_local_transaction(&self, record: Transaction) -> Result<(), LedgerError> {
        let key = record.key();
        {
            let records = self.records.read().await;
            if let Some(existing) = records.get(&key) {
                if !existing.status.can_transition_to(record.status) {
                    return Err(LedgerError::InvalidTransition {
                        from: existing.status,
                        to: record.status,
                    });
                }
            }
        }

        debug!(
            source_chain = %record.source_chain,
            tx_hash = ?record.source_transaction_hash,
            status = %record.status,
            "ledger append"
        );
        self.records.write().await.insert(key, record.clone());

        if let Some(sink) = &self.sink {
            sink.persist(&record)
                .await
                .map_err(|e| LedgerError::PersistFailed(e.to_string()))?;
        }
        Ok(())
    }

    pub async fn get(&self, key: &TxKey) -> Option<Transaction> {
        self.records.read().await.get(key).cloned()
    }

    /// Whether a claim for this key was already submitted downstream.
    pub async fn claim_submitted(&self, key: &TxKey) -> bool {
        self.records
            .read()
            .await
            .get(key)
            .map(|r| r.status.claim_submitted())
            .unwrap_or(false)
    }

    /// Transfers still awaiting a claim or its finalization, newest first.
    pub async fn pending(&self) -> Vec<Transaction> {
        self.sorted_filter(|r| !r.status.is_terminal()).await
    }

    /// Completed transfers, newest first.
    pub async fn completed(&self) -> Vec<Transaction> {
        self.sorted_filter(|r| r.status.is_terminal()).await
    }

    pub async fn ready_to_claim_count(&self) -> usize {
        self.records
            .read()
            .await
            .values()
            .filter(|r| r.status == TransactionStatus::ReadyToClaim)
            .count()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn sorted_filter(&self, keep: impl Fn(&Transaction) -> bool) -> Vec<Transaction> {
        let records = self.records.read().await;
        let mut out: Vec<Transaction> = records.values().filter(|r| keep(r)).cloned().collect();
        out.sort_by(|a, b| b.source_timestamp.cmp(&a.source_timestamp));
        out
    }
}
