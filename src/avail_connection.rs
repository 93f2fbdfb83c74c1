// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

//! Shared AVAIL runtime connection handle.
//!
//! The connection is a process-wide resource: lazily initialized, re-used by
//! all concurrent claims, and re-initialized with bounded retry when found
//! absent or disconnected. At most one initialization attempt is in flight
//! at a time; concurrent callers queue on the init lock and pick up the
//! handle established by whoever got there first.

use crate::config::RpcRetryConfig;
use crate::error::{ClaimError, ClaimResult};
use crate::avail_driver::AvailRuntime;
use async_trait::async_trait;
use prometheus::IntCounter;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Factory for fresh runtime connections.
#[async_trait]
pub trait AvailConnector: Send + Sync {
    async fn connect(&self) -> anyhow::Result<Arc<dyn AvailRuntime>>;
}

pub struct SharedAvailConnection {
    connector: Arc<dyn AvailConnector>,
    handle: RwLock<Option<Arc<dyn AvailRuntime>>>,
    // Guards re-entrant initialization; never held across the fast path.
    init_lock: Mutex<()>,
    retry: RpcRetryConfig,
    reconnects: Option<IntCounter>,
}

impl SharedAvailConnection {
    pub fn new(connector: Arc<dyn AvailConnector>, retry: RpcRetryConfig) -> Self {
        Self {
            connector,
            handle: RwLock::new(None),
            init_lock: Mutex::new(()),
            retry,
            reconnects: None,
        }
    }

    /// Count initialization rounds in the given metric.
    pub fn with_reconnect_counter(mut self, counter: IntCounter) -> Self {
        self.reconnects = Some(counter);
        self
    }

    /// Connected handle if one is cached and still live.
    async fn live_handle(&self) -> Option<Arc<dyn AvailRuntime>> {
        let guard = self.handle.read().await;
        guard.as_ref().filter(|c| c.is_connected()).cloned()
    }

    /// Return the shared handle, establishing it if absent or disconnected.
    ///
    /// Retries `max_attempts` times with increasing backoff
    /// (`backoff * attempt_number`) before surfacing `RpcUnavailable`.
    pub async fn get_or_init(&self) -> ClaimResult<Arc<dyn AvailRuntime>> {
        if let Some(handle) = self.live_handle().await {
            return Ok(handle);
        }

        let _init = self.init_lock.lock().await;
        // A concurrent caller may have connected while we waited.
        if let Some(handle) = self.live_handle().await {
            return Ok(handle);
        }

        debug!("Retrying API Conn");
        if let Some(counter) = &self.reconnects {
            counter.inc();
        }
        let mut last_err = String::new();
        for attempt in 1..=self.retry.max_attempts {
            match self.connector.connect().await {
                Ok(conn) => {
                    *self.handle.write().await = Some(conn.clone());
                    return Ok(conn);
                }
                Err(e) => {
                    last_err = e.to_string();
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        error = %last_err,
                        "AVAIL runtime connection attempt failed"
                    );
                    if attempt < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.backoff() * attempt).await;
                    }
                }
            }
        }
        Err(ClaimError::RpcUnavailable(last_err))
    }

    /// Drop the cached handle so the next caller reconnects.
    pub async fn invalidate(&self) {
        *self.handle.write().await = None;
    }
}
