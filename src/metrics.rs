// Copyright (c) Avail Project
// SPDX-License-Identifier: Apache-2.0

use prometheus::{
    register_histogram_vec_with_registry, register_int_counter_vec_with_registry,
    register_int_counter_with_registry, HistogramVec, IntCounter, IntCounterVec, Registry,
};

const CLAIM_LATENCY_SEC_BUCKETS: &[f64] = &[
    0.5, 1.0, 2.0, 5.0, 10., 20., 30., 60., 120., 300., 600.,
];

#[derive(Clone, Debug)]
pub struct ClaimMetrics {
    pub(crate) claims_started: IntCounterVec,
    pub(crate) claims_succeeded: IntCounterVec,
    pub(crate) claims_failed: IntCounterVec,
    pub(crate) claim_latency: HistogramVec,
    pub(crate) proof_fetches: IntCounterVec,
    pub(crate) rpc_reconnects: IntCounter,
    pub(crate) ledger_append_warnings: IntCounter,
}

impl ClaimMetrics {
    pub fn new(registry: &Registry) -> Self {
        Self {
            claims_started: register_int_counter_vec_with_registry!(
                "bridge_claims_started",
                "Total number of claim attempts started, by direction",
                &["direction"],
                registry,
            )
            .unwrap(),
            claims_succeeded: register_int_counter_vec_with_registry!(
                "bridge_claims_succeeded",
                "Total number of claims that produced a destination transaction",
                &["direction"],
                registry,
            )
            .unwrap(),
            claims_failed: register_int_counter_vec_with_registry!(
                "bridge_claims_failed",
                "Total number of failed claim attempts, by direction and error type",
                &["direction", "error_type"],
                registry,
            )
            .unwrap(),
            claim_latency: register_histogram_vec_with_registry!(
                "bridge_claim_latency_seconds",
                "End to end latency of claim attempts",
                &["direction"],
                CLAIM_LATENCY_SEC_BUCKETS.to_vec(),
                registry,
            )
            .unwrap(),
            proof_fetches: register_int_counter_vec_with_registry!(
                "bridge_proof_fetches",
                "Total number of proof fetches, by kind and outcome",
                &["kind", "outcome"],
                registry,
            )
            .unwrap(),
            rpc_reconnects: register_int_counter_with_registry!(
                "bridge_rpc_reconnects",
                "Total number of AVAIL runtime reconnection rounds",
                registry,
            )
            .unwrap(),
            ledger_append_warnings: register_int_counter_with_registry!(
                "bridge_ledger_append_warnings",
                "Ledger appends that failed after a successful on-chain claim",
                registry,
            )
            .unwrap(),
        }
    }

    pub fn new_for_testing() -> Self {
        Self::new(&Registry::new())
    }
}
