// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder the host installs can collect
//! these metrics. Without a recorder every call is a no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all pipeline metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "estatewise_decisions_total",
        "Retrieval decisions, labelled by outcome"
    );
    describe_counter!(
        "estatewise_malformed_decisions_total",
        "Decision payloads that were not a well-formed boolean object"
    );
    describe_counter!(
        "estatewise_retrieved_records_total",
        "Structured property records retrieved"
    );
    describe_histogram!(
        "estatewise_run_latency_seconds",
        "End-to-end orchestration latency in seconds"
    );
}

/// Record a decision outcome.
pub fn record_decision(use_property_data: bool) {
    metrics::counter!(
        "estatewise_decisions_total",
        "use_property_data" => if use_property_data { "true" } else { "false" }
    )
    .increment(1);
}

/// Record a malformed decision payload.
pub fn record_malformed_decision() {
    metrics::counter!("estatewise_malformed_decisions_total").increment(1);
}

/// Record retrieved record count.
pub fn record_retrieved(count: usize) {
    metrics::counter!("estatewise_retrieved_records_total").increment(count as u64);
}

/// Record run latency.
pub fn record_latency(seconds: f64) {
    metrics::histogram!("estatewise_run_latency_seconds").record(seconds);
}
