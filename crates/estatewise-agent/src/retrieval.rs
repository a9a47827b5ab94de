// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent property retrieval.
//!
//! Issues the text query and the structured query together and waits for
//! both. The first failure aborts the pair.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::RetrievalAdapter;
use estatewise_core::types::PropertyRecord;
use tracing::{debug, warn};

use crate::recording;

/// Maximum matches requested from each query.
pub const RETRIEVAL_LIMIT: usize = 50;

/// Both halves of one retrieval round.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedProperties {
    /// Human-readable rendering of the matches.
    pub text: String,
    /// Structured matches, best first.
    pub records: Vec<PropertyRecord>,
}

/// Runs the two retrieval queries for a prompt.
pub struct RetrievalFanOut {
    retriever: Arc<dyn RetrievalAdapter>,
    timeout: Duration,
}

impl RetrievalFanOut {
    pub fn new(retriever: Arc<dyn RetrievalAdapter>, timeout: Duration) -> Self {
        Self { retriever, timeout }
    }

    /// Fetches text and records for `prompt` concurrently.
    ///
    /// # Errors
    /// [`EstateWiseError::Retrieval`] if either query fails or exceeds the
    /// per-call timeout. The other query is dropped.
    pub async fn fetch(&self, prompt: &str) -> Result<RetrievedProperties, EstateWiseError> {
        debug!(limit = RETRIEVAL_LIMIT, "starting property retrieval");

        let text = self.bounded(
            "text query",
            self.retriever.query_as_string(prompt, RETRIEVAL_LIMIT),
        );
        let records = self.bounded("records query", self.retriever.query(prompt, RETRIEVAL_LIMIT));

        let (text, records) = tokio::try_join!(text, records)?;

        recording::record_retrieved(records.len());
        debug!(
            text_bytes = text.len(),
            records = records.len(),
            "property retrieval complete"
        );
        Ok(RetrievedProperties { text, records })
    }

    /// Applies the per-call timeout and attributes failures to retrieval.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, EstateWiseError>>,
    ) -> Result<T, EstateWiseError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e @ EstateWiseError::Retrieval { .. })) => {
                warn!(operation, error = %e, "property retrieval failed");
                Err(e)
            }
            Ok(Err(e)) => {
                warn!(operation, error = %e, "property retrieval failed");
                Err(EstateWiseError::Retrieval {
                    message: format!("{operation} failed"),
                    source: Some(Box::new(e)),
                })
            }
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "property retrieval timed out"
                );
                Err(EstateWiseError::Retrieval {
                    message: format!("{operation} timed out"),
                    source: Some(Box::new(EstateWiseError::Timeout {
                        operation: operation.to_string(),
                        duration: self.timeout,
                    })),
                })
            }
        }
    }
}
