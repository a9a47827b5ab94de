// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock property index with call recording and failure injection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use estatewise_core::EstateWiseError;
use estatewise_core::traits::{PluginAdapter, RetrievalAdapter};
use estatewise_core::types::{AdapterType, HealthStatus, PropertyRecord};

/// Which retrieval call a recorded entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalCall {
    Text,
    Records,
}

/// One recorded retrieval call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub call: RetrievalCall,
    pub query: String,
    pub limit: usize,
}

/// A mock retriever serving fixed text and records.
pub struct MockRetriever {
    text: String,
    records: Vec<PropertyRecord>,
    fail_on: Option<RetrievalCall>,
    internal_errors: bool,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl MockRetriever {
    pub fn new(text: impl Into<String>, records: Vec<PropertyRecord>) -> Self {
        Self {
            text: text.into(),
            records,
            fail_on: None,
            internal_errors: false,
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make the given call fail.
    pub fn failing_on(mut self, call: RetrievalCall) -> Self {
        self.fail_on = Some(call);
        self
    }

    /// Report injected failures as [`EstateWiseError::Internal`].
    pub fn with_internal_errors(mut self) -> Self {
        self.internal_errors = true;
        self
    }

    /// Sleep before answering either call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All calls received so far, in arrival order.
    pub async fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }

    async fn record(&self, call: RetrievalCall, query: &str, limit: usize) -> Result<(), EstateWiseError> {
        self.calls.lock().await.push(RecordedQuery {
            call,
            query: query.to_string(),
            limit,
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on == Some(call) {
            let message = format!("{call:?} query failed");
            return Err(if self.internal_errors {
                EstateWiseError::Internal(message)
            } else {
                EstateWiseError::retrieval(message)
            });
        }
        Ok(())
    }
}

impl Default for MockRetriever {
    fn default() -> Self {
        Self::new("", Vec::new())
    }
}

#[async_trait]
impl PluginAdapter for MockRetriever {
    fn name(&self) -> &str {
        "mock-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retrieval
    }

    async fn health_check(&self) -> Result<HealthStatus, EstateWiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EstateWiseError> {
        Ok(())
    }
}

#[async_trait]
impl RetrievalAdapter for MockRetriever {
    async fn query_as_string(&self, query: &str, limit: usize) -> Result<String, EstateWiseError> {
        self.record(RetrievalCall::Text, query, limit).await?;
        Ok(self.text.clone())
    }

    async fn query(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PropertyRecord>, EstateWiseError> {
        self.record(RetrievalCall::Records, query, limit).await?;
        Ok(self.records.clone())
    }
}
