// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language-model backend for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use estatewise_core::EstateWiseError;
use estatewise_core::traits::{PluginAdapter, ProviderAdapter};
use estatewise_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};

/// Reply used when the queue is empty.
pub const DEFAULT_REPLY: &str = r#"{"usePropertyData":false}"#;

/// A mock backend that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// [`DEFAULT_REPLY`] is returned. Every request is recorded.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            delay: None,
        }
    }

    /// Create a mock provider pre-loaded with the given replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new()
        }
    }

    /// Make every call fail with a provider error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a reply to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of requests received so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    async fn next_response(&self) -> String {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| DEFAULT_REPLY.to_string())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EstateWiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EstateWiseError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, EstateWiseError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(EstateWiseError::provider(message.clone()));
        }

        Ok(ProviderResponse {
            content: self.next_response().await,
            model,
            finish_reason: Some("STOP".to_string()),
            usage: Some(TokenUsage {
                input_tokens: 10,
                output_tokens: 6,
            }),
        })
    }
}
