// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock expert pipeline that captures what it is asked to answer.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use estatewise_core::EstateWiseError;
use estatewise_core::traits::{DispatchAdapter, PluginAdapter};
use estatewise_core::types::{
    AdapterType, AgentResponse, DispatchRequest, ExpertView, HealthStatus,
};

/// A mock dispatcher returning a fixed response.
pub struct MockDispatcher {
    response: AgentResponse,
    failure: Option<String>,
    requests: Arc<Mutex<Vec<DispatchRequest>>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::with_response(AgentResponse {
            final_text: "mock answer".to_string(),
            expert_views: vec![ExpertView {
                expert: "general".to_string(),
                text: "mock answer".to_string(),
            }],
        })
    }

    pub fn with_response(response: AgentResponse) -> Self {
        Self {
            response,
            failure: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every call fail with a dispatch error carrying `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// All captured requests, oldest first.
    pub async fn requests(&self) -> Vec<DispatchRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<DispatchRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockDispatcher {
    fn name(&self) -> &str {
        "mock-dispatcher"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Dispatch
    }

    async fn health_check(&self) -> Result<HealthStatus, EstateWiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EstateWiseError> {
        Ok(())
    }
}

#[async_trait]
impl DispatchAdapter for MockDispatcher {
    async fn dispatch(&self, request: DispatchRequest) -> Result<AgentResponse, EstateWiseError> {
        self.requests.lock().await.push(request);
        match &self.failure {
            Some(message) => Err(EstateWiseError::dispatch(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}
