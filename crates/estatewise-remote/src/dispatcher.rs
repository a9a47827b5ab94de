// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch adapter backed by the expert pipeline service.

use std::time::Duration;

use async_trait::async_trait;
use estatewise_config::model::DispatchConfig;
use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::{DispatchAdapter, PluginAdapter};
use estatewise_core::types::{AgentResponse, AdapterType, DispatchRequest, HealthStatus};
use tracing::debug;

use crate::http::{build_client, join, post_json};

const CHAT_PATH: &str = "chat";

/// [`DispatchAdapter`] that forwards the assembled request to the expert
/// pipeline over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteDispatcher {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteDispatcher {
    pub fn new(config: &DispatchConfig) -> Result<Self, EstateWiseError> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for RemoteDispatcher {
    fn name(&self) -> &str {
        "remote-dispatcher"
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
impl DispatchAdapter for RemoteDispatcher {
    async fn dispatch(&self, request: DispatchRequest) -> Result<AgentResponse, EstateWiseError> {
        let url = join(&self.endpoint, CHAT_PATH);
        let response: AgentResponse = post_json(&self.client, &url, &request)
            .await
            .map_err(|e| e.into_dispatch())?;
        debug!(
            experts = response.expert_views.len(),
            "expert pipeline responded"
        );
        Ok(response)
    }
}
