// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter for the EstateWise agent.
//!
//! This crate implements [`ProviderAdapter`] over the Gemini
//! `generateContent` REST endpoint.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use estatewise_config::model::GeminiConfig;
use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::{PluginAdapter, ProviderAdapter};
use estatewise_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, Role, TokenUsage,
};
use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::types::{Content, GenerateContentRequest};

/// Environment variable consulted when `gemini.api_key` is not configured.
pub const API_KEY_ENV: &str = "GOOGLE_AI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
pub struct GeminiProvider {
    client: GeminiClient,
    api_key: Option<SecretString>,
    default_model: String,
}

impl GeminiProvider {
    /// Creates a new Gemini provider from configuration and a resolved key.
    ///
    /// Use [`resolve_api_key`] to obtain the key. A provider without a key
    /// can be constructed, but every completion fails with
    /// [`EstateWiseError::Config`] before touching the network.
    pub fn new(
        config: &GeminiConfig,
        api_key: Option<SecretString>,
    ) -> Result<Self, EstateWiseError> {
        let client = GeminiClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )?;

        info!(
            model = config.decision_model,
            base_url = config.base_url,
            "Gemini provider initialized"
        );

        Ok(Self {
            client,
            api_key,
            default_model: config.decision_model.clone(),
        })
    }

    /// Converts a [`ProviderRequest`] into the Gemini wire request.
    fn to_api_request(request: &ProviderRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                    Role::Model => "model",
                };
                Content::text(Some(role), m.text.clone())
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: request
                .system_instruction
                .as_ref()
                .map(|s| Content::text(None, s.clone())),
            generation_config: request.generation_config.map(Into::into),
            safety_settings: request.safety_settings.clone(),
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, EstateWiseError> {
        // No API call: a health probe should not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EstateWiseError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, EstateWiseError> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            EstateWiseError::Config(format!("Gemini API key is not set ({API_KEY_ENV})"))
        })?;

        let model = if request.model.is_empty() {
            self.default_model.as_str()
        } else {
            request.model.as_str()
        };

        let api_request = Self::to_api_request(&request);
        let response = self.client.generate_content(api_key, model, &api_request).await?;

        // A blocked prompt or candidate is still a completed call. It comes
        // back as empty content tagged with the block reason.
        let (content, finish_reason) = match response.candidates.first() {
            Some(candidate) if candidate.is_blocked() => {
                warn!(finish_reason = ?candidate.finish_reason, "Gemini candidate blocked");
                (String::new(), candidate.finish_reason.clone())
            }
            Some(candidate) => (candidate.text(), candidate.finish_reason.clone()),
            None => {
                let block_reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone());
                warn!(block_reason = ?block_reason, "Gemini response has no candidates");
                (String::new(), block_reason)
            }
        };

        Ok(ProviderResponse {
            content,
            model: response
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            finish_reason,
            usage: response.usage_metadata.map(|u| TokenUsage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count.unwrap_or(0),
            }),
        })
    }
}

/// Resolves the Gemini API key.
///
/// # Resolution order
/// 1. `gemini.api_key` from config, if non-empty
/// 2. `GOOGLE_AI_API_KEY` environment variable, if non-empty
/// 3. `None`
pub fn resolve_api_key(config_key: &Option<String>) -> Option<SecretString> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Some(SecretString::from(key.clone()));
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.is_empty())
        .map(SecretString::from)
}
