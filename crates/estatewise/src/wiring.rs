// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the agent from configuration.

use std::sync::Arc;

use estatewise_agent::{AgentSettings, EstateWiseAgent, RETRIEVAL_LIMIT};
use estatewise_config::EstateWiseConfig;
use estatewise_core::EstateWiseError;
use estatewise_gemini::{GeminiProvider, resolve_api_key};
use estatewise_remote::{RemoteDispatcher, RemoteRetriever};
use tracing::debug;

/// Constructs the agent with live HTTP adapters.
///
/// A missing API key does not fail here; the first run reports it.
pub fn build_agent(config: &EstateWiseConfig) -> Result<EstateWiseAgent, EstateWiseError> {
    let api_key = resolve_api_key(&config.gemini.api_key);
    let provider = GeminiProvider::new(&config.gemini, api_key.clone())?;
    let settings = AgentSettings::from_config(config, api_key);

    let retriever = RemoteRetriever::new(&config.retrieval)?;
    let dispatcher = RemoteDispatcher::new(&config.dispatch)?;

    debug!(
        retrieval = %config.retrieval.endpoint,
        dispatch = %config.dispatch.endpoint,
        "adapters initialized"
    );

    Ok(EstateWiseAgent::new(
        settings,
        Arc::new(provider),
        Arc::new(retriever),
        Arc::new(dispatcher),
    ))
}

/// Human-readable, secret-free summary of the effective configuration.
pub fn config_summary(config: &EstateWiseConfig) -> String {
    let key_state = if resolve_api_key(&config.gemini.api_key).is_some() {
        "set"
    } else {
        "NOT SET"
    };

    format!(
        "agent.name            = {}\n\
         agent.log_level       = {}\n\
         gemini.api_key        = [{key_state}]\n\
         gemini.decision_model = {}\n\
         gemini.base_url       = {}\n\
         gemini.timeout_secs   = {}\n\
         retrieval.endpoint    = {}\n\
         retrieval.limit       = {} (fixed)\n\
         retrieval.timeout_secs = {}\n\
         dispatch.endpoint     = {}\n\
         dispatch.timeout_secs = {}\n",
        config.agent.name,
        config.agent.log_level,
        config.gemini.decision_model,
        config.gemini.base_url,
        config.gemini.timeout_secs,
        config.retrieval.endpoint,
        RETRIEVAL_LIMIT,
        config.retrieval.timeout_secs,
        config.dispatch.endpoint,
        config.dispatch.timeout_secs,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn summary_never_prints_the_key() {
        let mut config = EstateWiseConfig::default();
        config.gemini.api_key = Some("AIza-super-secret".into());

        let summary = config_summary(&config);
        assert!(!summary.contains("AIza-super-secret"));
        assert!(summary.contains("gemini.api_key        = [set]"));
        assert!(summary.contains("retrieval.limit       = 50 (fixed)"));
    }

    #[tokio::test]
    async fn agent_builds_from_defaults() {
        assert!(build_agent(&EstateWiseConfig::default()).is_ok());
    }

    async fn gemini_expecting_key(key: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-goog-api-key", key))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{\"usePropertyData\":true}"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    #[serial]
    async fn credential_check_and_provider_share_the_configured_key() {
        let server = gemini_expecting_key("AIza-from-config").await;
        let mut config = EstateWiseConfig::default();
        config.gemini.base_url = server.uri();
        config.gemini.api_key = Some("AIza-from-config".into());

        let agent = build_agent(&config).unwrap();
        assert!(agent.decide("homes in Cary").await.unwrap());
    }

    #[tokio::test]
    #[serial]
    async fn key_resolved_from_env_survives_env_changes() {
        let server = gemini_expecting_key("AIza-from-env").await;
        let mut config = EstateWiseConfig::default();
        config.gemini.base_url = server.uri();

        // SAFETY: serialized with every other test that touches the environment.
        unsafe { std::env::set_var(estatewise_gemini::API_KEY_ENV, "AIza-from-env") };
        let agent = build_agent(&config);
        unsafe { std::env::remove_var(estatewise_gemini::API_KEY_ENV) };

        assert!(agent.unwrap().decide("homes in Cary").await.unwrap());
    }
}
