// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end orchestration of one chat turn.
//!
//! [`EstateWiseAgent::run`] is strictly ordered: credential check, decision,
//! optional retrieval, context assembly, dispatch. It holds no per-turn
//! state, so one agent can serve concurrent turns behind an `Arc`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use estatewise_config::model::EstateWiseConfig;
use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::{DispatchAdapter, ProviderAdapter, RetrievalAdapter};
use estatewise_core::types::{
    AgentResponse, ChatMessage, DispatchContext, DispatchRequest, ExpertWeights,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::assembler::assemble_context;
use crate::decision::DecisionGate;
use crate::recording;
use crate::retrieval::RetrievalFanOut;

/// Runtime knobs for the pipeline.
pub struct AgentSettings {
    /// Backend credential. Checked on every run.
    pub api_key: Option<SecretString>,
    pub decision_model: String,
    pub decision_timeout: Duration,
    pub retrieval_timeout: Duration,
    pub dispatch_timeout: Duration,
}

impl AgentSettings {
    /// Derives settings from loaded configuration and a resolved key.
    pub fn from_config(config: &EstateWiseConfig, api_key: Option<SecretString>) -> Self {
        Self {
            api_key,
            decision_model: config.gemini.decision_model.clone(),
            decision_timeout: Duration::from_secs(config.gemini.timeout_secs),
            retrieval_timeout: Duration::from_secs(config.retrieval.timeout_secs),
            dispatch_timeout: Duration::from_secs(config.dispatch.timeout_secs),
        }
    }
}

impl std::fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("decision_model", &self.decision_model)
            .field("decision_timeout", &self.decision_timeout)
            .field("retrieval_timeout", &self.retrieval_timeout)
            .field("dispatch_timeout", &self.dispatch_timeout)
            .finish()
    }
}

/// The retrieval-augmented chat pipeline.
pub struct EstateWiseAgent {
    api_key: Option<SecretString>,
    gate: DecisionGate,
    fan_out: RetrievalFanOut,
    dispatcher: Arc<dyn DispatchAdapter>,
    dispatch_timeout: Duration,
}

impl EstateWiseAgent {
    pub fn new(
        settings: AgentSettings,
        provider: Arc<dyn ProviderAdapter>,
        retriever: Arc<dyn RetrievalAdapter>,
        dispatcher: Arc<dyn DispatchAdapter>,
    ) -> Self {
        debug!(?settings, "building agent");
        Self {
            api_key: settings.api_key,
            gate: DecisionGate::new(provider, settings.decision_model, settings.decision_timeout),
            fan_out: RetrievalFanOut::new(retriever, settings.retrieval_timeout),
            dispatcher,
            dispatch_timeout: settings.dispatch_timeout,
        }
    }

    /// Answers one user turn.
    ///
    /// `user_context` may be empty. `expert_weights` is forwarded untouched.
    /// The dispatcher's response is returned as-is.
    ///
    /// # Errors
    /// - [`EstateWiseError::Config`] if no credential is set. Nothing else runs.
    /// - [`EstateWiseError::DecisionGate`], [`EstateWiseError::Retrieval`] or
    ///   [`EstateWiseError::Dispatch`] from the step that failed. Later steps
    ///   do not run.
    #[instrument(
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), prompt_len = prompt.len())
    )]
    pub async fn run(
        &self,
        prompt: &str,
        user_context: &str,
        expert_weights: &ExpertWeights,
    ) -> Result<AgentResponse, EstateWiseError> {
        let started = Instant::now();
        self.ensure_credential()?;

        let use_property_data = self.gate.decide(prompt).await?;

        let retrieved = if use_property_data {
            Some(self.fan_out.fetch(prompt).await?)
        } else {
            None
        };

        let merged_context = assemble_context(
            user_context,
            use_property_data,
            retrieved.as_ref().map(|r| r.text.as_str()),
        );

        let request = DispatchRequest {
            history: vec![ChatMessage::user(prompt)],
            prompt: prompt.to_string(),
            context: DispatchContext {
                merged_context,
                raw_results: retrieved.map(|r| r.records),
            },
            expert_weights: expert_weights.clone(),
        };

        let response = self.dispatch(request).await?;

        let elapsed = started.elapsed();
        recording::record_latency(elapsed.as_secs_f64());
        info!(
            use_property_data,
            elapsed_ms = elapsed.as_millis() as u64,
            "turn completed"
        );
        Ok(response)
    }

    /// Runs only the decision step, after the credential check.
    pub async fn decide(&self, prompt: &str) -> Result<bool, EstateWiseError> {
        self.ensure_credential()?;
        self.gate.decide(prompt).await
    }

    fn ensure_credential(&self) -> Result<(), EstateWiseError> {
        match &self.api_key {
            Some(key) if !key.expose_secret().is_empty() => Ok(()),
            _ => {
                warn!("backend credential is not configured");
                Err(EstateWiseError::Config(
                    "Gemini API key is not set; configure gemini.api_key or GOOGLE_AI_API_KEY"
                        .to_string(),
                ))
            }
        }
    }

    async fn dispatch(&self, request: DispatchRequest) -> Result<AgentResponse, EstateWiseError> {
        let call = self.dispatcher.dispatch(request);
        match tokio::time::timeout(self.dispatch_timeout, call).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e @ EstateWiseError::Dispatch { .. })) => {
                warn!(error = %e, "expert dispatch failed");
                Err(e)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "expert dispatch failed");
                Err(EstateWiseError::Dispatch {
                    message: "expert pipeline failed".to_string(),
                    source: Some(Box::new(e)),
                })
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.dispatch_timeout.as_millis() as u64,
                    "expert dispatch timed out"
                );
                Err(EstateWiseError::Dispatch {
                    message: "expert pipeline timed out".to_string(),
                    source: Some(Box::new(EstateWiseError::Timeout {
                        operation: "expert dispatch".to_string(),
                        duration: self.dispatch_timeout,
                    })),
                })
            }
        }
    }
}
