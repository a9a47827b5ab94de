// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the EstateWise agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level EstateWise configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EstateWiseConfig {
    /// Agent identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gemini backend settings used by the decision gate.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Property retrieval service settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Expert dispatch service settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

/// Agent identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "estatewise".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Gemini API key. `None` falls back to the `GOOGLE_AI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for the retrieval decision call.
    #[serde(default = "default_decision_model")]
    pub decision_model: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Per-request timeout for backend calls, in seconds.
    #[serde(default = "default_gemini_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            decision_model: default_decision_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_gemini_timeout_secs(),
        }
    }
}

fn default_decision_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_gemini_timeout_secs() -> u64 {
    30
}

/// Property retrieval service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Base URL of the retrieval service.
    #[serde(default = "default_retrieval_endpoint")]
    pub endpoint: String,

    /// Per-call timeout, in seconds.
    #[serde(default = "default_retrieval_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            endpoint: default_retrieval_endpoint(),
            timeout_secs: default_retrieval_timeout_secs(),
        }
    }
}

fn default_retrieval_endpoint() -> String {
    "http://127.0.0.1:3001".to_string()
}

fn default_retrieval_timeout_secs() -> u64 {
    30
}

/// Expert dispatch service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Base URL of the expert dispatch service.
    #[serde(default = "default_dispatch_endpoint")]
    pub endpoint: String,

    /// Timeout for the dispatch call, in seconds. Generation is slow, so
    /// this is longer than the other calls.
    #[serde(default = "default_dispatch_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_dispatch_endpoint(),
            timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}

fn default_dispatch_endpoint() -> String {
    "http://127.0.0.1:3002".to_string()
}

fn default_dispatch_timeout_secs() -> u64 {
    120
}
