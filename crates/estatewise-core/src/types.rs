// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the EstateWise pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Retrieval,
    Dispatch,
}

// --- Conversation types ---

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

// --- Provider types ---

/// Sampling parameters for a completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// Harm categories a backend may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

impl HarmCategory {
    /// All categories, in the order the backend documents them.
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::Harassment,
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
    ];
}

/// Blocking threshold for a harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

/// A per-category safety filter setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// A request to a language-model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    /// Model identifier. Empty means the adapter's default.
    pub model: String,
    /// System instruction, if any.
    pub system_instruction: Option<String>,
    /// Conversation history, oldest first.
    pub messages: Vec<ChatMessage>,
    pub generation_config: Option<GenerationConfig>,
    pub safety_settings: Vec<SafetySetting>,
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A response from a language-model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// Raw completion text, unmodified.
    pub content: String,
    pub model: String,
    pub finish_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

// --- Retrieval types ---

/// A structured property listing match.
///
/// The pipeline treats records as opaque and passes them through in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub id: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

// --- Dispatch types ---

/// Expert identifier to weight. Experts absent from the map get neutral
/// weighting downstream.
pub type ExpertWeights = BTreeMap<String, f64>;

/// Context handed to the expert dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchContext {
    /// Caller context, with the delimited property block appended when
    /// retrieval ran.
    pub merged_context: String,
    /// Structured matches. `None` when retrieval was skipped, which is
    /// distinct from `Some(vec![])`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_results: Option<Vec<PropertyRecord>>,
}

/// A full dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    pub history: Vec<ChatMessage>,
    pub prompt: String,
    pub context: DispatchContext,
    pub expert_weights: ExpertWeights,
}

/// A single expert's contribution to the final answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpertView {
    pub expert: String,
    pub text: String,
}

/// The final answer produced by the expert dispatch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResponse {
    pub final_text: String,
    #[serde(default)]
    pub expert_views: Vec<ExpertView>,
}
