// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.

use estatewise_core::types::{GenerationConfig, SafetySetting};
use serde::{Deserialize, Serialize};

// --- Request types ---

/// Body of a `models/{model}:generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<ApiGenerationConfig>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
}

/// A role-tagged list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// `user` or `model`. Omitted for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Single text part with an optional role.
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text: Some(text.into()) }],
        }
    }
}

/// One content part. Only text parts are produced or consumed here; other
/// part kinds deserialize with `text == None` and are skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling parameters in Gemini's wire shape.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl From<GenerationConfig> for ApiGenerationConfig {
    fn from(c: GenerationConfig) -> Self {
        Self {
            temperature: c.temperature,
            top_p: c.top_p,
            top_k: c.top_k,
            max_output_tokens: c.max_output_tokens,
        }
    }
}

// --- Response types ---

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Finish reasons whose partial text must not be used.
pub const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Absent when the candidate was blocked.
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Whether the candidate stopped for a content-policy reason.
    pub fn is_blocked(&self) -> bool {
        self.finish_reason
            .as_deref()
            .is_some_and(|reason| BLOCKING_FINISH_REASONS.contains(&reason))
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    /// May be absent for empty responses.
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
}

// --- Error types ---

/// Google API error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatewise_core::types::{HarmBlockThreshold, HarmCategory};

    #[test]
    fn request_serializes_in_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "hi")],
            system_instruction: Some(Content::text(None, "be terse")),
            generation_config: Some(ApiGenerationConfig {
                temperature: 0.0,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 16,
            }),
            safety_settings: vec![SafetySetting {
                category: HarmCategory::Harassment,
                threshold: HarmBlockThreshold::BlockNone,
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["generationConfig"]["topK"], 1);
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 16);
        assert_eq!(
            json["safetySettings"][0]["category"],
            "HARM_CATEGORY_HARASSMENT"
        );
    }

    #[test]
    fn empty_safety_settings_are_omitted() {
        let request = GenerateContentRequest {
            contents: vec![],
            system_instruction: None,
            generation_config: None,
            safety_settings: vec![],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({"contents": []}));
    }

    #[test]
    fn candidate_text_joins_parts_and_skips_non_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "{\"usePropertyData\":"}, {"inlineData": {}}, {"text": "true}"}]
                },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response.candidates[0].text(), "{\"usePropertyData\":true}");
    }

    #[test]
    fn blocked_candidate_has_empty_text() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert_eq!(response.candidates[0].text(), "");
        assert!(response.candidates[0].is_blocked());
    }

    #[test]
    fn prompt_feedback_is_read() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "PROHIBITED_CONTENT"}
        }))
        .unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("PROHIBITED_CONTENT")
        );
    }

    #[test]
    fn stop_and_max_tokens_are_not_blocking() {
        for reason in ["STOP", "MAX_TOKENS"] {
            let candidate: Candidate =
                serde_json::from_value(serde_json::json!({"finishReason": reason})).unwrap();
            assert!(!candidate.is_blocked(), "{reason}");
        }
    }
}
