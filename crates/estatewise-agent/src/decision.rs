// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval decision gate.
//!
//! Asks the language-model backend one tightly constrained question: does
//! answering this message need the property index? The reply is parsed
//! leniently. Anything that is not a clear yes becomes a no, so a confused
//! model costs nothing extra. A failed call is a different matter and
//! propagates.

use std::sync::Arc;
use std::time::Duration;

use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::ProviderAdapter;
use estatewise_core::types::{
    ChatMessage, GenerationConfig, HarmBlockThreshold, HarmCategory, ProviderRequest,
    SafetySetting,
};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::recording;

/// JSON field carrying the decision.
pub const DECISION_FIELD: &str = "usePropertyData";

/// System instruction for the decision call.
pub const DECISION_INSTRUCTION: &str = "Read the user's message and reply **exactly** one JSON object with a boolean field \"usePropertyData\": either {\"usePropertyData\":true} or {\"usePropertyData\":false}. No other text.";

/// Deterministic, short sampling for a one-token-ish answer.
pub fn decision_generation_config() -> GenerationConfig {
    GenerationConfig {
        temperature: 0.0,
        top_p: 1.0,
        top_k: 1,
        max_output_tokens: 16,
    }
}

/// Every harm category set to `BLOCK_NONE`. A filtered reply would read as
/// malformed and silently skip retrieval.
pub fn decision_safety_settings() -> Vec<SafetySetting> {
    HarmCategory::ALL
        .iter()
        .map(|&category| SafetySetting {
            category,
            threshold: HarmBlockThreshold::BlockNone,
        })
        .collect()
}

/// Decides per prompt whether property retrieval should run.
pub struct DecisionGate {
    provider: Arc<dyn ProviderAdapter>,
    model: String,
    timeout: Duration,
}

impl DecisionGate {
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            timeout,
        }
    }

    /// The exact backend request issued for `prompt`.
    pub fn request(&self, prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            system_instruction: Some(DECISION_INSTRUCTION.to_string()),
            messages: vec![ChatMessage::user(prompt)],
            generation_config: Some(decision_generation_config()),
            safety_settings: decision_safety_settings(),
        }
    }

    /// Issues exactly one classification call and returns the decision.
    ///
    /// # Errors
    /// [`EstateWiseError::DecisionGate`] when the backend call fails or
    /// exceeds the timeout. A reply that cannot be parsed is not an error;
    /// it yields `false`.
    pub async fn decide(&self, prompt: &str) -> Result<bool, EstateWiseError> {
        let request = self.request(prompt);

        let call = self.provider.complete(request);
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(model = %self.model, error = %e, "decision call failed");
                return Err(EstateWiseError::DecisionGate {
                    message: format!("decision call to {} failed", self.model),
                    source: Some(Box::new(e)),
                });
            }
            Err(_) => {
                warn!(
                    model = %self.model,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "decision call timed out"
                );
                return Err(EstateWiseError::DecisionGate {
                    message: format!("decision call to {} timed out", self.model),
                    source: Some(Box::new(EstateWiseError::Timeout {
                        operation: "decision call".to_string(),
                        duration: self.timeout,
                    })),
                });
            }
        };

        debug!(
            raw = %response.content,
            finish_reason = ?response.finish_reason,
            "decision payload received"
        );
        let use_property_data = parse_decision(&response.content);

        recording::record_decision(use_property_data);
        info!(use_property_data, "retrieval decision made");
        Ok(use_property_data)
    }
}

/// Parses a decision payload.
///
/// The payload must be a JSON object. `usePropertyData` is read with
/// JavaScript truthiness, so `"false"` (a non-empty string) counts as true.
/// Invalid JSON, a non-object, and a missing field all yield `false`.
pub fn parse_decision(raw: &str) -> bool {
    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, raw, "decision payload is not JSON, skipping retrieval");
            recording::record_malformed_decision();
            return false;
        }
    };

    // `Value::get` is `None` for non-objects.
    match value.get(DECISION_FIELD) {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!(value = %other, "decision field is not a boolean");
            recording::record_malformed_decision();
            is_truthy(other)
        }
        _ => {
            warn!(raw, "decision payload has no {DECISION_FIELD} field, skipping retrieval");
            recording::record_malformed_decision();
            false
        }
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use estatewise_test_utils::MockProvider;
    use proptest::prelude::*;
    use serde_json::json;
    use tracing_test::traced_test;

    const YES: &str = r#"{"usePropertyData":true}"#;

    fn replying(replies: &[&str]) -> MockProvider {
        MockProvider::with_responses(replies.iter().map(|r| r.to_string()).collect())
    }

    fn gate(provider: MockProvider) -> (DecisionGate, Arc<MockProvider>) {
        let provider = Arc::new(provider);
        let gate = DecisionGate::new(
            provider.clone(),
            "gemini-2.0-flash-lite",
            Duration::from_secs(5),
        );
        (gate, provider)
    }

    #[test]
    fn well_formed_payloads() {
        assert!(parse_decision(r#"{"usePropertyData":true}"#));
        assert!(!parse_decision(r#"{"usePropertyData":false}"#));
        assert!(parse_decision("  {\"usePropertyData\": true}\n"));
    }

    #[test]
    fn malformed_payloads_fail_safe_to_false() {
        for raw in [
            "",
            "yes",
            "true",
            "null",
            "[]",
            "[{\"usePropertyData\":true}]",
            "\"usePropertyData\"",
            "{}",
            "{\"usePropertyData\":",
            "{\"useProperty\":true}",
            "```json\n{\"usePropertyData\":true}\n```",
        ] {
            assert!(!parse_decision(raw), "{raw:?} should parse as false");
        }
    }

    #[test]
    fn non_boolean_fields_use_truthiness() {
        assert!(parse_decision(r#"{"usePropertyData":"false"}"#));
        assert!(parse_decision(r#"{"usePropertyData":1}"#));
        assert!(parse_decision(r#"{"usePropertyData":{}}"#));
        assert!(parse_decision(r#"{"usePropertyData":[]}"#));
        assert!(!parse_decision(r#"{"usePropertyData":0}"#));
        assert!(!parse_decision(r#"{"usePropertyData":0.0}"#));
        assert!(!parse_decision(r#"{"usePropertyData":""}"#));
        assert!(!parse_decision(r#"{"usePropertyData":null}"#));
    }

    #[test]
    fn duplicate_keys_take_the_last_value() {
        assert!(!parse_decision(
            r#"{"usePropertyData":true,"usePropertyData":false}"#
        ));
    }

    #[test]
    fn truthiness_table() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(-0.0)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!(" ")));
    }

    #[test]
    #[traced_test]
    fn malformed_payload_is_logged() {
        assert!(!parse_decision("not json"));
        assert!(logs_contain("skipping retrieval"));
    }

    #[test]
    fn safety_settings_disable_all_four_categories() {
        let settings = decision_safety_settings();
        assert_eq!(settings.len(), 4);
        assert!(
            settings
                .iter()
                .all(|s| s.threshold == HarmBlockThreshold::BlockNone)
        );
    }

    #[tokio::test]
    async fn decide_issues_one_request_with_fixed_parameters() {
        let (gate, provider) = gate(replying(&[YES]));

        assert!(gate.decide("Show me 3-bedroom homes under $500k").await.unwrap());

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "gemini-2.0-flash-lite");
        assert_eq!(request.system_instruction.as_deref(), Some(DECISION_INSTRUCTION));
        assert_eq!(
            request.messages,
            vec![ChatMessage::user("Show me 3-bedroom homes under $500k")]
        );
        assert_eq!(request.generation_config, Some(decision_generation_config()));
        assert_eq!(request.safety_settings, decision_safety_settings());
    }

    #[tokio::test]
    async fn decide_is_false_for_malformed_reply() {
        let (gate, _) = gate(replying(&["Sure! I think so."]));
        assert!(!gate.decide("anything").await.unwrap());
    }

    #[tokio::test]
    async fn blocked_reply_with_empty_content_is_false() {
        let (gate, provider) = gate(replying(&[""]));
        assert!(!gate.decide("anything").await.unwrap());
        assert_eq!(provider.call_count().await, 1);
    }

    #[tokio::test]
    async fn backend_failure_is_a_decision_gate_error() {
        let (gate, _) = gate(MockProvider::new().failing("quota exhausted"));
        let err = gate.decide("anything").await.unwrap_err();
        assert!(
            matches!(err, EstateWiseError::DecisionGate { source: Some(_), .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn timeout_is_a_decision_gate_error() {
        let provider = Arc::new(replying(&[YES]).with_delay(Duration::from_millis(500)));
        let gate = DecisionGate::new(provider, "m", Duration::from_millis(20));

        let err = gate.decide("anything").await.unwrap_err();
        let EstateWiseError::DecisionGate {
            source: Some(source),
            ..
        } = &err
        else {
            panic!("expected DecisionGate, got: {err:?}");
        };
        assert!(source.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn identical_prompts_yield_identical_decisions() {
        let (gate, _) = gate(replying(&[YES, YES]));
        let first = gate.decide("homes in Cary").await.unwrap();
        let second = gate.decide("homes in Cary").await.unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(raw in ".*") {
            let _ = parse_decision(&raw);
        }

        #[test]
        fn boolean_payload_round_trips(b: bool) {
            let raw = json!({ DECISION_FIELD: b }).to_string();
            prop_assert_eq!(parse_decision(&raw), b);
        }

        #[test]
        fn objects_without_the_field_are_false(key in "[a-zA-Z]{1,12}", v in any::<bool>()) {
            prop_assume!(key != DECISION_FIELD);
            let raw = json!({ key: v }).to_string();
            prop_assert!(!parse_decision(&raw));
        }
    }
}
