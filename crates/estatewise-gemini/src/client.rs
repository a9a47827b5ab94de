// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Provides [`GeminiClient`] which handles URL construction, per-request key
//! authentication, and error envelope decoding. It never retries: a failed
//! call is reported once and the caller decides what happens next.

use std::time::Duration;

use estatewise_core::EstateWiseError;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, EstateWiseError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| EstateWiseError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Full endpoint URL for a model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Sends one `generateContent` request and returns the decoded response.
    ///
    /// The key is sent as a sensitive `x-goog-api-key` header.
    pub async fn generate_content(
        &self,
        api_key: &SecretString,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, EstateWiseError> {
        let mut key = HeaderValue::from_str(api_key.expose_secret()).map_err(|e| {
            EstateWiseError::Config(format!("invalid API key header value: {e}"))
        })?;
        key.set_sensitive(true);

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", key)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({} {}): {}",
                    api_err.error.code, api_err.error.status, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(EstateWiseError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| EstateWiseError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> EstateWiseError {
        if e.is_timeout() {
            EstateWiseError::Timeout {
                operation: "Gemini request".to_string(),
                duration: self.timeout,
            }
        } else {
            EstateWiseError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.0-flash-lite";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new(base_url, Duration::from_secs(5)).unwrap()
    }

    fn test_key() -> SecretString {
        SecretString::from("test-api-key".to_string())
    }

    fn test_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::text(Some("user"), "Hello")],
            system_instruction: None,
            generation_config: None,
            safety_settings: vec![],
        }
    }

    fn ok_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 7, "candidatesTokenCount": 3, "totalTokenCount": 10},
            "modelVersion": MODEL
        })
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = test_client("http://localhost:1234/v1beta/");
        assert_eq!(
            client.endpoint(MODEL),
            "http://localhost:1234/v1beta/models/gemini-2.0-flash-lite:generateContent"
        );
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("Hi there!")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.generate_content(&test_key(), MODEL, &test_request()).await.unwrap();

        assert_eq!(result.candidates[0].text(), "Hi there!");
        assert_eq!(result.usage_metadata.unwrap().prompt_token_count, 7);
    }

    #[tokio::test]
    async fn generate_content_does_not_retry_on_503() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(&test_key(), MODEL, &test_request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("UNAVAILABLE"), "got: {err}");
    }

    #[tokio::test]
    async fn generate_content_reports_raw_body_for_unstructured_errors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(&test_key(), MODEL, &test_request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("403") && err.contains("forbidden"), "got: {err}");
    }

    #[tokio::test]
    async fn generate_content_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ok_body("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(server.uri(), Duration::from_millis(50)).unwrap();
        let err = client
            .generate_content(&test_key(), MODEL, &test_request())
            .await
            .unwrap_err();
        assert!(
            matches!(err, EstateWiseError::Timeout { .. }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn generate_content_rejects_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(&test_key(), MODEL, &test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, EstateWiseError::Provider { .. }));
    }
}
