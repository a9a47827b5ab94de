// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval adapter backed by the property index service.

use std::time::Duration;

use async_trait::async_trait;
use estatewise_config::model::RetrievalConfig;
use estatewise_core::error::EstateWiseError;
use estatewise_core::traits::{PluginAdapter, RetrievalAdapter};
use estatewise_core::types::{AdapterType, HealthStatus, PropertyRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::{build_client, join, post_json};

const TEXT_PATH: &str = "properties/query/text";
const RECORDS_PATH: &str = "properties/query";

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct TextResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    results: Vec<PropertyRecord>,
}

/// [`RetrievalAdapter`] over the property index HTTP API.
#[derive(Debug, Clone)]
pub struct RemoteRetriever {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteRetriever {
    /// Creates a retriever for `config.endpoint` with the configured timeout.
    pub fn new(config: &RetrievalConfig) -> Result<Self, EstateWiseError> {
        Ok(Self {
            client: build_client(Duration::from_secs(config.timeout_secs))?,
            endpoint: config.endpoint.clone(),
        })
    }
}

#[async_trait]
impl PluginAdapter for RemoteRetriever {
    fn name(&self) -> &str {
        "remote-retriever"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Retrieval
    }

    async fn health_check(&self) -> Result<HealthStatus, EstateWiseError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), EstateWiseError> {
        Ok(())
    }
}

#[async_trait]
impl RetrievalAdapter for RemoteRetriever {
    async fn query_as_string(&self, query: &str, limit: usize) -> Result<String, EstateWiseError> {
        let url = join(&self.endpoint, TEXT_PATH);
        let response: TextResponse = post_json(&self.client, &url, &QueryBody { query, limit })
            .await
            .map_err(|e| e.into_retrieval())?;
        debug!(bytes = response.text.len(), "property text received");
        Ok(response.text)
    }

    async fn query(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<PropertyRecord>, EstateWiseError> {
        let url = join(&self.endpoint, RECORDS_PATH);
        let response: RecordsResponse = post_json(&self.client, &url, &QueryBody { query, limit })
            .await
            .map_err(|e| e.into_retrieval())?;
        debug!(count = response.results.len(), "property records received");
        Ok(response.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn retriever_for(server: &MockServer) -> RemoteRetriever {
        RemoteRetriever::new(&RetrievalConfig {
            endpoint: server.uri(),
            ..RetrievalConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn query_as_string_posts_query_and_limit() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/properties/query/text"))
            .and(body_json(serde_json::json!({"query": "homes in Durham", "limit": 50})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"text": "Listing1...Listing2..."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = retriever_for(&server)
            .query_as_string("homes in Durham", 50)
            .await
            .unwrap();
        assert_eq!(text, "Listing1...Listing2...");
    }

    #[tokio::test]
    async fn query_returns_records_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/properties/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"id": "p-2", "score": 0.91, "metadata": {"beds": 3}},
                    {"id": "p-7", "score": 0.88}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let records = retriever_for(&server).query("3 beds", 50).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "p-2");
        assert_eq!(records[0].metadata["beds"], 3);
        assert_eq!(records[1].id, "p-7");
        assert!(records[1].metadata.is_null());
    }

    #[tokio::test]
    async fn server_error_maps_to_retrieval() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("index offline"))
            .mount(&server)
            .await;

        let err = retriever_for(&server).query("x", 50).await.unwrap_err();
        assert!(matches!(err, EstateWiseError::Retrieval { .. }), "got: {err:?}");
        assert!(err.to_string().contains("index offline"));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_retrieval() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/properties/query/text"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"txt": 1})))
            .mount(&server)
            .await;

        let err = retriever_for(&server)
            .query_as_string("x", 50)
            .await
            .unwrap_err();
        assert!(matches!(err, EstateWiseError::Retrieval { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn records_body_without_results_maps_to_retrieval() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/properties/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = retriever_for(&server).query("x", 50).await.unwrap_err();
        assert!(matches!(err, EstateWiseError::Retrieval { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn empty_results_are_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/properties/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
            .mount(&server)
            .await;

        let records = retriever_for(&server).query("x", 50).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_maps_to_retrieval() {
        let retriever = RemoteRetriever::new(&RetrievalConfig {
            endpoint: "http://127.0.0.1:1".into(),
            ..RetrievalConfig::default()
        })
        .unwrap();

        let err = retriever.query("x", 50).await.unwrap_err();
        assert!(matches!(err, EstateWiseError::Retrieval { source: Some(_), .. }));
    }
}
