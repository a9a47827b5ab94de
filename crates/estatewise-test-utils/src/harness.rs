// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` wires mock adapters into a real [`EstateWiseAgent`] and
//! keeps handles to each mock for assertions.

use std::sync::Arc;
use std::time::Duration;

use estatewise_agent::{AgentSettings, EstateWiseAgent};
use estatewise_config::EstateWiseConfig;
use estatewise_core::EstateWiseError;
use estatewise_core::types::{AgentResponse, ExpertWeights, PropertyRecord};
use secrecy::SecretString;

use crate::mock_dispatcher::MockDispatcher;
use crate::mock_provider::MockProvider;
use crate::mock_retriever::MockRetriever;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    api_key: Option<String>,
    provider: MockProvider,
    retriever: MockRetriever,
    dispatcher: MockDispatcher,
    config: EstateWiseConfig,
    timeout: Option<Duration>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            api_key: Some("test-api-key".to_string()),
            provider: MockProvider::new(),
            retriever: MockRetriever::default(),
            dispatcher: MockDispatcher::new(),
            config: EstateWiseConfig::default(),
            timeout: None,
        }
    }

    /// Queue decision replies on the mock backend.
    pub fn with_decision_replies(mut self, replies: Vec<String>) -> Self {
        self.provider = MockProvider::with_responses(replies);
        self
    }

    /// Replace the mock backend.
    pub fn with_provider(mut self, provider: MockProvider) -> Self {
        self.provider = provider;
        self
    }

    /// Serve `text` and `records` from the mock index.
    pub fn with_properties(mut self, text: &str, records: Vec<PropertyRecord>) -> Self {
        self.retriever = MockRetriever::new(text, records);
        self
    }

    /// Replace the mock index.
    pub fn with_retriever(mut self, retriever: MockRetriever) -> Self {
        self.retriever = retriever;
        self
    }

    /// Replace the mock expert pipeline.
    pub fn with_dispatcher(mut self, dispatcher: MockDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Run without a backend credential.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    /// Bound every step by `timeout` instead of the configured seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> TestHarness {
        let provider = Arc::new(self.provider);
        let retriever = Arc::new(self.retriever);
        let dispatcher = Arc::new(self.dispatcher);

        let mut settings =
            AgentSettings::from_config(&self.config, self.api_key.map(SecretString::from));
        if let Some(timeout) = self.timeout {
            settings.decision_timeout = timeout;
            settings.retrieval_timeout = timeout;
            settings.dispatch_timeout = timeout;
        }

        let agent = EstateWiseAgent::new(
            settings,
            provider.clone(),
            retriever.clone(),
            dispatcher.clone(),
        );

        TestHarness {
            agent,
            provider,
            retriever,
            dispatcher,
        }
    }
}

/// A complete pipeline with mock collaborators.
pub struct TestHarness {
    /// The agent under test.
    pub agent: EstateWiseAgent,
    /// The mock language-model backend.
    pub provider: Arc<MockProvider>,
    /// The mock property index.
    pub retriever: Arc<MockRetriever>,
    /// The mock expert pipeline.
    pub dispatcher: Arc<MockDispatcher>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Runs one turn with no expert weights.
    pub async fn ask(
        &self,
        prompt: &str,
        user_context: &str,
    ) -> Result<AgentResponse, EstateWiseError> {
        self.agent.run(prompt, user_context, &ExpertWeights::new()).await
    }

    /// Total calls made to all three collaborators.
    pub async fn total_calls(&self) -> usize {
        self.provider.call_count().await
            + self.retriever.call_count().await
            + self.dispatcher.call_count().await
    }
}
