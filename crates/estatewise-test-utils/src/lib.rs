// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for EstateWise integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock backend with queued decision replies
//! - [`MockRetriever`] - Mock property index with call recording
//! - [`MockDispatcher`] - Mock expert pipeline capturing requests
//! - [`TestHarness`] - All three wired into a real agent

pub mod harness;
pub mod mock_dispatcher;
pub mod mock_provider;
pub mod mock_retriever;

pub use harness::TestHarness;
pub use mock_dispatcher::MockDispatcher;
pub use mock_provider::MockProvider;
pub use mock_retriever::{MockRetriever, RecordedQuery, RetrievalCall};
