// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for language-model backends (Gemini, etc.).

use async_trait::async_trait;

use crate::error::EstateWiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for language-model backends.
///
/// Accepts a system instruction, generation and safety configuration, and a
/// message history; returns the free-text completion.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest)
        -> Result<ProviderResponse, EstateWiseError>;
}
