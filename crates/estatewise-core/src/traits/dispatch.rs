// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch adapter trait for the weighted multi-expert response pipeline.

use async_trait::async_trait;

use crate::error::EstateWiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AgentResponse, DispatchRequest};

/// Adapter for the expert dispatch pipeline.
///
/// Expert scoring and merging live behind this boundary; the orchestrator
/// only hands over the assembled context and the caller's weights.
#[async_trait]
pub trait DispatchAdapter: PluginAdapter {
    /// Produces the final response for an assembled request.
    async fn dispatch(&self, request: DispatchRequest)
        -> Result<AgentResponse, EstateWiseError>;
}
