// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the EstateWise RAG agent.
//!
//! This crate provides the error type, the shared data model, and the adapter
//! traits for the three collaborators the orchestrator depends on: the
//! language-model backend, the property retrieval index, and the expert
//! dispatch pipeline.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{BoxError, EstateWiseError};
pub use types::{
    AdapterType, AgentResponse, ChatMessage, DispatchContext, DispatchRequest, ExpertWeights,
    HealthStatus, PropertyRecord, ProviderRequest, ProviderResponse, Role,
};

pub use traits::{DispatchAdapter, PluginAdapter, ProviderAdapter, RetrievalAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_has_three_variants() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Provider,
            AdapterType::Retrieval,
            AdapterType::Dispatch,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn health_status_variants() {
        let healthy = HealthStatus::Healthy;
        let degraded = HealthStatus::Degraded("slow".into());
        let unhealthy = HealthStatus::Unhealthy("down".into());

        assert_eq!(healthy, HealthStatus::Healthy);
        assert_ne!(degraded, healthy);
        assert_ne!(unhealthy, healthy);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_retrieval_adapter<T: RetrievalAdapter>() {}
        fn _assert_dispatch_adapter<T: DispatchAdapter>() {}
    }
}
