// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the collaborators the orchestrator talks to.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod dispatch;
pub mod provider;
pub mod retrieval;

pub use adapter::PluginAdapter;
pub use dispatch::DispatchAdapter;
pub use provider::ProviderAdapter;
pub use retrieval::RetrievalAdapter;
