// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP adapters for the services the EstateWise agent collaborates with:
//! the property retrieval index and the expert dispatch pipeline.

mod http;
pub mod dispatcher;
pub mod retriever;

pub use dispatcher::RemoteDispatcher;
pub use retriever::RemoteRetriever;
