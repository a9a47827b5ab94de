// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Retrieval adapter trait for the property-listing index.

use async_trait::async_trait;

use crate::error::EstateWiseError;
use crate::traits::adapter::PluginAdapter;
use crate::types::PropertyRecord;

/// Adapter for the property index.
///
/// Both entry points rank over the same underlying index; they differ only in
/// the projection they return.
#[async_trait]
pub trait RetrievalAdapter: PluginAdapter {
    /// Returns the top `limit` matches rendered as one human-readable blob.
    async fn query_as_string(&self, query: &str, limit: usize)
        -> Result<String, EstateWiseError>;

    /// Returns the top `limit` matches as structured records, best first.
    async fn query(&self, query: &str, limit: usize)
        -> Result<Vec<PropertyRecord>, EstateWiseError>;
}
