// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the EstateWise agent.

use thiserror::Error;

/// Boxed error source carried by network-bearing variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across all EstateWise adapter traits and the
/// orchestration pipeline.
///
/// A malformed decision payload is deliberately absent from this enum: the
/// decision gate recovers from it locally by choosing the no-retrieval path.
#[derive(Debug, Error)]
pub enum EstateWiseError {
    /// Configuration errors (missing credential, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Language-model backend errors (HTTP failure, bad status, empty candidates).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The retrieval decision call itself failed. No fallback decision is
    /// substituted.
    #[error("decision gate failed: {message}")]
    DecisionGate {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Either of the concurrent retrieval calls failed.
    #[error("retrieval failed: {message}")]
    Retrieval {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The expert dispatch pipeline failed.
    #[error("dispatch failed: {message}")]
    Dispatch {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Operation timed out.
    #[error("{operation} timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EstateWiseError {
    /// Builds a [`EstateWiseError::Provider`] without a source.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`EstateWiseError::Retrieval`] without a source.
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`EstateWiseError::Dispatch`] without a source.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true for the configuration class, which callers must never
    /// retry and must surface before any network activity.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
