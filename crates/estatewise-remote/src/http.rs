// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared JSON-over-HTTP plumbing for the remote adapters.

use std::time::Duration;

use estatewise_core::{BoxError, EstateWiseError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// A failed remote call, not yet attributed to a pipeline step.
#[derive(Debug)]
pub(crate) struct CallError {
    message: String,
    source: Option<BoxError>,
}

impl CallError {
    pub(crate) fn into_retrieval(self) -> EstateWiseError {
        EstateWiseError::Retrieval {
            message: self.message,
            source: self.source,
        }
    }

    pub(crate) fn into_dispatch(self) -> EstateWiseError {
        EstateWiseError::Dispatch {
            message: self.message,
            source: self.source,
        }
    }
}

/// Builds a client with a client-wide timeout.
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, EstateWiseError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EstateWiseError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// POSTs `body` as JSON and decodes a JSON response.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
) -> Result<R, CallError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| CallError {
            message: if e.is_timeout() {
                format!("request to {url} timed out")
            } else {
                format!("request to {url} failed: {e}")
            },
            source: Some(Box::new(e)),
        })?;

    let status = response.status();
    debug!(url, status = %status, "remote response received");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CallError {
            message: format!("{url} returned {status}: {body}"),
            source: None,
        });
    }

    let bytes = response.bytes().await.map_err(|e| CallError {
        message: format!("failed to read response from {url}: {e}"),
        source: Some(Box::new(e)),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| CallError {
        message: format!("failed to decode response from {url}: {e}"),
        source: Some(Box::new(e)),
    })
}
