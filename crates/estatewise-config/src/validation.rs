// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that serde attributes cannot express, such
//! as non-zero timeouts and well-formed service URLs.

use crate::diagnostic::ConfigError;
use crate::model::EstateWiseConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
///
/// A missing Gemini API key is not a validation error: the credential may be
/// supplied through `GOOGLE_AI_API_KEY`, and its absence is reported by the
/// orchestrator on the first run.
pub fn validate_config(config: &EstateWiseConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.gemini.decision_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gemini.decision_model must not be empty".to_string(),
        });
    }

    check_url(&mut errors, "gemini.base_url", &config.gemini.base_url);
    check_url(&mut errors, "retrieval.endpoint", &config.retrieval.endpoint);
    check_url(&mut errors, "dispatch.endpoint", &config.dispatch.endpoint);

    for (key, secs) in [
        ("gemini.timeout_secs", config.gemini.timeout_secs),
        ("retrieval.timeout_secs", config.retrieval.timeout_secs),
        ("dispatch.timeout_secs", config.dispatch.timeout_secs),
    ] {
        if secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than 0"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    } else if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` must start with http:// or https://"),
        });
    }
}
