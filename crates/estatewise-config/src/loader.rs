// SPDX-FileCopyrightText: 2026 EstateWise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./estatewise.toml` > `~/.config/estatewise/estatewise.toml`
//! > `/etc/estatewise/estatewise.toml` with environment variable overrides via the
//! `ESTATEWISE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::EstateWiseConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/estatewise/estatewise.toml";

/// Local config file, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "estatewise.toml";

/// Returns the per-user config path, if the platform has a config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("estatewise").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/estatewise/estatewise.toml` (system-wide)
/// 3. `~/.config/estatewise/estatewise.toml` (user XDG config)
/// 4. `./estatewise.toml` (local directory)
/// 5. `ESTATEWISE_*` environment variables
pub fn load_config() -> Result<EstateWiseConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<EstateWiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EstateWiseConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EstateWiseConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EstateWiseConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(EstateWiseConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `ESTATEWISE_GEMINI_API_KEY` must map to `gemini.api_key`, not
/// `gemini.api.key`.
fn env_provider() -> Env {
    Env::prefixed("ESTATEWISE_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("retrieval_", "retrieval.", 1)
            .replacen("dispatch_", "dispatch.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_maps_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ESTATEWISE_GEMINI_API_KEY", "from-env");
            jail.set_env("ESTATEWISE_RETRIEVAL_TIMEOUT_SECS", "7");

            let config: EstateWiseConfig = Figment::new()
                .merge(Serialized::defaults(EstateWiseConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.gemini.api_key.as_deref(), Some("from-env"));
            assert_eq!(config.retrieval.timeout_secs, 7);
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG_FILE,
                r#"
[dispatch]
endpoint = "http://dispatch.internal:8080"
"#,
            )?;

            let config = load_config_from_path(Path::new(LOCAL_CONFIG_FILE))?;
            assert_eq!(config.dispatch.endpoint, "http://dispatch.internal:8080");
            assert_eq!(config.dispatch.timeout_secs, 120);
            Ok(())
        });
    }

    #[test]
    fn env_beats_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(LOCAL_CONFIG_FILE, "[retrieval]\ntimeout_secs = 20\n")?;
            jail.set_env("ESTATEWISE_RETRIEVAL_TIMEOUT_SECS", "5");

            let config = load_config_from_path(Path::new(LOCAL_CONFIG_FILE))?;
            assert_eq!(config.retrieval.timeout_secs, 5);
            Ok(())
        });
    }
}
