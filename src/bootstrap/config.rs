//! # Configuration Loader
//!
//! [`load_config`] is pure data loading: read, parse, map to [`AppConfig`].
//! Defaults and environment overrides are applied afterwards by
//! [`resolve_config`], never by the loader itself.

use std::path::Path;

use anyhow::Context;
use nh_core::AppConfig;
use tracing::{debug, info};

use super::paths::AppPaths;

pub const ADMIN_PASSWORD_ENV: &str = "NAZORAT_ADMIN_PASSWORD";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_AI_LANGUAGE: &str = "Uzbek";

/// Load configuration from a TOML file.
///
/// **No validation is performed**: empty strings and missing sections are
/// accepted as they are.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Produces the effective configuration.
///
/// An explicit path must exist. Without one, the platform default file is
/// read when present and system defaults are used otherwise. Environment
/// variables win over file values; empty values are then filled with
/// defaults.
pub fn resolve_config(
    explicit: Option<&Path>,
    paths: &AppPaths,
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<AppConfig> {
    let mut config = match explicit {
        Some(path) => load_config(path)?,
        None if paths.config_file.exists() => load_config(&paths.config_file)?,
        None => {
            info!(path = %paths.config_file.display(), "no config file found, using defaults");
            AppConfig::with_system_defaults(paths.data_root.clone())
        }
    };

    if let Some(password) = env(ADMIN_PASSWORD_ENV).filter(|v| !v.is_empty()) {
        debug!("admin password taken from environment");
        config.admin_password = password;
    }
    if let Some(key) = env(GEMINI_API_KEY_ENV).filter(|v| !v.is_empty()) {
        config.ai_api_key = key;
    }

    if config.mirror_dir.as_os_str().is_empty() {
        config.mirror_dir = paths.mirror_dir.clone();
    }
    if config.remote_timeout_secs == 0 {
        config.remote_timeout_secs = DEFAULT_TIMEOUT_SECS;
    }
    if config.ai_model.is_empty() {
        config.ai_model = DEFAULT_AI_MODEL.to_string();
    }
    if config.ai_language.is_empty() {
        config.ai_language = DEFAULT_AI_LANGUAGE.to_string();
    }

    Ok(config)
}
