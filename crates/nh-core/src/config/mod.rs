//! # Pure Data Module - Data Transfer Objects Only
//!
//! Maps the TOML configuration file onto [`AppConfig`]. Missing values become
//! empty strings / zero; no validation and no defaults happen here. Defaults
//! are applied by the binary's bootstrap code.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Hosted backend base URL (may be empty: local-only mode)
    pub remote_url: String,

    /// Hosted backend API key
    pub remote_api_key: String,

    /// Remote request timeout; 0 means "not set"
    pub remote_timeout_secs: u64,

    /// Directory of the local mirror store (path info only, no existence check)
    pub mirror_dir: PathBuf,

    /// Password for the administrator synthesized on first start
    pub admin_password: String,

    pub ai_api_key: String,
    pub ai_model: String,
    /// Language the AI summary is requested in
    pub ai_language: String,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    ///
    /// **Prohibited**: This method must NOT contain any validation or default
    /// value logic. Empty strings are valid "facts".
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        Ok(Self {
            remote_url: str_at("remote", "url"),
            remote_api_key: str_at("remote", "api_key"),
            remote_timeout_secs: toml_value
                .get("remote")
                .and_then(|r| r.get("timeout_secs"))
                .and_then(|v| v.as_integer())
                .map(|v| v.max(0) as u64)
                .unwrap_or(0),
            mirror_dir: PathBuf::from(str_at("storage", "mirror_dir")),
            admin_password: str_at("bootstrap", "admin_password"),
            ai_api_key: str_at("ai", "api_key"),
            ai_model: str_at("ai", "model"),
            ai_language: str_at("ai", "language"),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    pub fn empty() -> Self {
        Self {
            remote_url: String::new(),
            remote_api_key: String::new(),
            remote_timeout_secs: 0,
            mirror_dir: PathBuf::new(),
            admin_password: String::new(),
            ai_api_key: String::new(),
            ai_model: String::new(),
            ai_language: String::new(),
        }
    }

    /// Create AppConfig with system-default paths for production use
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Base directory for app data (e.g., `~/.local/share/nazorat-hub`)
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            mirror_dir: data_dir.join("mirror"),
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn test_from_toml_reads_all_sections() {
        let toml_str = r#"
            [remote]
            url = "https://example.supabase.co"
            api_key = "key"
            timeout_secs = 15

            [storage]
            mirror_dir = "/var/lib/nazorat"

            [bootstrap]
            admin_password = "pw"

            [ai]
            api_key = "g"
            model = "gemini-2.0-flash"
            language = "Uzbek"
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.remote_url, "https://example.supabase.co");
        assert_eq!(config.remote_api_key, "key");
        assert_eq!(config.remote_timeout_secs, 15);
        assert_eq!(config.mirror_dir, PathBuf::from("/var/lib/nazorat"));
        assert_eq!(config.admin_password, "pw");
        assert_eq!(config.ai_model, "gemini-2.0-flash");
        assert_eq!(config.ai_language, "Uzbek");
    }

    #[test]
    fn test_from_toml_returns_empty_values_when_missing() {
        let toml_value: Value = toml::from_str("[remote]\n").unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        // Empty values are valid "facts"
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_negative_timeout_is_clamped_to_zero() {
        let toml_value: Value = toml::from_str("[remote]\ntimeout_secs = -3\n").unwrap();
        assert_eq!(AppConfig::from_toml(&toml_value).unwrap().remote_timeout_secs, 0);
    }

    #[test]
    fn test_with_system_defaults_places_mirror_under_data_dir() {
        let config = AppConfig::with_system_defaults(PathBuf::from("/tmp/test"));
        assert_eq!(config.mirror_dir, PathBuf::from("/tmp/test/mirror"));
        assert_eq!(config.remote_url, "");
    }
}
