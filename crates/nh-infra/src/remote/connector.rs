use std::sync::Arc;

use nh_core::ports::{RemoteConfig, RemoteConnectorPort, RemoteError, RemoteTablePort};
use reqwest::Url;
use tracing::info;

use super::PostgrestClient;

/// Builds [`PostgrestClient`] handles from [`RemoteConfig`].
#[derive(Default)]
pub struct PostgrestConnector;

impl PostgrestConnector {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteConnectorPort for PostgrestConnector {
    fn connect(&self, config: &RemoteConfig) -> Result<Arc<dyn RemoteTablePort>, RemoteError> {
        if !config.is_complete() {
            return Err(RemoteError::NotConfigured);
        }

        let url = Url::parse(config.url.trim())
            .map_err(|e| RemoteError::InvalidConfig(format!("{}: {e}", config.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RemoteError::InvalidConfig(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::InvalidConfig(e.to_string()))?;

        info!(host = url.host_str().unwrap_or_default(), "remote backend handle created");
        Ok(Arc::new(PostgrestClient::new(
            http,
            url.as_str(),
            config.api_key.trim(),
        )))
    }
}
