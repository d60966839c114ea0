use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use nh_core::ports::{RemoteConfig, RemoteConnectorPort};

use crate::data_service::DataService;

pub struct ReconfigureRemote {
    connector: Arc<dyn RemoteConnectorPort>,
    timeout: Duration,
}

impl ReconfigureRemote {
    pub fn new(connector: Arc<dyn RemoteConnectorPort>, timeout: Duration) -> Self {
        Self { connector, timeout }
    }

    /// Returns a service bound to the new backend. The URL and key are
    /// persisted in the mirror so the next start uses them too.
    #[tracing::instrument(name = "usecase.reconfigure_remote.execute", skip(self, data, api_key))]
    pub async fn execute(&self, data: &DataService, url: &str, api_key: &str) -> Result<DataService> {
        let config = RemoteConfig {
            url: url.trim().to_string(),
            api_key: api_key.trim().to_string(),
            timeout: self.timeout,
        };

        data.reconfigure(self.connector.as_ref(), config)
            .await
            .with_context(|| format!("failed to switch remote backend to {url}"))
    }
}
