use std::sync::Arc;
use std::time::Duration;

use super::{errors::RemoteError, RemoteTablePort};

/// Connection parameters of the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Both URL and key are needed to talk to the backend.
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

/// Builds remote handles from connection parameters.
pub trait RemoteConnectorPort: Send + Sync {
    fn connect(&self, config: &RemoteConfig) -> Result<Arc<dyn RemoteTablePort>, RemoteError>;
}
