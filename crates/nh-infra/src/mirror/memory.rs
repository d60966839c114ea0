use async_trait::async_trait;
use nh_core::ports::{LocalMirrorPort, MirrorError, MirrorKey};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local mirror for tests.
#[derive(Default)]
pub struct InMemoryMirrorStore {
    entries: RwLock<HashMap<MirrorKey, String>>,
}

impl InMemoryMirrorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalMirrorPort for InMemoryMirrorStore {
    async fn read(&self, key: MirrorKey) -> Result<Option<String>, MirrorError> {
        Ok(self.entries.read().await.get(&key).cloned())
    }

    async fn write(&self, key: MirrorKey, value: &str) -> Result<(), MirrorError> {
        self.entries.write().await.insert(key, value.to_string());
        Ok(())
    }
}
