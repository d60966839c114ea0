use async_trait::async_trait;

use super::errors::MirrorError;

/// Fixed keys of the local mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MirrorKey {
    Users,
    Reports,
    Leads,
    RemoteUrl,
    RemoteKey,
}

impl MirrorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorKey::Users => "nazorat_users",
            MirrorKey::Reports => "nazorat_reports",
            MirrorKey::Leads => "nazorat_leads",
            MirrorKey::RemoteUrl => "supabase_url",
            MirrorKey::RemoteKey => "supabase_key",
        }
    }
}

impl std::fmt::Display for MirrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local key-value persistence holding the last known state.
///
/// Values are opaque strings; collections are stored as JSON arrays by the
/// Data Service.
#[async_trait]
pub trait LocalMirrorPort: Send + Sync {
    /// `Ok(None)` when the key was never written.
    async fn read(&self, key: MirrorKey) -> Result<Option<String>, MirrorError>;

    /// Replace the value stored under `key`.
    async fn write(&self, key: MirrorKey, value: &str) -> Result<(), MirrorError>;
}
