use async_trait::async_trait;
use nh_core::ports::{LocalMirrorPort, MirrorError, MirrorKey};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Directory-backed mirror: one `<key>.json` file per key.
pub struct FileMirrorStore {
    dir: PathBuf,
}

impl FileMirrorStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: MirrorKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    /// Writes `content` next to the target and renames it into place, so a
    /// reader sees either the previous value or the complete new one.
    async fn atomic_write(&self, path: &Path, content: &str) -> Result<(), MirrorError> {
        fs::create_dir_all(&self.dir).await?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl LocalMirrorPort for FileMirrorStore {
    async fn read(&self, key: MirrorKey) -> Result<Option<String>, MirrorError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MirrorError::Io(e)),
        }
    }

    async fn write(&self, key: MirrorKey, value: &str) -> Result<(), MirrorError> {
        let path = self.path_for(key);
        self.atomic_write(&path, value).await?;
        debug!(key = %key, bytes = value.len(), "mirror entry written");
        Ok(())
    }
}
