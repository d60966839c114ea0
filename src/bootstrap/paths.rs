use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

const APP_DIR_NAME: &str = "nazorat-hub";
const CONFIG_FILE_NAME: &str = "nazorat.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub mirror_dir: PathBuf,
    pub logs_dir: PathBuf,
    pub config_file: PathBuf,
}

impl AppPaths {
    pub fn from_roots(data_root: &Path, config_root: &Path) -> Self {
        Self {
            data_root: data_root.to_path_buf(),
            mirror_dir: data_root.join("mirror"),
            logs_dir: data_root.join("logs"),
            config_file: config_root.join(CONFIG_FILE_NAME),
        }
    }

    /// Platform directories from `dirs`, each joined with the app name.
    pub fn system() -> Result<Self> {
        let data = dirs::data_local_dir()
            .ok_or_else(|| anyhow!("no local data directory on this platform"))?;
        let config = dirs::config_dir().unwrap_or_else(|| data.clone());
        Ok(Self::from_roots(
            &data.join(APP_DIR_NAME),
            &config.join(APP_DIR_NAME),
        ))
    }
}
