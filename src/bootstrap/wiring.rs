//! Builds the object graph: adapters from `nh-infra` plugged into the
//! `nh-app` data service and controller.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use nh_app::{AppController, ControllerDeps, DataService};
use nh_core::ports::{ConfirmationPort, RemoteConfig, SummaryGeneratorPort};
use nh_core::AppConfig;
use nh_infra::{FileMirrorStore, GeminiSummaryClient, PostgrestConnector, SystemClock};
use tracing::info;

fn remote_config(config: &AppConfig) -> RemoteConfig {
    RemoteConfig {
        url: config.remote_url.clone(),
        api_key: config.remote_api_key.clone(),
        timeout: Duration::from_secs(config.remote_timeout_secs),
    }
}

fn summary_client(config: &AppConfig) -> Result<Option<Arc<dyn SummaryGeneratorPort>>> {
    if config.ai_api_key.is_empty() {
        return Ok(None);
    }
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.remote_timeout_secs.max(30)))
        .build()
        .context("failed to build HTTP client for AI summaries")?;
    Ok(Some(Arc::new(GeminiSummaryClient::new(
        http,
        config.ai_api_key.clone(),
        config.ai_model.clone(),
    ))))
}

/// Wires a controller from the effective configuration. The working set is
/// still empty; call [`AppController::load`] before using it.
pub async fn build_controller(
    config: &AppConfig,
    confirmation: Arc<dyn ConfirmationPort>,
) -> Result<AppController> {
    let mirror = Arc::new(FileMirrorStore::new(config.mirror_dir.clone()));
    let connector = Arc::new(PostgrestConnector::new());

    let data = DataService::open(
        connector.as_ref(),
        mirror,
        Arc::new(SystemClock),
        remote_config(config),
    )
    .await
    .context("failed to open data service")?;
    info!(
        mirror_dir = %config.mirror_dir.display(),
        cloud = data.is_connected(),
        "data service ready"
    );

    let admin_password = Some(config.admin_password.clone()).filter(|p| !p.is_empty());
    let deps = ControllerDeps {
        connector,
        confirmation,
        summary: summary_client(config)?,
        admin_password,
        ai_language: config.ai_language.clone(),
        remote_timeout: Duration::from_secs(config.remote_timeout_secs),
    };

    Ok(AppController::new(data, deps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AssumeYes;
    use tempfile::TempDir;

    fn local_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            mirror_dir: dir.path().join("mirror"),
            admin_password: "secret".into(),
            ai_model: "gemini-2.0-flash".into(),
            ai_language: "English".into(),
            remote_timeout_secs: 5,
            ..AppConfig::empty()
        }
    }

    #[tokio::test]
    async fn local_only_controller_loads_and_seeds_admin() {
        let dir = TempDir::new().unwrap();
        let config = local_config(&dir);

        let mut controller = build_controller(&config, Arc::new(AssumeYes)).await.unwrap();
        controller.load().await.unwrap();

        assert!(!controller.state().is_cloud);
        assert_eq!(controller.state().users.len(), 1);
        assert!(dir.path().join("mirror").join("nazorat_users.json").exists());
    }

    #[tokio::test]
    async fn unusable_remote_url_falls_back_to_local() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            remote_url: "ftp://example.com".into(),
            remote_api_key: "key".into(),
            ..local_config(&dir)
        };

        let controller = build_controller(&config, Arc::new(AssumeYes)).await.unwrap();
        assert!(!controller.data().is_connected());
    }

    #[test]
    fn summary_client_requires_api_key() {
        let config = AppConfig::empty();
        assert!(summary_client(&config).unwrap().is_none());
    }
}
