use anyhow::{bail, Context, Result};
use nh_core::crypto::hash_password;
use nh_core::User;
use tracing::{info, warn};

use crate::data_service::DataService;
use crate::state::WorkingSet;

/// Loads users, reports and leads and makes sure an administrator exists.
pub struct LoadWorkspace {
    data: DataService,
    admin_password: Option<String>,
}

impl LoadWorkspace {
    pub fn new(data: DataService, admin_password: Option<String>) -> Self {
        Self {
            data,
            admin_password,
        }
    }

    /// Builds a fresh [`WorkingSet`].
    ///
    /// When no administrator is stored anywhere, one is synthesized from the
    /// configured password, persisted, and placed first in the user list.
    /// Without a configured password that is an error.
    #[tracing::instrument(name = "usecase.load_workspace.execute", skip(self))]
    pub async fn execute(&self) -> Result<WorkingSet> {
        let (mut users, reports, leads) = tokio::try_join!(
            self.data.fetch_users(),
            self.data.fetch_reports(),
            self.data.fetch_leads()
        )
        .context("failed to load workspace data")?;

        if !users.iter().any(User::is_admin) {
            let password = match self.admin_password.as_deref() {
                Some(p) if !p.is_empty() => p,
                _ => bail!("no administrator exists and no bootstrap admin password is configured"),
            };

            let hash = hash_password(password).context("failed to hash bootstrap admin password")?;
            let admin = User::bootstrap_admin(hash, self.data.now());
            let outcome = self
                .data
                .save_user(&admin)
                .await
                .context("failed to persist bootstrap administrator")?;
            if !outcome.is_synced() {
                warn!("bootstrap administrator stored locally only");
            }
            info!(admin_id = %admin.id, "bootstrap administrator created");
            users.insert(0, admin);
        }

        info!(
            users = users.len(),
            reports = reports.len(),
            leads = leads.len(),
            cloud = self.data.is_connected(),
            "workspace loaded"
        );

        Ok(WorkingSet {
            users,
            reports,
            leads,
            is_cloud: self.data.is_connected(),
            ..WorkingSet::default()
        })
    }
}
