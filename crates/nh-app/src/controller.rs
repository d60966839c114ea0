//! Application State Controller.
//!
//! Owns the [`WorkingSet`] and the current [`DataService`]. Every action is a
//! thin call into one use case; the controller only keeps the state handed
//! back to it.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use nh_core::ports::{ConfirmationPort, RemoteConnectorPort, SummaryGeneratorPort};
use nh_core::{Backup, Lead, Report, User, UserId, WriteOutcome};

use crate::data_service::{DataError, DataService};
use crate::state::WorkingSet;
use crate::usecases::{
    AddReport, AddUser, AnalyzeReports, AuthError, Authenticate, DeleteLeads, DeleteUser, Deletion,
    DistributeLeads, DistributeLeadsError, ExportBackup, LeadScope, LoadWorkspace,
    ReconfigureRemote, ReportDraft, RestoreBackup, UpdateUser, UploadLeads, UserChanges, UserDraft,
    UserError, UserRemoval,
};

/// Collaborators the controller hands to its use cases.
pub struct ControllerDeps {
    pub connector: Arc<dyn RemoteConnectorPort>,
    pub confirmation: Arc<dyn ConfirmationPort>,
    pub summary: Option<Arc<dyn SummaryGeneratorPort>>,
    /// Password of the administrator synthesized when none exists.
    pub admin_password: Option<String>,
    pub ai_language: String,
    pub remote_timeout: Duration,
}

pub struct AppController {
    data: DataService,
    deps: ControllerDeps,
    state: WorkingSet,
}

impl AppController {
    /// Creates a controller with an empty working set. Call [`Self::load`] next.
    pub fn new(data: DataService, deps: ControllerDeps) -> Self {
        let state = WorkingSet {
            is_cloud: data.is_connected(),
            ..WorkingSet::default()
        };
        Self { data, deps, state }
    }

    pub fn state(&self) -> &WorkingSet {
        &self.state
    }

    pub fn data(&self) -> &DataService {
        &self.data
    }

    /// Replaces the working set with freshly loaded data. The current user
    /// survives a reload when the account still exists.
    pub async fn load(&mut self) -> Result<()> {
        let mut fresh = LoadWorkspace::new(self.data.clone(), self.deps.admin_password.clone())
            .execute()
            .await?;

        fresh.current_user = self
            .state
            .current_user
            .as_ref()
            .and_then(|current| fresh.user(&current.id).cloned());
        self.state = fresh;
        Ok(())
    }

    pub async fn add_report(&mut self, draft: ReportDraft) -> Result<(Report, WriteOutcome), DataError> {
        AddReport::new(self.data.clone())
            .execute(&mut self.state, draft)
            .await
    }

    pub async fn upload_leads(
        &mut self,
        leads: Vec<Lead>,
        operator: Option<UserId>,
    ) -> Result<WriteOutcome, DataError> {
        UploadLeads::new(self.data.clone())
            .execute(&mut self.state, leads, operator)
            .await
    }

    pub async fn distribute_leads(
        &mut self,
        operator: &UserId,
        count: usize,
    ) -> Result<WriteOutcome, DistributeLeadsError> {
        DistributeLeads::new(self.data.clone())
            .execute(&mut self.state, operator, count)
            .await
    }

    pub async fn delete_leads_for_operator(&mut self, operator: &UserId) -> Result<Deletion, DataError> {
        self.delete_leads(LeadScope::Operator(operator.clone())).await
    }

    pub async fn delete_general_pool(&mut self) -> Result<Deletion, DataError> {
        self.delete_leads(LeadScope::GeneralPool).await
    }

    async fn delete_leads(&mut self, scope: LeadScope) -> Result<Deletion, DataError> {
        DeleteLeads::new(self.data.clone(), self.deps.confirmation.clone())
            .execute(&mut self.state, scope)
            .await
    }

    pub async fn add_user(&mut self, draft: UserDraft) -> Result<(User, WriteOutcome), UserError> {
        AddUser::new(self.data.clone())
            .execute(&mut self.state, draft)
            .await
    }

    pub async fn update_user(
        &mut self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<(User, WriteOutcome), UserError> {
        UpdateUser::new(self.data.clone())
            .execute(&mut self.state, id, changes)
            .await
    }

    pub async fn delete_user(&mut self, id: &UserId) -> Result<UserRemoval, UserError> {
        DeleteUser::new(self.data.clone(), self.deps.confirmation.clone())
            .execute(&mut self.state, id)
            .await
    }

    pub async fn export_backup(&self) -> Result<Backup, DataError> {
        ExportBackup::new(self.data.clone()).execute().await
    }

    /// Restores `backup` and reloads the working set from the stores.
    pub async fn restore_backup(&mut self, backup: &Backup) -> Result<WriteOutcome> {
        let outcome = RestoreBackup::new(self.data.clone()).execute(backup).await?;
        self.load().await?;
        Ok(outcome)
    }

    /// Switches to a new backend and reloads everything from it.
    pub async fn reconfigure_remote(&mut self, url: &str, api_key: &str) -> Result<()> {
        let data = ReconfigureRemote::new(self.deps.connector.clone(), self.deps.remote_timeout)
            .execute(&self.data, url, api_key)
            .await?;
        self.data = data;
        self.load().await
    }

    pub fn authenticate(&mut self, name: &str, password: &str) -> Result<User, AuthError> {
        Authenticate::new().execute(&mut self.state, name, password)
    }

    pub fn logout(&mut self) {
        self.state.current_user = None;
    }

    pub async fn analyze_reports(&self) -> String {
        AnalyzeReports::new(self.deps.summary.clone(), self.deps.ai_language.clone())
            .execute(&self.state.reports)
            .await
    }
}
