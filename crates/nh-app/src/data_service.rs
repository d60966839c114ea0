//! Data Service: the single writer to both the hosted backend and the local mirror.
//!
//! Reads prefer the remote and fall back to the mirror snapshot on any remote
//! failure. Writes always land in the mirror; the remote half is best-effort
//! and its result is reported as a [`WriteOutcome`] instead of being retried.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use nh_core::ports::{
    ClockPort, LocalMirrorPort, MirrorError, MirrorKey, RemoteConfig, RemoteConnectorPort,
    RemoteError, RemoteTablePort, SelectOrder, Table,
};
use nh_core::{Backup, Lead, LeadId, Report, User, UserId, WriteOutcome};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum DataError {
    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot connect to remote backend: {0}")]
    Connect(#[source] RemoteError),
}

/// Result of [`DataService::delete_leads`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadDeletion {
    pub removed: Vec<LeadId>,
    pub outcome: WriteOutcome,
}

enum RemoteOp {
    Upsert(Vec<Value>),
    Insert(Vec<Value>),
    Delete(Vec<String>),
}

#[derive(Clone)]
pub struct DataService {
    remote: Option<Arc<dyn RemoteTablePort>>,
    mirror: Arc<dyn LocalMirrorPort>,
    clock: Arc<dyn ClockPort>,
}

impl DataService {
    pub fn new(
        remote: Option<Arc<dyn RemoteTablePort>>,
        mirror: Arc<dyn LocalMirrorPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            remote,
            mirror,
            clock,
        }
    }

    /// Builds the service for startup.
    ///
    /// Connection parameters persisted in the mirror by [`Self::reconfigure`]
    /// win over `fallback`. An incomplete or unusable configuration yields a
    /// local-only service rather than an error.
    pub async fn open(
        connector: &dyn RemoteConnectorPort,
        mirror: Arc<dyn LocalMirrorPort>,
        clock: Arc<dyn ClockPort>,
        fallback: RemoteConfig,
    ) -> Result<Self, DataError> {
        let stored_url = mirror.read(MirrorKey::RemoteUrl).await?;
        let stored_key = mirror.read(MirrorKey::RemoteKey).await?;

        let config = match (stored_url, stored_key) {
            (Some(url), Some(api_key)) if !url.trim().is_empty() && !api_key.trim().is_empty() => {
                debug!("using remote connection stored in local mirror");
                RemoteConfig {
                    url,
                    api_key,
                    timeout: fallback.timeout,
                }
            }
            _ => fallback,
        };

        let remote = if config.is_complete() {
            match connector.connect(&config) {
                Ok(remote) => Some(remote),
                Err(err) => {
                    warn!(error = %err, "remote backend unavailable, running on local mirror only");
                    None
                }
            }
        } else {
            info!("no remote backend configured, running on local mirror only");
            None
        };

        Ok(Self::new(remote, mirror, clock))
    }

    /// Whether a remote handle exists. Says nothing about reachability.
    pub fn is_connected(&self) -> bool {
        self.remote.is_some()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Persists new connection parameters and returns a service bound to them.
    ///
    /// `self` keeps its old handle, so calls already running on it are not
    /// affected.
    pub async fn reconfigure(
        &self,
        connector: &dyn RemoteConnectorPort,
        config: RemoteConfig,
    ) -> Result<DataService, DataError> {
        let remote = connector.connect(&config).map_err(DataError::Connect)?;

        self.mirror.write(MirrorKey::RemoteUrl, &config.url).await?;
        self.mirror.write(MirrorKey::RemoteKey, &config.api_key).await?;
        info!("remote connection parameters updated");

        Ok(Self::new(Some(remote), self.mirror.clone(), self.clock.clone()))
    }

    // === Reads ===

    pub async fn fetch_users(&self) -> Result<Vec<User>, DataError> {
        self.fetch_or_fallback(Table::Users, MirrorKey::Users, None)
            .await
    }

    /// Remote results are newest first; the fallback keeps mirror order.
    pub async fn fetch_reports(&self) -> Result<Vec<Report>, DataError> {
        self.fetch_or_fallback(
            Table::Reports,
            MirrorKey::Reports,
            Some(SelectOrder::desc("timestamp")),
        )
        .await
    }

    pub async fn fetch_leads(&self) -> Result<Vec<Lead>, DataError> {
        self.fetch_or_fallback(Table::Leads, MirrorKey::Leads, None)
            .await
    }

    // === Writes ===

    pub async fn save_user(&self, user: &User) -> Result<WriteOutcome, DataError> {
        self.merge_snapshot(MirrorKey::Users, std::slice::from_ref(user), |u| u.id.as_str())
            .await?;
        let rows = to_rows("user", std::slice::from_ref(user))?;
        Ok(self.push_remote(Table::Users, RemoteOp::Upsert(rows)).await)
    }

    pub async fn delete_user(&self, id: &UserId) -> Result<WriteOutcome, DataError> {
        let mut users: Vec<User> = self.read_snapshot(MirrorKey::Users).await?;
        users.retain(|u| &u.id != id);
        self.write_snapshot(MirrorKey::Users, &users).await?;

        Ok(self
            .push_remote(Table::Users, RemoteOp::Delete(vec![id.to_string()]))
            .await)
    }

    /// Reports are insert-only and the mirror keeps them newest first.
    pub async fn save_report(&self, report: &Report) -> Result<WriteOutcome, DataError> {
        let mut reports: Vec<Report> = self.read_snapshot(MirrorKey::Reports).await?;
        reports.insert(0, report.clone());
        self.write_snapshot(MirrorKey::Reports, &reports).await?;

        let rows = to_rows("report", std::slice::from_ref(report))?;
        Ok(self.push_remote(Table::Reports, RemoteOp::Insert(rows)).await)
    }

    pub async fn save_leads(&self, leads: &[Lead]) -> Result<WriteOutcome, DataError> {
        if leads.is_empty() {
            return Ok(WriteOutcome::Synced);
        }
        self.merge_snapshot(MirrorKey::Leads, leads, |l| l.id.as_str())
            .await?;
        let rows = to_rows("lead", leads)?;
        Ok(self.push_remote(Table::Leads, RemoteOp::Upsert(rows)).await)
    }

    pub async fn update_lead(&self, lead: &Lead) -> Result<WriteOutcome, DataError> {
        self.save_leads(std::slice::from_ref(lead)).await
    }

    /// Deletes every lead of the current set (remote-preferred) matching `predicate`.
    pub async fn delete_leads<P>(&self, predicate: P) -> Result<LeadDeletion, DataError>
    where
        P: Fn(&Lead) -> bool,
    {
        let removed: Vec<LeadId> = self
            .fetch_leads()
            .await?
            .into_iter()
            .filter(|l| predicate(l))
            .map(|l| l.id)
            .collect();

        if removed.is_empty() {
            debug!("no leads matched deletion filter");
            return Ok(LeadDeletion {
                removed,
                outcome: WriteOutcome::Synced,
            });
        }

        let mut mirrored: Vec<Lead> = self.read_snapshot(MirrorKey::Leads).await?;
        mirrored.retain(|l| !removed.contains(&l.id));
        self.write_snapshot(MirrorKey::Leads, &mirrored).await?;

        let ids = removed.iter().map(|id| id.to_string()).collect();
        let outcome = self.push_remote(Table::Leads, RemoteOp::Delete(ids)).await;
        info!(count = removed.len(), "leads deleted");
        Ok(LeadDeletion { removed, outcome })
    }

    // === Backup ===

    pub async fn export_full_backup(&self) -> Result<Backup, DataError> {
        let (users, reports, leads) =
            tokio::try_join!(self.fetch_users(), self.fetch_reports(), self.fetch_leads())?;

        Ok(Backup {
            users,
            reports,
            leads,
            export_date: self.clock.now(),
        })
    }

    /// Upserts every record of `backup`. Existing ids are overwritten.
    pub async fn restore_backup(&self, backup: &Backup) -> Result<WriteOutcome, DataError> {
        self.merge_snapshot(MirrorKey::Users, &backup.users, |u| u.id.as_str())
            .await?;
        self.merge_snapshot(MirrorKey::Reports, &backup.reports, |r| r.id.as_str())
            .await?;
        self.merge_snapshot(MirrorKey::Leads, &backup.leads, |l| l.id.as_str())
            .await?;

        let mut outcome = WriteOutcome::Synced;
        if !backup.users.is_empty() {
            let rows = to_rows("user", &backup.users)?;
            outcome = outcome.merge(self.push_remote(Table::Users, RemoteOp::Upsert(rows)).await);
        }
        if !backup.reports.is_empty() {
            let rows = to_rows("report", &backup.reports)?;
            outcome = outcome.merge(self.push_remote(Table::Reports, RemoteOp::Upsert(rows)).await);
        }
        if !backup.leads.is_empty() {
            let rows = to_rows("lead", &backup.leads)?;
            outcome = outcome.merge(self.push_remote(Table::Leads, RemoteOp::Upsert(rows)).await);
        }

        info!(
            users = backup.users.len(),
            reports = backup.reports.len(),
            leads = backup.leads.len(),
            synced = outcome.is_synced(),
            "backup restored"
        );
        Ok(outcome)
    }

    // === Internals ===

    async fn fetch_or_fallback<T: DeserializeOwned>(
        &self,
        table: Table,
        key: MirrorKey,
        order: Option<SelectOrder>,
    ) -> Result<Vec<T>, DataError> {
        match self.fetch_remote(table, order).await {
            Ok(items) => Ok(items),
            Err(RemoteError::NotConfigured) => self.read_snapshot(key).await,
            Err(err) => {
                warn!(table = %table, error = %err, "remote read failed, using local mirror");
                self.read_snapshot(key).await
            }
        }
    }

    async fn fetch_remote<T: DeserializeOwned>(
        &self,
        table: Table,
        order: Option<SelectOrder>,
    ) -> Result<Vec<T>, RemoteError> {
        let remote = self.remote.as_ref().ok_or(RemoteError::NotConfigured)?;
        remote
            .select_all(table, order)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| RemoteError::Decode(e.to_string())))
            .collect()
    }

    async fn push_remote(&self, table: Table, op: RemoteOp) -> WriteOutcome {
        let Some(remote) = self.remote.as_ref() else {
            return WriteOutcome::LocalOnly {
                reason: RemoteError::NotConfigured.to_string(),
            };
        };

        let result = match op {
            RemoteOp::Upsert(rows) => remote.upsert(table, rows).await,
            RemoteOp::Insert(rows) => remote.insert(table, rows).await,
            RemoteOp::Delete(ids) => remote.delete_by_ids(table, ids).await,
        };

        match result {
            Ok(()) => WriteOutcome::Synced,
            Err(err) => {
                warn!(table = %table, error = %err, "remote write failed, kept in local mirror only");
                WriteOutcome::LocalOnly {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// A missing or blank entry is an empty collection.
    async fn read_snapshot<T: DeserializeOwned>(&self, key: MirrorKey) -> Result<Vec<T>, DataError> {
        match self.mirror.read(key).await? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).map_err(|e| {
                    DataError::Mirror(MirrorError::Corrupt {
                        key: key.to_string(),
                        message: e.to_string(),
                    })
                })
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn write_snapshot<T: Serialize>(&self, key: MirrorKey, items: &[T]) -> Result<(), DataError> {
        let raw = serde_json::to_string(items).map_err(|source| DataError::Encode {
            what: "mirror snapshot",
            source,
        })?;
        self.mirror.write(key, &raw).await?;
        Ok(())
    }

    /// Replaces items with the same id in place and appends the rest.
    async fn merge_snapshot<T, F>(&self, key: MirrorKey, incoming: &[T], id_of: F) -> Result<(), DataError>
    where
        T: Serialize + DeserializeOwned + Clone,
        F: Fn(&T) -> &str,
    {
        let mut items: Vec<T> = self.read_snapshot(key).await?;
        for item in incoming {
            match items.iter().position(|existing| id_of(existing) == id_of(item)) {
                Some(pos) => items[pos] = item.clone(),
                None => items.push(item.clone()),
            }
        }
        self.write_snapshot(key, &items).await
    }
}

fn to_rows<T: Serialize>(what: &'static str, items: &[T]) -> Result<Vec<Value>, DataError> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(|source| DataError::Encode { what, source }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use nh_core::LeadStatus;
    use nh_infra::InMemoryMirrorStore;
    use serde_json::json;

    mockall::mock! {
        pub Remote {}

        #[async_trait]
        impl RemoteTablePort for Remote {
            async fn select_all(&self, table: Table, order: Option<SelectOrder>) -> Result<Vec<Value>, RemoteError>;
            async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError>;
            async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError>;
            async fn delete_by_ids(&self, table: Table, ids: Vec<String>) -> Result<(), RemoteError>;
        }
    }

    struct FixedClock;

    impl ClockPort for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
        }
    }

    /// Connector that remembers every config it was asked to connect with.
    #[derive(Default)]
    struct RecordingConnector {
        seen: std::sync::Mutex<Vec<RemoteConfig>>,
    }

    impl RecordingConnector {
        fn urls(&self) -> Vec<String> {
            self.seen.lock().unwrap().iter().map(|c| c.url.clone()).collect()
        }
    }

    impl RemoteConnectorPort for RecordingConnector {
        fn connect(&self, config: &RemoteConfig) -> Result<Arc<dyn RemoteTablePort>, RemoteError> {
            self.seen.lock().unwrap().push(config.clone());
            Ok(Arc::new(MockRemote::new()))
        }
    }

    fn fallback() -> RemoteConfig {
        RemoteConfig {
            url: "https://fallback.supabase.co".into(),
            api_key: "fallback-key".into(),
            timeout: std::time::Duration::from_secs(3),
        }
    }

    fn service(remote: Option<MockRemote>, mirror: Arc<InMemoryMirrorStore>) -> DataService {
        DataService::new(
            remote.map(|r| Arc::new(r) as Arc<dyn RemoteTablePort>),
            mirror,
            Arc::new(FixedClock),
        )
    }

    fn lead(id: &str) -> Lead {
        Lead {
            id: LeadId::from(id),
            name: format!("Lead {id}"),
            phone: "+998".into(),
            address: None,
            note: None,
            assigned_to: None,
            status: LeadStatus::New,
        }
    }

    fn report(id: &str) -> Report {
        Report {
            id: id.into(),
            operator_name: "Jasur".into(),
            visit_status: "visited".into(),
            tasks_completed: "called back".into(),
            timestamp: FixedClock.now(),
            lead_id: None,
        }
    }

    #[tokio::test]
    async fn failed_remote_read_returns_mirror_snapshot() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let snapshot = vec![lead("a"), lead("b")];
        mirror
            .write(MirrorKey::Leads, &serde_json::to_string(&snapshot).unwrap())
            .await
            .unwrap();

        let mut remote = MockRemote::new();
        remote
            .expect_select_all()
            .with(eq(Table::Leads), eq(None::<SelectOrder>))
            .returning(|_, _| Err(RemoteError::Unreachable("connection refused".into())));

        let leads = service(Some(remote), mirror).fetch_leads().await.unwrap();
        assert_eq!(leads, snapshot);
    }

    #[tokio::test]
    async fn reports_are_requested_newest_first() {
        let mut remote = MockRemote::new();
        remote
            .expect_select_all()
            .with(eq(Table::Reports), eq(Some(SelectOrder::desc("timestamp"))))
            .times(1)
            .returning(|_, _| Ok(vec![serde_json::to_value(report("r1")).unwrap()]));

        let reports = service(Some(remote), Arc::new(InMemoryMirrorStore::new()))
            .fetch_reports()
            .await
            .unwrap();
        assert_eq!(reports, vec![report("r1")]);
    }

    #[tokio::test]
    async fn undecodable_remote_rows_fall_back_to_mirror() {
        let mut remote = MockRemote::new();
        remote
            .expect_select_all()
            .returning(|_, _| Ok(vec![json!({"id": 7})]));

        let users = service(Some(remote), Arc::new(InMemoryMirrorStore::new()))
            .fetch_users()
            .await
            .unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn corrupt_mirror_is_an_error() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        mirror.write(MirrorKey::Users, "{not json").await.unwrap();

        let err = service(None, mirror).fetch_users().await.unwrap_err();
        assert!(matches!(err, DataError::Mirror(MirrorError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn remote_write_failure_is_reported_not_raised() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let mut remote = MockRemote::new();
        remote
            .expect_insert()
            .times(1)
            .returning(|_, _| Err(RemoteError::Unreachable("timeout".into())));

        let outcome = service(Some(remote), mirror.clone())
            .save_report(&report("r1"))
            .await
            .unwrap();

        assert!(matches!(outcome, WriteOutcome::LocalOnly { .. }));
        let stored = mirror.read(MirrorKey::Reports).await.unwrap().unwrap();
        assert!(stored.contains("\"r1\""));
    }

    #[tokio::test]
    async fn reports_are_prepended_in_mirror() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let data = service(None, mirror);

        data.save_report(&report("first")).await.unwrap();
        data.save_report(&report("second")).await.unwrap();

        let ids: Vec<String> = data
            .fetch_reports()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.into_inner())
            .collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn lead_writes_are_mirrored() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let mut remote = MockRemote::new();
        remote.expect_upsert().times(2).returning(|_, _| Ok(()));
        remote
            .expect_select_all()
            .returning(|_, _| Err(RemoteError::Unreachable("offline".into())));
        let data = service(Some(remote), mirror);

        data.save_leads(&[lead("a"), lead("b")]).await.unwrap();
        let mut called = lead("a");
        called.status = LeadStatus::Called;
        let outcome = data.update_lead(&called).await.unwrap();

        assert!(outcome.is_synced());
        let leads = data.fetch_leads().await.unwrap();
        assert_eq!(leads, vec![called, lead("b")]);
    }

    #[tokio::test]
    async fn delete_leads_filters_current_set() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let mut assigned = lead("a");
        assigned.assigned_to = Some(UserId::from("op"));
        let current = vec![assigned.clone(), lead("b")];
        mirror
            .write(MirrorKey::Leads, &serde_json::to_string(&current).unwrap())
            .await
            .unwrap();

        let rows: Vec<Value> = current.iter().map(|l| serde_json::to_value(l).unwrap()).collect();
        let mut remote = MockRemote::new();
        remote.expect_select_all().returning(move |_, _| Ok(rows.clone()));
        remote
            .expect_delete_by_ids()
            .with(eq(Table::Leads), eq(vec!["b".to_string()]))
            .times(1)
            .returning(|_, _| Ok(()));

        let deletion = service(Some(remote), mirror.clone())
            .delete_leads(|l| l.assigned_to.is_none())
            .await
            .unwrap();

        assert_eq!(deletion.removed, vec![LeadId::from("b")]);
        assert!(deletion.outcome.is_synced());
        let raw = mirror.read(MirrorKey::Leads).await.unwrap().unwrap();
        let left: Vec<Lead> = serde_json::from_str(&raw).unwrap();
        assert_eq!(left, vec![assigned]);
    }

    #[tokio::test]
    async fn delete_leads_without_matches_is_noop() {
        let mut remote = MockRemote::new();
        remote.expect_select_all().returning(|_, _| Ok(vec![]));
        remote.expect_delete_by_ids().never();

        let deletion = service(Some(remote), Arc::new(InMemoryMirrorStore::new()))
            .delete_leads(|_| true)
            .await
            .unwrap();
        assert!(deletion.removed.is_empty());
    }

    #[tokio::test]
    async fn local_only_service_reports_not_connected() {
        let data = service(None, Arc::new(InMemoryMirrorStore::new()));
        assert!(!data.is_connected());

        let outcome = data.save_leads(&[lead("a")]).await.unwrap();
        assert!(!outcome.is_synced());
    }

    #[tokio::test]
    async fn backup_is_stamped_with_clock() {
        let data = service(None, Arc::new(InMemoryMirrorStore::new()));
        data.save_report(&report("r1")).await.unwrap();

        let backup = data.export_full_backup().await.unwrap();
        assert_eq!(backup.export_date, FixedClock.now());
        assert_eq!(backup.reports.len(), 1);
        assert!(backup.users.is_empty());
    }

    #[tokio::test]
    async fn stored_connection_wins_over_fallback() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        mirror.write(MirrorKey::RemoteUrl, "https://stored.supabase.co").await.unwrap();
        mirror.write(MirrorKey::RemoteKey, "stored-key").await.unwrap();
        let connector = RecordingConnector::default();

        let data = DataService::open(&connector, mirror, Arc::new(FixedClock), fallback())
            .await
            .unwrap();

        assert!(data.is_connected());
        let seen = connector.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "https://stored.supabase.co");
        assert_eq!(seen[0].api_key, "stored-key");
        assert_eq!(seen[0].timeout, fallback().timeout);
    }

    #[tokio::test]
    async fn blank_stored_connection_uses_fallback() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        mirror.write(MirrorKey::RemoteUrl, "https://stored.supabase.co").await.unwrap();
        mirror.write(MirrorKey::RemoteKey, "  ").await.unwrap();
        let connector = RecordingConnector::default();

        let data = DataService::open(&connector, mirror, Arc::new(FixedClock), fallback())
            .await
            .unwrap();

        assert!(data.is_connected());
        assert_eq!(connector.urls(), vec!["https://fallback.supabase.co".to_string()]);
    }

    #[tokio::test]
    async fn reconfigure_leaves_previous_service_alone() {
        let mirror = Arc::new(InMemoryMirrorStore::new());
        let connector = RecordingConnector::default();
        let before = service(None, mirror.clone());

        let after = before
            .reconfigure(
                &connector,
                RemoteConfig {
                    url: "https://new.supabase.co".into(),
                    api_key: "new-key".into(),
                    timeout: std::time::Duration::from_secs(3),
                },
            )
            .await
            .unwrap();

        assert!(!before.is_connected());
        assert!(after.is_connected());
        assert_eq!(
            mirror.read(MirrorKey::RemoteUrl).await.unwrap().as_deref(),
            Some("https://new.supabase.co")
        );
    }
}
