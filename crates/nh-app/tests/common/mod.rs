#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use nh_app::{AppController, ControllerDeps, DataService};
use nh_core::ports::{
    ClockPort, ConfirmationPort, LocalMirrorPort, MirrorError, MirrorKey, RemoteConfig,
    RemoteConnectorPort, RemoteError, RemoteTablePort, SelectOrder, Table,
};
use nh_infra::InMemoryMirrorStore;
use serde_json::Value;

pub const ADMIN_PASSWORD: &str = "bootstrap-secret";

/// Hosted backend stand-in. `set_offline(true)` makes every call fail.
#[derive(Default)]
pub struct InMemoryRemote {
    tables: Mutex<HashMap<Table, Vec<Value>>>,
    offline: AtomicBool,
}

impl InMemoryRemote {
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.lock().unwrap().get(&table).cloned().unwrap_or_default()
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RemoteError::Unreachable("backend offline".into()))
        } else {
            Ok(())
        }
    }
}

fn id_of(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl RemoteTablePort for InMemoryRemote {
    async fn select_all(&self, table: Table, order: Option<SelectOrder>) -> Result<Vec<Value>, RemoteError> {
        self.check()?;
        let mut rows = self.rows(table);
        if let Some(order) = order {
            rows.sort_by(|a, b| {
                let a = a.get(order.column).and_then(Value::as_str).unwrap_or("");
                let b = b.get(order.column).and_then(Value::as_str).unwrap_or("");
                if order.descending { b.cmp(a) } else { a.cmp(b) }
            });
        }
        Ok(rows)
    }

    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table).or_default();
        for row in rows {
            match stored.iter().position(|r| id_of(r) == id_of(&row)) {
                Some(pos) => stored[pos] = row,
                None => stored.push(row),
            }
        }
        Ok(())
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let stored = tables.entry(table).or_default();
        for row in rows {
            if stored.iter().any(|r| id_of(r) == id_of(&row)) {
                return Err(RemoteError::Rejected {
                    status: 409,
                    message: "duplicate key".into(),
                });
            }
            stored.push(row);
        }
        Ok(())
    }

    async fn delete_by_ids(&self, table: Table, ids: Vec<String>) -> Result<(), RemoteError> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        if let Some(stored) = tables.get_mut(&table) {
            stored.retain(|r| !id_of(r).is_some_and(|id| ids.iter().any(|x| x.as_str() == id)));
        }
        Ok(())
    }
}

/// Hands out the same in-memory backend for any complete configuration.
pub struct StaticConnector {
    pub remote: Arc<InMemoryRemote>,
}

impl RemoteConnectorPort for StaticConnector {
    fn connect(&self, config: &RemoteConfig) -> Result<Arc<dyn RemoteTablePort>, RemoteError> {
        if !config.is_complete() {
            return Err(RemoteError::NotConfigured);
        }
        Ok(self.remote.clone())
    }
}

pub struct AutoConfirm {
    answer: AtomicBool,
    pub prompts: Mutex<Vec<String>>,
}

impl AutoConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConfirmationPort for AutoConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

pub struct FixedClock;

impl FixedClock {
    pub fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }
}

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Self::instant()
    }
}

pub struct Harness {
    pub controller: AppController,
    pub remote: Arc<InMemoryRemote>,
    pub mirror: Arc<InMemoryMirrorStore>,
    pub confirm: Arc<AutoConfirm>,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mirror that starts failing lead writes once `fail_lead_writes_after(n)`
/// has let `n` more of them through.
pub struct FlakyMirror {
    inner: Arc<InMemoryMirrorStore>,
    lead_writes_left: AtomicUsize,
}

impl FlakyMirror {
    pub fn new(inner: Arc<InMemoryMirrorStore>) -> Self {
        Self {
            inner,
            lead_writes_left: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn fail_lead_writes_after(&self, writes: usize) {
        self.lead_writes_left.store(writes, Ordering::SeqCst);
    }
}

#[async_trait]
impl LocalMirrorPort for FlakyMirror {
    async fn read(&self, key: MirrorKey) -> Result<Option<String>, MirrorError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: MirrorKey, value: &str) -> Result<(), MirrorError> {
        if key == MirrorKey::Leads {
            let allowed = self
                .lead_writes_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok();
            if !allowed {
                return Err(MirrorError::Io(std::io::Error::other("disk full")));
            }
        }
        self.inner.write(key, value).await
    }
}

fn build_harness(store: Arc<InMemoryMirrorStore>, port: Arc<dyn LocalMirrorPort>) -> Harness {
    init_tracing();
    let remote = Arc::new(InMemoryRemote::default());
    let confirm = Arc::new(AutoConfirm::new(true));

    let data = DataService::new(Some(remote.clone()), port, Arc::new(FixedClock));
    let deps = ControllerDeps {
        connector: Arc::new(StaticConnector {
            remote: remote.clone(),
        }),
        confirmation: confirm.clone(),
        summary: None,
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        ai_language: "English".into(),
        remote_timeout: Duration::from_secs(5),
    };

    Harness {
        controller: AppController::new(data, deps),
        remote,
        mirror: store,
        confirm,
    }
}

/// Controller wired to an in-memory backend and mirror, not yet loaded.
pub fn harness() -> Harness {
    let store = Arc::new(InMemoryMirrorStore::new());
    build_harness(store.clone(), store)
}

/// Like [`harness`], with lead writes to the mirror under test control.
pub fn flaky_harness() -> (Harness, Arc<FlakyMirror>) {
    let store = Arc::new(InMemoryMirrorStore::new());
    let flaky = Arc::new(FlakyMirror::new(store.clone()));
    (build_harness(store, flaky.clone()), flaky)
}
