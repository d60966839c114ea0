use async_trait::async_trait;
use serde_json::Value;

use super::errors::RemoteError;

/// Tables of the hosted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Users,
    Reports,
    Leads,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::Reports => "reports",
            Table::Leads => "leads",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side ordering for [`RemoteTablePort::select_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOrder {
    pub column: &'static str,
    pub descending: bool,
}

impl SelectOrder {
    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            descending: true,
        }
    }
}

/// Row-level access to the hosted relational backend.
///
/// Rows travel as JSON objects keyed by column name; every table has a text
/// `id` primary key.
#[async_trait]
pub trait RemoteTablePort: Send + Sync {
    async fn select_all(
        &self,
        table: Table,
        order: Option<SelectOrder>,
    ) -> Result<Vec<Value>, RemoteError>;

    /// Insert or replace rows by `id`.
    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError>;

    /// Plain insert; fails on duplicate ids.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError>;

    /// Delete every row whose `id` is in `ids`.
    async fn delete_by_ids(&self, table: Table, ids: Vec<String>) -> Result<(), RemoteError>;
}
