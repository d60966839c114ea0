use std::collections::BTreeSet;

use async_trait::async_trait;
use nh_core::ports::{RemoteError, RemoteTablePort, SelectOrder, Table};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

const REST_PREFIX: &str = "rest/v1";

/// Table access over the PostgREST HTTP dialect.
pub struct PostgrestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl PostgrestClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            REST_PREFIX,
            table.as_str()
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(map_status_code(status, message))
    }

    async fn write_rows(
        &self,
        table: Table,
        rows: Vec<Value>,
        prefer: &'static str,
    ) -> Result<(), RemoteError> {
        if rows.is_empty() {
            return Ok(());
        }
        let count = rows.len();
        let request = self
            .http
            .post(self.table_url(table))
            .query(&[("columns", columns_of(&rows))])
            .header("Prefer", prefer)
            .json(&rows);
        self.send(request).await?;
        debug!(table = %table, rows = count, "remote write accepted");
        Ok(())
    }
}

#[async_trait]
impl RemoteTablePort for PostgrestClient {
    async fn select_all(
        &self,
        table: Table,
        order: Option<SelectOrder>,
    ) -> Result<Vec<Value>, RemoteError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        if let Some(order) = order {
            let direction = if order.descending { "desc" } else { "asc" };
            query.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        let request = self.http.get(self.table_url(table)).query(&query);
        let response = self.send(request).await?;
        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        debug!(table = %table, rows = rows.len(), "remote select completed");
        Ok(rows)
    }

    async fn upsert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.write_rows(table, rows, "resolution=merge-duplicates,return=minimal")
            .await
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<(), RemoteError> {
        self.write_rows(table, rows, "return=minimal").await
    }

    async fn delete_by_ids(&self, table: Table, ids: Vec<String>) -> Result<(), RemoteError> {
        if ids.is_empty() {
            return Ok(());
        }
        let request = self
            .http
            .delete(self.table_url(table))
            .query(&[("id", in_filter(&ids))]);
        self.send(request).await?;
        debug!(table = %table, rows = ids.len(), "remote delete accepted");
        Ok(())
    }
}

/// Union of the keys of every row, sorted. PostgREST fills columns a row
/// lacks with their default instead of rejecting the batch.
fn columns_of(rows: &[Value]) -> String {
    let keys: BTreeSet<&str> = rows
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();
    keys.into_iter().collect::<Vec<_>>().join(",")
}

/// `in.("a","b")` with PostgREST quoting, so ids may contain commas or parens.
fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

fn map_transport_error(err: reqwest::Error) -> RemoteError {
    if err.is_decode() {
        RemoteError::Decode(err.to_string())
    } else {
        RemoteError::Unreachable(err.to_string())
    }
}

fn map_status_code(code: StatusCode, message: String) -> RemoteError {
    match code {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Unauthorized(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE => RemoteError::Unreachable(format!("{code}: {message}")),
        _ => RemoteError::Rejected {
            status: code.as_u16(),
            message,
        },
    }
}
