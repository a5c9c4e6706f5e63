//! Snowflake SQL API v2 client.
//!
//! Statements are submitted with `POST /api/v2/statements` using a
//! programmatic access token as bearer credentials. A `202` response means
//! the statement is still running and its handle is polled until it
//! completes or the network timeout elapses. Results larger than one
//! partition are fetched partition by partition.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::{WarehouseConfig, WarehouseCredentials};
use crate::warehouse::connection::{Connection, Connector};
use crate::warehouse::errors::WarehouseError;
use crate::warehouse::types::Table;

const STATEMENTS_PATH: &str = "/api/v2/statements";
const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";
const TOKEN_TYPE: &str = "PROGRAMMATIC_ACCESS_TOKEN";
const POLL_INTERVAL: Duration = Duration::from_millis(500);
const VERIFY_STATEMENT: &str = "SELECT CURRENT_USER()";

/// Creates [`SnowflakeConnection`]s from credentials and timeouts.
pub struct SnowflakeConnector {
    credentials: WarehouseCredentials,
    config: WarehouseConfig,
}

impl SnowflakeConnector {
    pub fn new(credentials: WarehouseCredentials, config: WarehouseConfig) -> Self {
        Self {
            credentials,
            config,
        }
    }

    fn base_url(&self) -> String {
        self.config
            .base_url
            .clone()
            .unwrap_or_else(|| self.credentials.default_base_url())
            .trim_end_matches('/')
            .to_string()
    }

    fn default_headers(&self) -> Result<HeaderMap, WarehouseError> {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.credentials.token))
            .map_err(|_| WarehouseError::ConnectFailed {
                message: "token contains characters not allowed in a header".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(TOKEN_TYPE_HEADER, HeaderValue::from_static(TOKEN_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl SnowflakeConnector {
    /// Build the HTTP session without verifying it.
    ///
    /// Every request is bounded by the network timeout. Statements are
    /// submitted asynchronously, so a slow statement is waited for by polling
    /// for up to the statement timeout plus one network timeout.
    fn open(&self) -> Result<SnowflakeConnection, WarehouseError> {
        let client = reqwest::Client::builder()
            .connect_timeout(self.config.login_timeout())
            .timeout(self.config.network_timeout())
            .default_headers(self.default_headers()?)
            .user_agent(concat!("packdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WarehouseError::ConnectFailed {
                message: e.to_string(),
            })?;

        let statement_timeout_secs = self.config.statement_timeout_secs();
        Ok(SnowflakeConnection {
            client,
            base_url: self.base_url(),
            credentials: self.credentials.clone(),
            statement_timeout_secs,
            poll_budget: Duration::from_secs(statement_timeout_secs)
                + self.config.network_timeout(),
            closed: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl Connector for SnowflakeConnector {
    /// Open a session and verify the credentials with a trivial statement.
    async fn connect(&self) -> Result<Arc<dyn Connection>, WarehouseError> {
        let conn = self.open()?;

        conn.execute(VERIFY_STATEMENT)
            .await
            .map_err(|e| WarehouseError::ConnectFailed {
                message: e.to_string(),
            })?;

        info!(
            event = "core.connection.snowflake_connected",
            account = %self.credentials.account,
            user = %self.credentials.user,
            warehouse = %self.credentials.warehouse
        );
        Ok(Arc::new(conn))
    }
}

/// An authenticated SQL API session.
///
/// The underlying `reqwest::Client` pools HTTP connections and may be used
/// concurrently. Authentication failures and transport failures other than a
/// request timeout mark the connection closed.
pub struct SnowflakeConnection {
    client: reqwest::Client,
    base_url: String,
    credentials: WarehouseCredentials,
    statement_timeout_secs: u64,
    poll_budget: Duration,
    closed: AtomicBool,
}

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    warehouse: &'a str,
    database: &'a str,
    schema: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

/// Body of a statement response (complete, pending or failed).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatementResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub statement_handle: Option<String>,
    #[serde(default)]
    pub result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    pub data: Option<Vec<Vec<Option<serde_json::Value>>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResultSetMetaData {
    #[serde(default)]
    pub row_type: Vec<ColumnType>,
    /// One entry per result partition; only the count is used
    #[serde(default)]
    pub partition_info: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnType {
    pub name: String,
}

enum Submitted {
    Complete(StatementResponse),
    Pending(String),
}

impl SnowflakeConnection {
    fn statements_url(&self) -> String {
        format!("{}{}", self.base_url, STATEMENTS_PATH)
    }

    fn handle_url(&self, handle: &str) -> String {
        format!("{}{}/{}", self.base_url, STATEMENTS_PATH, handle)
    }

    fn transport_failure(&self, e: reqwest::Error) -> WarehouseError {
        if !e.is_timeout() {
            self.closed.store(true, Ordering::SeqCst);
        }
        WarehouseError::Transport { source: e }
    }

    async fn submit(&self, statement: &str) -> Result<Submitted, WarehouseError> {
        let body = StatementRequest {
            statement,
            timeout: self.statement_timeout_secs,
            warehouse: &self.credentials.warehouse,
            database: &self.credentials.database,
            schema: &self.credentials.schema,
            role: self.credentials.role.as_deref(),
        };
        let request_id = uuid::Uuid::new_v4().to_string();

        let response = self
            .client
            .post(self.statements_url())
            .query(&[("requestId", request_id.as_str()), ("async", "true")])
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        self.read_response(response).await
    }

    async fn poll(&self, handle: &str) -> Result<Submitted, WarehouseError> {
        let response = self
            .client
            .get(self.handle_url(handle))
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;
        self.read_response(response).await
    }

    async fn fetch_partition(
        &self,
        handle: &str,
        partition: usize,
    ) -> Result<Vec<Vec<Option<serde_json::Value>>>, WarehouseError> {
        let response = self
            .client
            .get(self.handle_url(handle))
            .query(&[("partition", partition)])
            .send()
            .await
            .map_err(|e| self.transport_failure(e))?;

        match self.read_response(response).await? {
            Submitted::Complete(body) => Ok(body.data.unwrap_or_default()),
            Submitted::Pending(_) => Err(WarehouseError::InvalidResponse {
                message: format!("partition {partition} of '{handle}' reported as pending"),
            }),
        }
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<Submitted, WarehouseError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_failure(e))?;
        let body: StatementResponse = serde_json::from_str(&text).unwrap_or_default();

        match status {
            StatusCode::OK => Ok(Submitted::Complete(body)),
            StatusCode::ACCEPTED => body.statement_handle.map(Submitted::Pending).ok_or_else(|| {
                WarehouseError::InvalidResponse {
                    message: "202 response without statementHandle".to_string(),
                }
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                self.closed.store(true, Ordering::SeqCst);
                Err(WarehouseError::AuthFailed {
                    status: status.as_u16(),
                    message: body.message.unwrap_or(text),
                })
            }
            _ => Err(WarehouseError::StatementFailed {
                code: body.code,
                message: body
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            }),
        }
    }
}

#[async_trait]
impl Connection for SnowflakeConnection {
    async fn execute(&self, statement: &str) -> Result<Table, WarehouseError> {
        if self.is_closed() {
            return Err(WarehouseError::ConnectionClosed);
        }

        let mut submitted = self.submit(statement).await?;
        let deadline = Instant::now() + self.poll_budget;

        let body = loop {
            match submitted {
                Submitted::Complete(body) => break body,
                Submitted::Pending(handle) => {
                    if Instant::now() >= deadline {
                        return Err(WarehouseError::StatementTimeout {
                            handle,
                            waited_secs: self.poll_budget.as_secs(),
                        });
                    }
                    debug!(event = "core.query.statement_pending", handle = %handle);
                    tokio::time::sleep(POLL_INTERVAL).await;
                    submitted = self.poll(&handle).await?;
                }
            }
        };

        let partitions = body
            .result_set_meta_data
            .as_ref()
            .map_or(0, |m| m.partition_info.len());
        let handle = body.statement_handle.clone();
        let mut table = parse_result_set(body)?;

        if partitions > 1 {
            let handle = handle.ok_or_else(|| WarehouseError::InvalidResponse {
                message: "multi-partition result without statementHandle".to_string(),
            })?;
            let (columns, mut rows) = table.into_parts();
            for partition in 1..partitions {
                let data = self.fetch_partition(&handle, partition).await?;
                rows.extend(data.into_iter().map(cells_to_text));
            }
            table = Table::new(columns, rows);
        }

        Ok(table)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Map a completed response body to a table.
pub(crate) fn parse_result_set(body: StatementResponse) -> Result<Table, WarehouseError> {
    let meta = body
        .result_set_meta_data
        .ok_or_else(|| WarehouseError::InvalidResponse {
            message: "response has no resultSetMetaData".to_string(),
        })?;
    let columns: Vec<String> = meta.row_type.into_iter().map(|c| c.name).collect();

    let rows: Vec<Vec<Option<String>>> = body
        .data
        .unwrap_or_default()
        .into_iter()
        .map(cells_to_text)
        .collect();

    if let Some(bad) = rows.iter().find(|r| r.len() != columns.len()) {
        return Err(WarehouseError::InvalidResponse {
            message: format!(
                "row has {} cells but result has {} columns",
                bad.len(),
                columns.len()
            ),
        });
    }

    Ok(Table::new(columns, rows))
}

fn cells_to_text(cells: Vec<Option<serde_json::Value>>) -> Vec<Option<String>> {
    cells
        .into_iter()
        .map(|cell| match cell {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(other) => Some(other.to_string()),
        })
        .collect()
}
