//! Best-effort statement execution.

use std::time::Instant;

use tracing::{debug, warn};

use crate::errors::PackdashError;
use crate::warehouse::connection::ConnectionProvider;
use crate::warehouse::types::Table;

/// Result of running one statement.
///
/// Failures never propagate past the executor, but unlike a bare empty table
/// this keeps "no rows" and "query failed" apart so callers can present them
/// differently.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Table),
    Empty,
    Failed(String),
}

impl QueryOutcome {
    /// Collapse to a table; `Empty` and `Failed` both become an empty table.
    pub fn into_table(self) -> Table {
        match self {
            QueryOutcome::Rows(table) => table,
            QueryOutcome::Empty | QueryOutcome::Failed(_) => Table::empty(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }
}

pub struct QueryExecutor {
    provider: ConnectionProvider,
}

impl QueryExecutor {
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    /// Run a statement and materialize its rows.
    ///
    /// Connection-level failures also drop the shared connection so the next
    /// run reconnects.
    pub async fn run(&self, statement: &str) -> QueryOutcome {
        let started = Instant::now();
        debug!(event = "core.query.started", statement = statement);

        let conn = match self.provider.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(
                    event = "core.query.failed",
                    stage = "connect",
                    error = %e,
                    error_code = e.error_code()
                );
                return QueryOutcome::Failed(e.to_string());
            }
        };

        match conn.execute(statement).await {
            Ok(table) if table.is_empty() => {
                debug!(
                    event = "core.query.completed",
                    rows = 0,
                    elapsed_ms = started.elapsed().as_millis() as u64
                );
                QueryOutcome::Empty
            }
            Ok(table) => {
                debug!(
                    event = "core.query.completed",
                    rows = table.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64
                );
                QueryOutcome::Rows(table)
            }
            Err(e) => {
                warn!(
                    event = "core.query.failed",
                    stage = "execute",
                    error = %e,
                    error_code = e.error_code()
                );
                if e.is_connectivity() {
                    self.provider.invalidate().await;
                }
                QueryOutcome::Failed(e.to_string())
            }
        }
    }
}
