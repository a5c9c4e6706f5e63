use crate::errors::PackdashError;

#[derive(Debug, thiserror::Error)]
pub enum WarehouseError {
    #[error("Failed to connect to warehouse: {message}")]
    ConnectFailed { message: String },

    #[error("Warehouse rejected credentials (HTTP {status}): {message}")]
    AuthFailed { status: u16, message: String },

    #[error("Warehouse request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Statement failed{}: {message}", code_suffix(.code))]
    StatementFailed {
        code: Option<String>,
        message: String,
    },

    #[error("Statement '{handle}' did not complete within {waited_secs}s")]
    StatementTimeout { handle: String, waited_secs: u64 },

    #[error("Unexpected warehouse response: {message}")]
    InvalidResponse { message: String },

    #[error("Connection is closed")]
    ConnectionClosed,
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" [{c}]"))
        .unwrap_or_default()
}

impl WarehouseError {
    /// Whether the error says something about the connection itself rather
    /// than the statement. The held connection is discarded on these.
    ///
    /// Request timeouts and statements that outlive the poll budget leave
    /// the session usable.
    pub fn is_connectivity(&self) -> bool {
        match self {
            WarehouseError::ConnectFailed { .. }
            | WarehouseError::AuthFailed { .. }
            | WarehouseError::ConnectionClosed => true,
            WarehouseError::Transport { source } => !source.is_timeout(),
            WarehouseError::StatementFailed { .. }
            | WarehouseError::StatementTimeout { .. }
            | WarehouseError::InvalidResponse { .. } => false,
        }
    }
}

impl PackdashError for WarehouseError {
    fn error_code(&self) -> &'static str {
        match self {
            WarehouseError::ConnectFailed { .. } => "WAREHOUSE_CONNECT_FAILED",
            WarehouseError::AuthFailed { .. } => "WAREHOUSE_AUTH_FAILED",
            WarehouseError::Transport { .. } => "WAREHOUSE_TRANSPORT_ERROR",
            WarehouseError::StatementFailed { .. } => "WAREHOUSE_STATEMENT_FAILED",
            WarehouseError::StatementTimeout { .. } => "WAREHOUSE_STATEMENT_TIMEOUT",
            WarehouseError::InvalidResponse { .. } => "WAREHOUSE_INVALID_RESPONSE",
            WarehouseError::ConnectionClosed => "WAREHOUSE_CONNECTION_CLOSED",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, WarehouseError::AuthFailed { .. })
    }
}
