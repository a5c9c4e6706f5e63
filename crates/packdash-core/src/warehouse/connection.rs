//! Connection traits and the single shared connection handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::warehouse::errors::WarehouseError;
use crate::warehouse::types::Table;

/// An open handle to the warehouse.
///
/// Implementations must be safe to use from several tasks at once; the
/// provider hands out shared clones of one handle.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Execute one statement and materialize every row.
    async fn execute(&self, statement: &str) -> Result<Table, WarehouseError>;

    /// Whether the handle has been closed by a failure and must be replaced.
    fn is_closed(&self) -> bool;
}

/// Factory for new connections.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn Connection>, WarehouseError>;
}

/// Lazily creates and reuses one connection.
///
/// `acquire` returns the held connection while it is open. Otherwise it
/// creates a new one; if that fails the slot is cleared and exactly one more
/// creation is attempted, whose error is returned to the caller. There is no
/// retry loop and no backoff. The slot is locked for the duration of
/// acquisition so concurrent callers never race to create two handles.
pub struct ConnectionProvider {
    connector: Arc<dyn Connector>,
    slot: Mutex<Option<Arc<dyn Connection>>>,
}

impl ConnectionProvider {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
        }
    }

    pub async fn acquire(&self) -> Result<Arc<dyn Connection>, WarehouseError> {
        let mut slot = self.slot.lock().await;

        if let Some(conn) = slot.as_ref()
            && !conn.is_closed()
        {
            debug!(event = "core.connection.reused");
            return Ok(Arc::clone(conn));
        }

        let conn = match self.connector.connect().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(
                    event = "core.connection.create_failed",
                    error = %e,
                    "Connection creation failed, attempting one fresh connection"
                );
                *slot = None;
                self.connector.connect().await.inspect_err(|e| {
                    warn!(event = "core.connection.fallback_failed", error = %e);
                })?
            }
        };

        info!(event = "core.connection.created");
        *slot = Some(Arc::clone(&conn));
        Ok(conn)
    }

    /// Drop the held connection so the next `acquire` creates a new one.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            info!(event = "core.connection.invalidated");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-memory connector shared by tests across the crate.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    type Responder = dyn Fn(&str) -> Result<Table, WarehouseError> + Send + Sync;

    /// Connection that answers statements through a closure and records them.
    pub struct FakeConnection {
        responder: Arc<Responder>,
        pub closed: AtomicBool,
        pub statements: Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl Connection for FakeConnection {
        async fn execute(&self, statement: &str) -> Result<Table, WarehouseError> {
            self.statements
                .lock()
                .unwrap()
                .push(statement.to_string());
            (self.responder)(statement)
        }

        fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    /// Connector whose successive `connect` calls follow a script; once the
    /// script runs out every call succeeds.
    pub struct FakeConnector {
        responder: Arc<Responder>,
        script: StdMutex<VecDeque<bool>>,
        pub connects: AtomicUsize,
        pub statements: Arc<StdMutex<Vec<String>>>,
        pub last: StdMutex<Option<Arc<FakeConnection>>>,
    }

    impl FakeConnector {
        pub fn new<F>(responder: F) -> Self
        where
            F: Fn(&str) -> Result<Table, WarehouseError> + Send + Sync + 'static,
        {
            Self {
                responder: Arc::new(responder),
                script: StdMutex::new(VecDeque::new()),
                connects: AtomicUsize::new(0),
                statements: Arc::new(StdMutex::new(Vec::new())),
                last: StdMutex::new(None),
            }
        }

        /// Queue connect outcomes (`true` = success).
        pub fn with_script(self, outcomes: &[bool]) -> Self {
            *self.script.lock().unwrap() = outcomes.iter().copied().collect();
            self
        }

        pub fn connect_count(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }

        pub fn executed(&self) -> Vec<String> {
            self.statements.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self) -> Result<Arc<dyn Connection>, WarehouseError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            let succeed = self.script.lock().unwrap().pop_front().unwrap_or(true);
            if !succeed {
                return Err(WarehouseError::ConnectFailed {
                    message: "scripted failure".to_string(),
                });
            }
            let conn = Arc::new(FakeConnection {
                responder: Arc::clone(&self.responder),
                closed: AtomicBool::new(false),
                statements: Arc::clone(&self.statements),
            });
            *self.last.lock().unwrap() = Some(Arc::clone(&conn));
            Ok(conn)
        }
    }
}
