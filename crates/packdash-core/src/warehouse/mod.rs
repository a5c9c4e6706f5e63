//! Warehouse access: connection reuse, the Snowflake SQL API client and the
//! best-effort query executor.

pub mod connection;
pub mod errors;
pub mod executor;
pub mod snowflake;
pub mod types;

pub use connection::{Connection, ConnectionProvider, Connector};
pub use errors::WarehouseError;
pub use executor::{QueryExecutor, QueryOutcome};
pub use snowflake::SnowflakeConnector;
pub use types::{RowRef, Table};
