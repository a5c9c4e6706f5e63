//! packdash-core: Core library for the packing-shift KPI dashboard
//!
//! This library provides the business logic behind the dashboard: it queries
//! the warehouse, derives card/chart/table payloads, caches them per selector
//! and keeps the "current shift" entry fresh from a background task. It is
//! used by the CLI and the TV display.
//!
//! # Main Entry Points
//!
//! - [`dashboard`] - Serve a payload for a selector (cache hit or build)
//! - [`kpi`] - Status rule, row mapping, queries and the payload builder
//! - [`warehouse`] - Connection provider, Snowflake client, query executor
//! - [`refresh`] - Background refresher for the current shift
//! - [`config`] - Configuration management

pub mod cache;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod events;
pub mod kpi;
pub mod logging;
pub mod refresh;
pub mod warehouse;

// Re-export commonly used types at crate root for convenience
pub use cache::PayloadCache;
pub use config::{PackdashConfig, WarehouseCredentials};
pub use dashboard::{Dashboard, RefreshOutcome};
pub use kpi::builder::PayloadBuilder;
pub use kpi::status::{Palette, StatusTier};
pub use kpi::types::{Card, ChartPoint, ChartSpec, Payload, PayloadState, RunRow, RunTable, Selector};
pub use refresh::{RefreshStats, Refresher};
pub use warehouse::{ConnectionProvider, QueryExecutor, QueryOutcome, Table, WarehouseError};

// Re-export logging initialization
pub use logging::init_logging;
