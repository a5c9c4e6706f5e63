//! Packing KPIs: the shared status rule, typed rows, SQL for the three
//! views, and the payload builder that ties them together.

pub mod builder;
pub mod format;
pub mod queries;
pub mod rows;
pub mod status;
pub mod types;

pub use builder::PayloadBuilder;
pub use rows::{RunRecord, ShiftKey, ShiftSummaryRow, TimeSeriesPoint};
pub use status::{Palette, StatusTier, classify, delta_pct};
pub use types::{Card, ChartPoint, ChartSpec, Payload, PayloadState, RunRow, RunTable, Selector};
