//! Configuration type definitions.
//!
//! Every field is optional so that a project config only overrides what it
//! sets; accessors apply the defaults from [`super::defaults`].
//!
//! # Example Configuration
//!
//! ```toml
//! [warehouse]
//! login_timeout_secs = 30
//! network_timeout_secs = 30
//! statement_timeout_secs = 60
//!
//! [views]
//! shift_totals = "FROSTY.STAGING.VW_SHIFT_TOTALS_FAST_03"
//! shift_series = "FROSTY.STAGING.DT_SHIFT_10MIN_KPI_A_PER_RUN03_DT"
//! active_runs = "FROSTY.STAGING.DQ_PTRUN_N_REPORT_03"
//!
//! [refresh]
//! interval_secs = 300
//!
//! [display]
//! tick_secs = 300
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults;

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PackdashConfig {
    /// Warehouse connection timeouts and endpoint override
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Fully qualified names of the three views the dashboard reads
    #[serde(default)]
    pub views: ViewsConfig,

    /// Background refresh of the current shift
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// TV display redraw settings
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WarehouseConfig {
    /// Connect-time timeout when creating a connection.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_timeout_secs: Option<u64>,

    /// Per-request network timeout.
    /// Default: 30 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_timeout_secs: Option<u64>,

    /// Server-side statement timeout sent with each query.
    /// Default: 60 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_timeout_secs: Option<u64>,

    /// Override for the SQL API base URL.
    /// Default: `https://<account>.snowflakecomputing.com`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl WarehouseConfig {
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(
            self.login_timeout_secs
                .unwrap_or(defaults::DEFAULT_LOGIN_TIMEOUT_SECS),
        )
    }

    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(
            self.network_timeout_secs
                .unwrap_or(defaults::DEFAULT_NETWORK_TIMEOUT_SECS),
        )
    }

    pub fn statement_timeout_secs(&self) -> u64 {
        self.statement_timeout_secs
            .unwrap_or(defaults::DEFAULT_STATEMENT_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ViewsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_totals: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_series: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_runs: Option<String>,
}

impl ViewsConfig {
    /// Point-in-time shift summary view (one row per shift).
    pub fn shift_totals(&self) -> &str {
        self.shift_totals
            .as_deref()
            .unwrap_or(defaults::DEFAULT_SHIFT_TOTALS_VIEW)
    }

    /// Ten-minute bucketed KPI view.
    pub fn shift_series(&self) -> &str {
        self.shift_series
            .as_deref()
            .unwrap_or(defaults::DEFAULT_SHIFT_SERIES_VIEW)
    }

    /// Packing runs report view.
    pub fn active_runs(&self) -> &str {
        self.active_runs
            .as_deref()
            .unwrap_or(defaults::DEFAULT_ACTIVE_RUNS_VIEW)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RefreshConfig {
    /// Seconds between background rebuilds of the current shift.
    /// Default: 300 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,
}

impl RefreshConfig {
    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
            .unwrap_or(defaults::DEFAULT_REFRESH_INTERVAL_SECS)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DisplayConfig {
    /// Seconds between TV display redraws.
    /// Default: 300 seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_secs: Option<u64>,
}

impl DisplayConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs.unwrap_or(defaults::DEFAULT_DISPLAY_TICK_SECS))
    }
}
