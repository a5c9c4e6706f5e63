//! Default values for configuration types.

/// Connect-time timeout used when creating a warehouse connection.
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 30;

/// Network timeout for each warehouse request.
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 30;

/// Server-side statement timeout.
pub const DEFAULT_STATEMENT_TIMEOUT_SECS: u64 = 60;

/// Interval between background rebuilds of the current shift payload.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Interval between TV display redraws.
pub const DEFAULT_DISPLAY_TICK_SECS: u64 = 300;

pub const DEFAULT_SHIFT_TOTALS_VIEW: &str = "FROSTY.STAGING.VW_SHIFT_TOTALS_FAST_03";
pub const DEFAULT_SHIFT_SERIES_VIEW: &str = "FROSTY.STAGING.DT_SHIFT_10MIN_KPI_A_PER_RUN03_DT";
pub const DEFAULT_ACTIVE_RUNS_VIEW: &str = "FROSTY.STAGING.DQ_PTRUN_N_REPORT_03";

/// Directory name (under home or the working directory) holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".packdash";
