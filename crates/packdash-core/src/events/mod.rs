use tracing::{error, info};

use crate::config::PackdashConfig;

/// Log the startup event with the settings that shape every payload.
pub fn log_app_startup(config: &PackdashConfig) {
    info!(
        event = "core.app.startup_completed",
        version = env!("CARGO_PKG_VERSION"),
        refresh_interval_secs = config.refresh.interval_secs(),
        shift_totals_view = config.views.shift_totals(),
        shift_series_view = config.views.shift_series(),
        active_runs_view = config.views.active_runs()
    );
}

pub fn log_app_shutdown() {
    info!(event = "core.app.shutdown_started");
}

pub fn log_app_error(error: &dyn std::error::Error) {
    error!(
        event = "core.app.error_occurred",
        error = %error,
        error_type = std::any::type_name_of_val(error)
    );
}
