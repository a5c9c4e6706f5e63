//! Configuration validation.

use crate::config::types::PackdashConfig;
use crate::errors::ConfigError;

/// Validate the merged configuration.
///
/// Durations must be positive, view names must be plain (optionally
/// qualified) identifiers since they are interpolated into SQL, and a base
/// URL override must be an http(s) URL.
pub fn validate_config(config: &PackdashConfig) -> Result<(), ConfigError> {
    let durations = [
        ("warehouse.login_timeout_secs", config.warehouse.login_timeout_secs),
        (
            "warehouse.network_timeout_secs",
            config.warehouse.network_timeout_secs,
        ),
        (
            "warehouse.statement_timeout_secs",
            config.warehouse.statement_timeout_secs,
        ),
        ("refresh.interval_secs", config.refresh.interval_secs),
        ("display.tick_secs", config.display.tick_secs),
    ];
    for (key, value) in durations {
        if value == Some(0) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    let views = [
        ("views.shift_totals", config.views.shift_totals()),
        ("views.shift_series", config.views.shift_series()),
        ("views.active_runs", config.views.active_runs()),
    ];
    for (key, name) in views {
        if !is_valid_object_name(name) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!(
                    "{key} '{name}' is not a valid object name (letters, digits, '_', '$' and '.')"
                ),
            });
        }
    }

    if let Some(url) = &config.warehouse.base_url
        && !(url.starts_with("https://") || url.starts_with("http://"))
    {
        return Err(ConfigError::InvalidConfiguration {
            message: format!("warehouse.base_url '{url}' must start with http:// or https://"),
        });
    }

    Ok(())
}

fn is_valid_object_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}
