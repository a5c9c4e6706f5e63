//! Configuration loading and merging logic.
//!
//! # Configuration Hierarchy
//!
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.packdash/config.toml`
//! 3. **Project config** - `./.packdash/config.toml`
//!
//! CLI flags are applied by the binary after loading.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::defaults::CONFIG_DIR_NAME;
use crate::config::types::{
    DisplayConfig, PackdashConfig, RefreshConfig, ViewsConfig, WarehouseConfig,
};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;

/// Load configuration from the hierarchy of config files.
///
/// # Errors
///
/// Returns an error if a present file cannot be read or parsed, or if the
/// merged result fails validation. Missing config files are not errors.
pub fn load_hierarchy() -> Result<PackdashConfig, ConfigError> {
    let mut config = PackdashConfig::default();

    if let Some(path) = user_config_path()
        && let Some(user_config) = load_config_file(&path)?
    {
        config = merge_configs(config, user_config);
    }

    if let Some(path) = project_config_path()
        && let Some(project_config) = load_config_file(&path)?
    {
        config = merge_configs(config, project_config);
    }

    validate_config(&config)?;

    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME).join("config.toml"))
}

fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Load a configuration file, returning `Ok(None)` when it does not exist.
pub fn load_config_file(path: &Path) -> Result<Option<PackdashConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(
                event = "core.config.file_missing",
                path = %path.display()
            );
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::ConfigReadError {
                path: path.display().to_string(),
                source,
            });
        }
    };

    let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    debug!(event = "core.config.file_loaded", path = %path.display());
    Ok(Some(config))
}

/// Merge two configurations, with override_config taking precedence
/// wherever it sets a value.
pub fn merge_configs(base: PackdashConfig, override_config: PackdashConfig) -> PackdashConfig {
    PackdashConfig {
        warehouse: WarehouseConfig {
            login_timeout_secs: override_config
                .warehouse
                .login_timeout_secs
                .or(base.warehouse.login_timeout_secs),
            network_timeout_secs: override_config
                .warehouse
                .network_timeout_secs
                .or(base.warehouse.network_timeout_secs),
            statement_timeout_secs: override_config
                .warehouse
                .statement_timeout_secs
                .or(base.warehouse.statement_timeout_secs),
            base_url: override_config.warehouse.base_url.or(base.warehouse.base_url),
        },
        views: ViewsConfig {
            shift_totals: override_config.views.shift_totals.or(base.views.shift_totals),
            shift_series: override_config.views.shift_series.or(base.views.shift_series),
            active_runs: override_config.views.active_runs.or(base.views.active_runs),
        },
        refresh: RefreshConfig {
            interval_secs: override_config
                .refresh
                .interval_secs
                .or(base.refresh.interval_secs),
        },
        display: DisplayConfig {
            tick_secs: override_config.display.tick_secs.or(base.display.tick_secs),
        },
    }
}
