//! Warehouse credentials read from the environment.

use std::fmt;

use crate::errors::ConfigError;

/// Connection parameters for the warehouse.
///
/// Authentication uses a programmatic access token sent as a bearer token.
/// The token is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct WarehouseCredentials {
    pub account: String,
    pub user: String,
    pub token: String,
    pub warehouse: String,
    pub database: String,
    pub schema: String,
    pub role: Option<String>,
}

impl WarehouseCredentials {
    /// Read credentials from `SNOWFLAKE_*` environment variables.
    ///
    /// Call [`load_dotenv`] first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build credentials from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnvVar { name })
        };

        Ok(Self {
            account: required("SNOWFLAKE_ACCOUNT")?,
            user: required("SNOWFLAKE_USER")?,
            token: required("SNOWFLAKE_TOKEN")?,
            warehouse: required("SNOWFLAKE_WAREHOUSE")?,
            database: required("SNOWFLAKE_DATABASE")?,
            schema: required("SNOWFLAKE_SCHEMA")?,
            role: lookup("SNOWFLAKE_ROLE")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    /// Default SQL API endpoint for the account.
    pub fn default_base_url(&self) -> String {
        format!(
            "https://{}.snowflakecomputing.com",
            self.account.to_lowercase()
        )
    }
}

impl fmt::Debug for WarehouseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WarehouseCredentials")
            .field("account", &self.account)
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .field("warehouse", &self.warehouse)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("role", &self.role)
            .finish()
    }
}

/// Load a `.env` file from the working directory, if present.
///
/// Variables already set in the process environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(event = "core.config.dotenv_loaded", path = %path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(
            event = "core.config.dotenv_failed",
            error = %e,
            "Could not load .env file, continuing with process environment"
        ),
    }
}
