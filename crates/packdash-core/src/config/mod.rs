//! # Configuration System
//!
//! Hierarchical TOML configuration plus environment credentials.
//!
//! ## Configuration Hierarchy
//!
//! Settings are loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.packdash/config.toml`
//! 3. **Project config** - `./.packdash/config.toml`
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! Warehouse credentials never live in these files. They are read from
//! `SNOWFLAKE_*` environment variables (a `.env` file is honored).
//!
//! ## Usage Example
//!
//! ```toml
//! # ./.packdash/config.toml
//! [warehouse]
//! network_timeout_secs = 45
//!
//! [views]
//! shift_totals = "FROSTY.STAGING.VW_SHIFT_TOTALS_FAST_03"
//!
//! [refresh]
//! interval_secs = 120
//! ```
//!
//! ```rust,no_run
//! use packdash_core::config::{PackdashConfig, WarehouseCredentials};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PackdashConfig::load_hierarchy()?;
//!     let credentials = WarehouseCredentials::from_env()?;
//!     println!("{} every {:?}", credentials.account, config.refresh.interval());
//!     Ok(())
//! }
//! ```

pub mod credentials;
pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

// Public API exports
pub use credentials::{WarehouseCredentials, load_dotenv};
pub use types::{DisplayConfig, PackdashConfig, RefreshConfig, ViewsConfig, WarehouseConfig};
pub use validation::validate_config;

impl PackdashConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    ///
    /// See [`validation::validate_config`] for details.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
