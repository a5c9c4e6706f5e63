use std::error::Error;

/// Base trait for all application errors
pub trait PackdashError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error was caused by user input or local setup
    /// rather than by the warehouse or the network
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type PackdashResult<T> = Result<T, Box<dyn PackdashError>>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ConfigReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Missing environment variable '{name}' (set it in the environment or in .env)")]
    MissingEnvVar { name: &'static str },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid date '{value}'. Expected YYYY-MM-DD or 'today'")]
    InvalidSelector { value: String },
}

impl PackdashError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigReadError { .. } => "CONFIG_READ_ERROR",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::MissingEnvVar { .. } => "CONFIG_MISSING_ENV",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::InvalidSelector { .. } => "INVALID_SELECTOR",
        }
    }

    fn is_user_error(&self) -> bool {
        !matches!(self, ConfigError::ConfigReadError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packdash_result() {
        let _result: PackdashResult<i32> = Ok(42);
    }

    #[test]
    fn test_missing_env_display() {
        let error = ConfigError::MissingEnvVar {
            name: "SNOWFLAKE_TOKEN",
        };
        assert_eq!(
            error.to_string(),
            "Missing environment variable 'SNOWFLAKE_TOKEN' (set it in the environment or in .env)"
        );
        assert_eq!(error.error_code(), "CONFIG_MISSING_ENV");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_config_parse_error() {
        let error = ConfigError::ConfigParseError {
            path: "/tmp/config.toml".to_string(),
            message: "invalid TOML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse config file '/tmp/config.toml': invalid TOML syntax"
        );
        assert_eq!(error.error_code(), "CONFIG_PARSE_ERROR");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_read_error_is_not_user_error() {
        let error = ConfigError::ConfigReadError {
            path: "/etc/packdash.toml".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(error.error_code(), "CONFIG_READ_ERROR");
        assert!(!error.is_user_error());
    }
}
