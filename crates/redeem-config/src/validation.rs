//! Configuration validation module.
//!
//! Checks every section on load so that a bad value fails startup rather
//! than the first request that touches it.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u32, maximum: u32 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Sampling ratio must be between 0.0 and 1.0.
    InvalidSamplingRatio { value: f64 },
    /// Timeout or TTL value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Two listeners are configured on the same port.
    PortConflict { first: String, second: String, value: u16 },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::InvalidSamplingRatio { value } => {
                write!(
                    f,
                    "Invalid sampling ratio: {} (must be between 0.0 and 1.0)",
                    value
                )
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::PortConflict { first, second, value } => {
                write!(f, "{} and {} both use port {}", first, second, value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    fn require_positive(&mut self, name: &str, value: u64) {
        if value == 0 {
            self.add_error(ConfigValidationError::NonPositiveTimeout {
                name: name.to_string(),
                value,
            });
        }
    }

    fn require_url(&mut self, url_type: &str, value: &str, schemes: &[&str]) {
        match Url::parse(value) {
            Ok(url) if schemes.contains(&url.scheme()) => {}
            Ok(url) => self.add_error(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: format!(
                    "unsupported scheme '{}' (expected one of: {})",
                    url.scheme(),
                    schemes.join(", ")
                ),
            }),
            Err(e) => self.add_error(ConfigValidationError::InvalidUrl {
                url_type: url_type.to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the validation errors.
    pub fn errors(&self) -> &[ConfigValidationError] {
        &self.errors
    }

    /// Converts to Result, returning Err with all errors if any exist.
    pub fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u32 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::default();

        Self::validate_server(&config.server, &mut result);
        Self::validate_database(&config.database, &mut result);
        Self::validate_redis(&config.redis, &mut result);
        Self::validate_wallet(&config.wallet, &mut result);
        Self::validate_redemption(&config.redemption, &mut result);
        Self::validate_observability(&config.observability, &mut result);

        if config.observability.metrics_enabled
            && config.observability.metrics_port == config.server.port
        {
            result.add_error(ConfigValidationError::PortConflict {
                first: "server.port".to_string(),
                second: "observability.metrics_port".to_string(),
                value: config.server.port,
            });
        }

        result.into_result()
    }

    fn validate_server(config: &crate::ServerConfig, result: &mut ValidationResult) {
        // 0 is invalid for binding
        if config.port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "server.port".to_string(),
                value: config.port,
            });
        }
        result.require_positive("server.request_timeout_secs", config.request_timeout_secs);
    }

    fn validate_database(config: &crate::DatabaseConfig, result: &mut ValidationResult) {
        result.require_url("database", &config.url, &["postgres", "postgresql"]);

        if config.min_connections > config.max_connections {
            result.add_error(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if config.max_connections > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.max_connections,
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        result.require_positive("database.connect_timeout_secs", config.connect_timeout_secs);
        result.require_positive("database.idle_timeout_secs", config.idle_timeout_secs);
    }

    fn validate_redis(config: &crate::RedisConfig, result: &mut ValidationResult) {
        if !config.enabled {
            return;
        }

        result.require_url("redis", &config.url, &["redis", "rediss"]);

        if config.pool_size > Self::MAX_POOL_SIZE {
            result.add_error(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_wallet(config: &crate::WalletConfig, result: &mut ValidationResult) {
        result.require_url("wallet", &config.endpoint, &["http", "https"]);
        result.require_positive("wallet.connect_timeout_secs", config.connect_timeout_secs);
        result.require_positive("wallet.request_timeout_ms", config.request_timeout_ms);
    }

    fn validate_redemption(config: &crate::RedemptionConfig, result: &mut ValidationResult) {
        result.require_positive("redemption.guard_ttl_secs", config.guard_ttl_secs);
        result.require_positive("redemption.report_cache_ttl_secs", config.report_cache_ttl_secs);
        result.require_positive("redemption.attempt_timeout_ms", config.attempt_timeout_ms);
        result.require_positive("redemption.release_timeout_ms", config.release_timeout_ms);
    }

    fn validate_observability(config: &crate::ObservabilityConfig, result: &mut ValidationResult) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        if !(0.0..=1.0).contains(&config.sampling_ratio) {
            result.add_error(ConfigValidationError::InvalidSamplingRatio {
                value: config.sampling_ratio,
            });
        }

        if let Some(ref endpoint) = config.otlp_endpoint {
            result.require_url("otlp_endpoint", endpoint, &["http", "https"]);
        }

        if config.metrics_enabled && config.metrics_port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "observability.metrics_port".to_string(),
                value: config.metrics_port,
            });
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("Configuration validation failed:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
