//! Application configuration loaded from environment variables.

use std::env;

/// Development default values.
pub mod defaults {
    pub const DEV_HOST: &str = "127.0.0.1";
    pub const DEV_PORT: u16 = 8080;
    /// Cap on concurrently executing background tests. Matches the reference
    /// deployment's worker pool of 10.
    pub const DEV_MAX_CONCURRENT_TESTS: usize = 10;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum number of tests executing concurrently in the background
    pub max_concurrent_tests: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production, default: development)
    /// - `PERF_HOST`: Server host (default: 127.0.0.1)
    /// - `PERF_PORT`: Server port (default: 8080)
    /// - `PERF_MAX_CONCURRENT_TESTS`: Background worker cap (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("RUST_ENV") {
            Ok(env_str) => Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
                "RUST_ENV must be 'development' or 'production'",
            ))?,
            Err(_) => Environment::Development,
        };

        let host = env::var("PERF_HOST").unwrap_or_else(|_| defaults::DEV_HOST.to_string());

        let port = env::var("PERF_PORT")
            .unwrap_or_else(|_| defaults::DEV_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("PERF_PORT must be a valid port number"))?;

        let max_concurrent_tests = env::var("PERF_MAX_CONCURRENT_TESTS")
            .unwrap_or_else(|_| defaults::DEV_MAX_CONCURRENT_TESTS.to_string())
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::InvalidValue("PERF_MAX_CONCURRENT_TESTS must be a positive integer")
            })?;

        if max_concurrent_tests == 0 {
            return Err(ConfigError::InvalidValue(
                "PERF_MAX_CONCURRENT_TESTS must be at least 1",
            ));
        }

        Ok(Self {
            environment,
            host,
            port,
            max_concurrent_tests,
        })
    }

    /// Server bind address (host:port).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),
}
