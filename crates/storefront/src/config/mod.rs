use std::env;
use std::fmt;

use crate::catalog::SyntheticCatalog;
use crate::xray::InMemoryTraceSink;

/// Distinguishes runtime behavior for different stages of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the storefront demo.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub catalog: CatalogConfig,
    pub xray: XRayConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let size = parse_positive("CATALOG_SIZE", SyntheticCatalog::DEFAULT_SIZE)?;
        let seed = match env::var("CATALOG_SEED") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidCatalogSeed)?,
            Err(_) => CatalogConfig::DEFAULT_SEED,
        };
        let max_events = parse_positive("XRAY_MAX_EVENTS", InMemoryTraceSink::DEFAULT_CAPACITY)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            catalog: CatalogConfig { size, seed },
            xray: XRayConfig { max_events },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
        })
    }
}

fn parse_positive(key: &'static str, default: usize) -> Result<usize, ConfigError> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotPositive { key, value: raw }),
    }
}

/// Synthetic catalog dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    pub size: usize,
    pub seed: u64,
}

impl CatalogConfig {
    pub const DEFAULT_SEED: u64 = 42;
}

/// Retention limit for the X-Ray event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XRayConfig {
    pub max_events: usize,
}

/// Process log controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    NotPositive { key: &'static str, value: String },
    InvalidCatalogSeed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { key, value } => {
                write!(f, "{key} must be a positive integer (got '{value}')")
            }
            ConfigError::InvalidCatalogSeed => write!(f, "CATALOG_SEED must be a valid u64"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("CATALOG_SIZE");
        env::remove_var("CATALOG_SEED");
        env::remove_var("XRAY_MAX_EVENTS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.catalog.size, 200);
        assert_eq!(config.catalog.seed, 42);
        assert_eq!(config.xray.max_events, 1000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.telemetry.ansi);
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("CATALOG_SIZE", "2000");
        env::set_var("CATALOG_SEED", "7");
        env::set_var("XRAY_MAX_EVENTS", "250");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.catalog, CatalogConfig { size: 2000, seed: 7 });
        assert_eq!(config.xray.max_events, 250);
        assert!(!config.telemetry.ansi);
    }

    #[test]
    fn rejects_zero_event_capacity() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("XRAY_MAX_EVENTS", "0");
        let err = AppConfig::load().expect_err("zero capacity rejected");
        reset_env();

        assert!(matches!(
            err,
            ConfigError::NotPositive {
                key: "XRAY_MAX_EVENTS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_numeric_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CATALOG_SEED", "lucky");
        let err = AppConfig::load().expect_err("seed rejected");
        reset_env();

        assert!(matches!(err, ConfigError::InvalidCatalogSeed));
    }
}
