use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_COHORT_SIZE: usize = 50;

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cohort: CohortConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origins = parse_origins(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let size = match env::var("COHORT_SIZE") {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => return Err(ConfigError::InvalidCohortSize { value: raw }),
            },
            Err(_) => DEFAULT_COHORT_SIZE,
        };
        let seed = match env::var("COHORT_SEED") {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidCohortSeed { value: raw })?,
            ),
            _ => None,
        };

        let dataset = env::var("ANALYTICS_DATASET")
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            telemetry: TelemetryConfig { log_level },
            cohort: CohortConfig { size, seed },
            analytics: AnalyticsConfig { dataset },
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; a lone `*` allows any origin.
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Shape of the synthetic behavioral cohort.
#[derive(Debug, Clone)]
pub struct CohortConfig {
    pub size: usize,
    /// Fixed seed for a reproducible cohort; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_COHORT_SIZE,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalyticsConfig {
    pub dataset: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidCohortSize { value: String },
    InvalidCohortSeed { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidCohortSize { value } => {
                write!(f, "COHORT_SIZE must be a positive integer, got '{}'", value)
            }
            ConfigError::InvalidCohortSeed { value } => {
                write!(f, "COHORT_SEED must be a valid u64, got '{}'", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidCohortSize { .. }
            | ConfigError::InvalidCohortSeed { .. } => None,
        }
    }
}

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
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_CORS_ORIGINS",
            "COHORT_SIZE",
            "COHORT_SEED",
            "ANALYTICS_DATASET",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.server.allows_any_origin());
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.cohort.size, 50);
        assert_eq!(config.cohort.seed, None);
        assert!(config.analytics.dataset.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn reads_cohort_and_dataset_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COHORT_SIZE", "120");
        env::set_var("COHORT_SEED", "42");
        env::set_var("ANALYTICS_DATASET", "data/stress.csv");
        env::set_var("APP_CORS_ORIGINS", "http://localhost:5173, https://dash.example.edu");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.cohort.size, 120);
        assert_eq!(config.cohort.seed, Some(42));
        assert_eq!(
            config.analytics.dataset,
            Some(PathBuf::from("data/stress.csv"))
        );
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:5173", "https://dash.example.edu"]
        );
        assert!(!config.server.allows_any_origin());
    }

    #[test]
    fn rejects_empty_cohort() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COHORT_SIZE", "0");
        let err = AppConfig::load().expect_err("zero students is invalid");
        reset_env();
        assert!(matches!(err, ConfigError::InvalidCohortSize { .. }));
    }

    #[test]
    fn rejects_non_numeric_seed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("COHORT_SEED", "lucky");
        let err = AppConfig::load().expect_err("seed must be numeric");
        reset_env();
        assert!(matches!(err, ConfigError::InvalidCohortSeed { .. }));
    }
}
