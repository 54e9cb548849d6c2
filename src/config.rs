use crate::catalog::{Catalog, CatalogError};
use crate::scorer::{Aggregation, UnknownAggregation};
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let raw_port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let port = raw_port
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort { value: raw_port })?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let aggregation = match env::var("APP_AGGREGATION") {
            Ok(value) => value.parse()?,
            Err(_) => Aggregation::default(),
        };
        let catalog_path = env::var("APP_CATALOG_PATH")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let allowed_origins = env::var("APP_ALLOWED_ORIGINS")
            .map(|value| parse_origins(&value))
            .unwrap_or_else(|_| vec![DEFAULT_ALLOWED_ORIGIN.to_string()]);

        Ok(Self {
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                aggregation,
                catalog_path,
            },
            cors: CorsConfig { allowed_origins },
        })
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// HTTPサーバの待ち受け設定
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// 集計方式と設問マスタの差し替え
#[derive(Debug, Clone, Default)]
pub struct ScoringConfig {
    pub aggregation: Aggregation,
    pub catalog_path: Option<PathBuf>,
}

impl ScoringConfig {
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::from_path(path),
            None => Catalog::builtin(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{value}'")]
    InvalidPort { value: String },
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("APP_AGGREGATION is invalid: {0}")]
    InvalidAggregation(#[from] UnknownAggregation),
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
            "APP_HOST",
            "PORT",
            "APP_LOG_LEVEL",
            "APP_AGGREGATION",
            "APP_CATALOG_PATH",
            "APP_ALLOWED_ORIGINS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.scoring.aggregation, Aggregation::Mean);
        assert!(config.scoring.catalog_path.is_none());
        assert_eq!(config.cors.allowed_origins, vec![DEFAULT_ALLOWED_ORIGIN]);
    }

    #[test]
    fn reads_port_and_aggregation() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PORT", "9090");
        env::set_var("APP_AGGREGATION", "weighted");
        env::set_var(
            "APP_ALLOWED_ORIGINS",
            "http://localhost:3000, https://example.org ,",
        );
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scoring.aggregation, Aggregation::Weighted);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:3000", "https://example.org"]
        );
        reset_env();
    }

    #[test]
    fn rejects_bad_port_and_aggregation() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("PORT", "eighty");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPort { .. })
        ));
        reset_env();
        env::set_var("APP_AGGREGATION", "median");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidAggregation(_))
        ));
        reset_env();
    }

    #[test]
    fn accepts_localhost_host() {
        let server = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
        };
        let addr = server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
    }

    #[test]
    fn default_scoring_uses_builtin_catalog() {
        let catalog = ScoringConfig::default()
            .load_catalog()
            .expect("builtin catalog");
        assert_eq!(catalog.max_valid_id(), 51);
    }
}
