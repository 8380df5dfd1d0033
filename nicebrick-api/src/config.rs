//! API Configuration Module
//!
//! Configuration is loaded once at startup from environment variables with
//! development-friendly defaults, then validated before the router is built.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use nicebrick_core::{ConfigError, ContentCatalog};
use nicebrick_storage::DbConfig;

/// Default public URL used in metadata links.
pub const DEFAULT_APP_URL: &str = "https://bearbrick.vercel.app";

/// Default artifact cache TTL: one hour.
pub const DEFAULT_ARTIFACT_CACHE_TTL_SECS: u64 = 3600;

// ============================================================================
// ENUMS
// ============================================================================

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "" | "dev" | "development" | "local" | "test" => Ok(Self::Development),
            "prod" | "production" => Ok(Self::Production),
            other => Err(invalid("NICEBRICK_ENVIRONMENT", other, "expected development or production")),
        }
    }
}

/// Which key-value store backs the vote ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Process-local map. Development and tests only.
    #[default]
    Memory,
    Postgres,
    /// No store; reads degrade, writes fail.
    Disabled,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(Self::Memory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "disabled" | "none" | "off" => Ok(Self::Disabled),
            other => Err(invalid("NICEBRICK_STORE", other, "expected memory, postgres or disabled")),
        }
    }
}

/// Which artifact renderer is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Svg,
    None,
}

impl RendererKind {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "none" | "disabled" | "off" => Ok(Self::None),
            other => Err(invalid("NICEBRICK_RENDERER", other, "expected svg or none")),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(invalid("NICEBRICK_LOG_FORMAT", other, "expected json or pretty")),
        }
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

/// Store selection plus PostgreSQL settings.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub db: DbConfig,
}

/// Logging and metrics settings.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_format: LogFormat,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "nicebrick-api".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: true,
        }
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Top-level server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub environment: Environment,
    /// Public base URL of the app, used in metadata links.
    pub app_url: String,

    /// Allowed CORS origins. Empty means allow all (dev mode).
    pub cors_origins: Vec<String>,
    pub cors_max_age_secs: u64,

    pub artifact_cache_ttl: Duration,
    /// Newline-delimited content list. `None` uses the built-in wishes.
    pub content_file: Option<PathBuf>,
    pub renderer: RendererKind,

    pub store: StoreConfig,
    pub telemetry: TelemetryConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            environment: Environment::Development,
            app_url: DEFAULT_APP_URL.to_string(),
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
            artifact_cache_ttl: Duration::from_secs(DEFAULT_ARTIFACT_CACHE_TTL_SECS),
            content_file: None,
            renderer: RendererKind::Svg,
            store: StoreConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment.
    ///
    /// Environment variables:
    /// - `NICEBRICK_API_BIND`: bind host (default `0.0.0.0`)
    /// - `PORT` / `NICEBRICK_API_PORT`: bind port (default 3000)
    /// - `NICEBRICK_ENVIRONMENT`: `development` or `production`
    /// - `NICEBRICK_APP_URL`: public base URL
    /// - `NICEBRICK_CORS_ORIGINS`: comma-separated allowed origins
    /// - `NICEBRICK_CORS_MAX_AGE_SECS`: preflight cache duration
    /// - `NICEBRICK_ARTIFACT_CACHE_TTL_SECS`: artifact cache TTL (default 3600)
    /// - `NICEBRICK_CONTENT_FILE`: path to a newline-delimited content list
    /// - `NICEBRICK_RENDERER`: `svg` or `none`
    /// - `NICEBRICK_STORE`: `memory`, `postgres` or `disabled`
    /// - `NICEBRICK_DB_*`: PostgreSQL settings
    /// - `NICEBRICK_LOG_FORMAT`: `json` or `pretty`
    /// - `NICEBRICK_SERVICE_NAME`, `NICEBRICK_METRICS_ENABLED`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if config.store.backend == StoreBackend::Postgres {
            config.store.db = DbConfig::from_env();
        }
        Ok(config)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables take defaults; set but malformed variables are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("NICEBRICK_API_BIND").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT").or_else(|| var("NICEBRICK_API_PORT")) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| invalid("NICEBRICK_API_PORT", &raw, "expected a port number"))?,
            None => defaults.bind_addr.port(),
        };
        // Accepts bare IPv6 hosts such as `::` as well as `[::]`.
        let ip = host
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .map_err(|e| invalid("NICEBRICK_API_BIND", &host, &e.to_string()))?;
        let bind_addr = SocketAddr::new(ip, port);

        let environment = var("NICEBRICK_ENVIRONMENT")
            .map(|v| Environment::parse(&v))
            .transpose()?
            .unwrap_or_default();

        let app_url = var("NICEBRICK_APP_URL")
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.app_url);

        let cors_origins = var("NICEBRICK_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = parse_u64(&var, "NICEBRICK_CORS_MAX_AGE_SECS")?
            .unwrap_or(defaults.cors_max_age_secs);

        let artifact_cache_ttl = parse_u64(&var, "NICEBRICK_ARTIFACT_CACHE_TTL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.artifact_cache_ttl);

        let content_file = var("NICEBRICK_CONTENT_FILE").map(PathBuf::from);

        let renderer = var("NICEBRICK_RENDERER")
            .map(|v| RendererKind::parse(&v))
            .transpose()?
            .unwrap_or_default();

        let backend = var("NICEBRICK_STORE")
            .map(|v| StoreBackend::parse(&v))
            .transpose()?
            .unwrap_or_default();

        let telemetry = TelemetryConfig {
            service_name: var("NICEBRICK_SERVICE_NAME")
                .unwrap_or(defaults.telemetry.service_name),
            log_format: var("NICEBRICK_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .transpose()?
                .unwrap_or_default(),
            metrics_enabled: var("NICEBRICK_METRICS_ENABLED")
                .map(|v| v.trim().to_lowercase() != "false")
                .unwrap_or(true),
        };

        Ok(Self {
            bind_addr,
            environment,
            app_url,
            cors_origins,
            cors_max_age_secs,
            artifact_cache_ttl,
            content_file,
            renderer,
            store: StoreConfig {
                backend,
                db: DbConfig::default(),
            },
            telemetry,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Reject configurations that are unsafe to run in production.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_production() {
            return Ok(());
        }
        if self.store.backend == StoreBackend::Memory {
            return Err(invalid(
                "NICEBRICK_STORE",
                "memory",
                "the in-memory store is not allowed in production",
            ));
        }
        if self.cors_origins.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "NICEBRICK_CORS_ORIGINS".to_string(),
            });
        }
        Ok(())
    }

    /// Load the content catalog, from `content_file` when set.
    pub fn load_catalog(&self) -> Result<ContentCatalog, ConfigError> {
        match &self.content_file {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    invalid("NICEBRICK_CONTENT_FILE", &path.display().to_string(), &e.to_string())
                })?;
                ContentCatalog::from_lines(&text)
            }
            None => Ok(ContentCatalog::builtin()),
        }
    }

    /// Check if a given origin is allowed.
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if self.cors_origins.is_empty() {
            return true;
        }

        self.cors_origins.iter().any(|allowed| {
            if allowed == origin {
                return true;
            }
            // Wildcard subdomains: *.example.com
            if let Some(pattern) = allowed.strip_prefix("*.") {
                if let Some(origin_domain) = origin.strip_prefix("https://") {
                    return origin_domain.ends_with(&format!(".{}", pattern));
                }
            }
            false
        })
    }
}

fn parse_u64<F>(var: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| invalid(key, &raw, "expected a non-negative integer"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() -> Result<(), ConfigError> {
        let config = load(&[])?;
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.app_url, DEFAULT_APP_URL);
        assert_eq!(config.artifact_cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.renderer, RendererKind::Svg);
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_overrides() -> Result<(), ConfigError> {
        let config = load(&[
            ("PORT", "8080"),
            ("NICEBRICK_APP_URL", "https://nice.example/"),
            ("NICEBRICK_ARTIFACT_CACHE_TTL_SECS", "60"),
            ("NICEBRICK_STORE", "disabled"),
            ("NICEBRICK_RENDERER", "none"),
            ("NICEBRICK_LOG_FORMAT", "pretty"),
            ("NICEBRICK_CORS_ORIGINS", "https://a.example, https://b.example"),
        ])?;
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.app_url, "https://nice.example");
        assert_eq!(config.artifact_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.store.backend, StoreBackend::Disabled);
        assert_eq!(config.renderer, RendererKind::None);
        assert_eq!(config.telemetry.log_format, LogFormat::Pretty);
        assert_eq!(config.cors_origins.len(), 2);
        Ok(())
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert!(load(&[("NICEBRICK_STORE", "redis")]).is_err());
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("NICEBRICK_ARTIFACT_CACHE_TTL_SECS", "-1")]).is_err());
        assert!(load(&[("NICEBRICK_ENVIRONMENT", "staging")]).is_err());
        assert!(load(&[("NICEBRICK_API_BIND", "localhost")]).is_err());
    }

    #[test]
    fn test_ipv6_bind_host() -> Result<(), ConfigError> {
        let config = load(&[("NICEBRICK_API_BIND", "::"), ("PORT", "3000")])?;
        assert!(config.bind_addr.is_ipv6());
        assert_eq!(config.bind_addr.to_string(), "[::]:3000");

        let config = load(&[("NICEBRICK_API_BIND", "[::1]")])?;
        assert!(config.bind_addr.ip().is_loopback());

        let config = load(&[("NICEBRICK_API_BIND", "127.0.0.1"), ("PORT", "8080")])?;
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        Ok(())
    }

    #[test]
    fn test_production_refuses_memory_store() -> Result<(), ConfigError> {
        let config = load(&[
            ("NICEBRICK_ENVIRONMENT", "production"),
            ("NICEBRICK_CORS_ORIGINS", "https://nice.example"),
        ])?;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "NICEBRICK_STORE"
        ));
        Ok(())
    }

    #[test]
    fn test_production_requires_cors_origins() -> Result<(), ConfigError> {
        let config = load(&[
            ("NICEBRICK_ENVIRONMENT", "prod"),
            ("NICEBRICK_STORE", "postgres"),
        ])?;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingRequired { .. })
        ));

        let config = load(&[
            ("NICEBRICK_ENVIRONMENT", "prod"),
            ("NICEBRICK_STORE", "postgres"),
            ("NICEBRICK_CORS_ORIGINS", "https://nice.example"),
        ])?;
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_builtin_catalog_loaded_by_default() -> Result<(), ConfigError> {
        assert_eq!(ApiConfig::default().load_catalog()?.len(), 25);
        Ok(())
    }

    #[test]
    fn test_missing_content_file_is_error() {
        let config = ApiConfig {
            content_file: Some(PathBuf::from("/nonexistent/nicebrick/wishes.txt")),
            ..ApiConfig::default()
        };
        assert!(config.load_catalog().is_err());
    }

    #[test]
    fn test_origin_allowed() {
        let mut config = ApiConfig::default();
        assert!(config.is_origin_allowed("https://anything.com"));

        config.cors_origins = vec![
            "https://nice.example".to_string(),
            "*.warpcast.com".to_string(),
        ];
        assert!(config.is_origin_allowed("https://nice.example"));
        assert!(config.is_origin_allowed("https://client.warpcast.com"));
        assert!(!config.is_origin_allowed("https://evilwarpcast.com"));
        assert!(!config.is_origin_allowed("https://evil.com"));
    }
}
