use chrono::FixedOffset;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// Offset of the reporting zone from UTC. Decides which day and month a sale falls in.
    #[serde(default)]
    #[validate(range(min = -720, max = 840))]
    pub reporting_utc_offset_minutes: i32,

    /// Products at or below this many units count as low stock
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: u32,

    /// Best sellers shown on the analytics page
    #[serde(default = "default_top_products_limit")]
    #[validate(range(min = 1, max = 50))]
    pub top_products_limit: u32,

    /// Months in the revenue trend, current month included
    #[serde(default = "default_trend_months")]
    #[validate(range(min = 1, max = 24))]
    pub trend_months: u32,

    #[serde(default = "default_recent_sales_limit")]
    pub recent_sales_limit: u32,

    #[serde(default = "default_recent_inventory_logs_limit")]
    pub recent_inventory_logs_limit: u32,

    #[serde(default = "default_low_stock_preview_limit")]
    pub low_stock_preview_limit: u32,

    #[serde(default = "default_featured_products_limit")]
    pub featured_products_limit: u32,

    /// ISO currency code used in money labels
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3))]
    pub currency: String,
}

impl AppConfig {
    /// Creates a configuration with defaults for everything but the basics
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            reporting_utc_offset_minutes: 0,
            low_stock_threshold: default_low_stock_threshold(),
            top_products_limit: default_top_products_limit(),
            trend_months: default_trend_months(),
            recent_sales_limit: default_recent_sales_limit(),
            recent_inventory_logs_limit: default_recent_inventory_logs_limit(),
            low_stock_preview_limit: default_low_stock_preview_limit(),
            featured_products_limit: default_featured_products_limit(),
            currency: default_currency(),
        }
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    pub fn has_cors_allowed_origins(&self) -> bool {
        self.cors_allowed_origins
            .as_ref()
            .map(|raw| raw.split(',').any(|origin| !origin.trim().is_empty()))
            .unwrap_or(false)
    }

    pub fn should_allow_permissive_cors(&self) -> bool {
        self.is_development() || self.cors_allow_any_origin
    }

    /// Reporting zone used for "today" and calendar-month windows.
    pub fn reporting_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.reporting_utc_offset_minutes * 60)
            .unwrap_or_else(crate::analytics::calendar::utc_offset)
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.should_allow_permissive_cors() && !self.has_cors_allowed_origins() {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "Set APP__CORS_ALLOWED_ORIGINS for non-development environments or explicitly opt-in via APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_pool_bounds");
            err.message = Some("db_min_connections must not exceed db_max_connections".into());
            errors.add("db_min_connections", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_max_connections() -> u32 {
    16
}
fn default_db_min_connections() -> u32 {
    2
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

fn default_low_stock_threshold() -> u32 {
    5
}

fn default_top_products_limit() -> u32 {
    5
}

fn default_trend_months() -> u32 {
    6
}

fn default_recent_sales_limit() -> u32 {
    5
}

fn default_low_stock_preview_limit() -> u32 {
    5
}

fn default_recent_inventory_logs_limit() -> u32 {
    10
}

fn default_featured_products_limit() -> u32 {
    8
}

fn default_currency() -> String {
    "USD".to_string()
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("jewelry_store_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);
    let filter = EnvFilter::new(filter_directive);

    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Layers built-in defaults, `<dir>/default`, `<dir>/<run_env>` and `APP__*` variables.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    info!("Loading configuration for environment: {}", run_env);

    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://jewelry_store.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT)?
        .set_default("environment", run_env)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn base_config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "production".into(),
        )
    }

    fn write_config(content: &str, name: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(name), content).unwrap();
        dir
    }

    #[test]
    fn non_dev_requires_cors_origins() {
        let cfg = base_config();
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn non_dev_allows_override_flag() {
        let mut cfg = base_config();
        cfg.cors_allow_any_origin = true;
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn non_dev_with_origins_passes() {
        let mut cfg = base_config();
        cfg.cors_allowed_origins = Some("https://shop.example.com".into());
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn pool_bounds_are_checked() {
        let mut cfg = base_config();
        cfg.environment = "development".into();
        cfg.db_min_connections = 20;
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn reporting_offset_range_is_validated() {
        let mut cfg = base_config();
        cfg.reporting_utc_offset_minutes = 900;
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("reporting_utc_offset_minutes"));

        cfg.reporting_utc_offset_minutes = -300;
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.reporting_offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    fn trend_months_must_be_positive() {
        let mut cfg = base_config();
        cfg.trend_months = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn files_layer_over_defaults() {
        let dir = write_config(
            r#"
            database_url = "sqlite::memory:"
            low_stock_threshold = 3
            trend_months = 12
            "#,
            "default.toml",
        );
        fs::write(dir.path().join("staging.toml"), "port = 9090\ncors_allow_any_origin = true\n")
            .unwrap();

        let cfg = load_config_from(dir.path(), "staging").unwrap();
        assert_eq!(cfg.environment, "staging");
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.low_stock_threshold, 3);
        assert_eq!(cfg.trend_months, 12);
        assert_eq!(cfg.featured_products_limit, 8);
        assert_eq!(cfg.currency, "USD");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = write_config("jwt_secret = \"nope\"\n", "default.toml");
        assert!(matches!(
            load_config_from(dir.path(), "development"),
            Err(AppConfigError::Load(_))
        ));
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let dir = write_config("log_level = \"loud\"\n", "default.toml");
        assert!(matches!(
            load_config_from(dir.path(), "development"),
            Err(AppConfigError::Validation(_))
        ));
    }
}
