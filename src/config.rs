use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use thiserror::Error;
use tracing::{error, info, Level};
use validator::{Validate, ValidationError, ValidationErrors};

const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const DEV_JWT_SECRET: &str =
    "plastics-quote-api-development-signing-key-do-not-use-outside-local-machines-0123456789";

/// Keys missing from every source take their value from [`Default`].
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// `sqlite://...` or `postgres://...`
    pub database_url: String,

    #[validate(length(min = 64), custom = "distinct_enough")]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[validate(range(min = 300, max = 86400))]
    pub jwt_expiration: usize,

    pub host: String,
    pub port: u16,
    pub environment: String,

    #[validate(custom = "known_log_level")]
    pub log_level: String,
    pub log_json: bool,
    pub auto_migrate: bool,

    /// Comma separated
    pub cors_allowed_origins: Option<String>,
    pub cors_allow_any_origin: bool,
    pub cors_allow_credentials: bool,

    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,

    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,

    pub auth_issuer: String,
    pub auth_audience: String,
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// How the HTTP layer should answer cross-origin requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    Origins(Vec<String>),
    Permissive,
}

fn known_log_level(level: &str) -> Result<(), ValidationError> {
    level
        .parse::<Level>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("log_level"))
}

fn distinct_enough(secret: &str) -> Result<(), ValidationError> {
    let distinct: HashSet<char> = secret.trim().chars().collect();
    if distinct.len() < 10 {
        let mut err = ValidationError::new("jwt_secret");
        err.message = Some("JWT secret needs at least 10 distinct characters".into());
        return Err(err);
    }
    Ok(())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(
            "sqlite://plastics.db?mode=rwc".into(),
            String::new(),
            3600,
            "0.0.0.0".into(),
            8080,
            DEFAULT_ENV.into(),
        )
    }
}

impl AppConfig {
    pub fn new(
        database_url: String,
        jwt_secret: String,
        jwt_expiration: usize,
        host: String,
        port: u16,
        environment: String,
    ) -> Self {
        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            host,
            port,
            environment,
            log_level: "info".into(),
            log_json: false,
            auto_migrate: false,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            cors_allow_credentials: false,
            db_max_connections: 10,
            db_min_connections: 1,
            db_connect_timeout_secs: 10,
            db_idle_timeout_secs: 300,
            db_acquire_timeout_secs: 10,
            request_timeout_secs: 30,
            auth_issuer: "plastics-quote-api".into(),
            auth_audience: "plastics-quote-clients".into(),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case(DEFAULT_ENV)
    }

    /// Explicit origins win; otherwise development and the opt-in flag fall
    /// back to permissive. `None` means the deployment is misconfigured.
    pub fn cors_policy(&self) -> Option<CorsPolicy> {
        let origins: Vec<String> = self
            .cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        if !origins.is_empty() {
            Some(CorsPolicy::Origins(origins))
        } else if self.is_development() || self.cors_allow_any_origin {
            Some(CorsPolicy::Permissive)
        } else {
            None
        }
    }

    /// Rules that span several fields.
    fn check_deployment(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut reject = |field: &'static str, message: &'static str| {
            let mut err = ValidationError::new(field);
            err.message = Some(message.into());
            errors.add(field, err);
        };

        if self.cors_policy().is_none() {
            reject(
                "cors_allowed_origins",
                "Set APP__CORS_ALLOWED_ORIGINS or opt in with APP__CORS_ALLOW_ANY_ORIGIN=true",
            );
        }
        if self.environment.eq_ignore_ascii_case("production") && self.cors_allow_any_origin {
            reject("cors_allow_any_origin", "Permissive CORS is not allowed in production");
        }
        if !self.is_development() && self.jwt_secret.trim() == DEV_JWT_SECRET {
            reject("jwt_secret", "The development JWT secret is only valid in development");
        }
        if self.db_min_connections > self.db_max_connections {
            reject(
                "db_min_connections",
                "db_min_connections cannot exceed db_max_connections",
            );
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plastics_quote_api={level},tower_http=info")));
    if json {
        let _ = fmt().with_env_filter(filter).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter).try_init();
    }
}

/// Defaults, then `config/default.*`, then `config/{env}.*`, then `APP__*`
/// variables.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!(environment = %run_env, "Loading configuration");

    let mut builder = Config::builder().set_default("environment", run_env.as_str())?;

    // Outside development the secret has to come from a file or APP__JWT_SECRET.
    if run_env.eq_ignore_ascii_case(DEFAULT_ENV) {
        builder = builder.set_default("jwt_secret", DEV_JWT_SECRET)?;
    }

    let app_config: AppConfig = builder
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?
        .try_deserialize()?;

    if let Err(e) = app_config
        .validate()
        .and_then(|()| app_config.check_deployment())
    {
        error!("Configuration rejected: {}", e);
        return Err(e.into());
    }

    info!("Configuration loaded");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str =
        "q8Vt2LmZ9xRw4KpN7sJd1HfGc6YbEu3TaXo0WiQe5ZrUy8MnBv2CkLj4HgFd7SsPp";

    fn production() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            STRONG_SECRET.into(),
            3600,
            "127.0.0.1".into(),
            8080,
            "production".into(),
        )
    }

    #[test]
    fn production_with_origins_validates() {
        let mut cfg = production();
        cfg.cors_allowed_origins = Some("https://shop.example.com".into());
        assert!(cfg.validate().is_ok());
        assert!(cfg.check_deployment().is_ok());
    }

    #[test]
    fn cors_policy_resolution() {
        let mut cfg = production();
        assert_eq!(cfg.cors_policy(), None);
        assert!(cfg.check_deployment().is_err());

        cfg.cors_allow_any_origin = true;
        assert_eq!(cfg.cors_policy(), Some(CorsPolicy::Permissive));
        // allowed in staging, not in production
        assert!(cfg.check_deployment().is_err());
        cfg.environment = "staging".into();
        assert!(cfg.check_deployment().is_ok());

        cfg.cors_allowed_origins = Some(" https://a.example.com , ,https://b.example.com".into());
        assert_eq!(
            cfg.cors_policy(),
            Some(CorsPolicy::Origins(vec![
                "https://a.example.com".into(),
                "https://b.example.com".into()
            ]))
        );
    }

    #[test]
    fn development_defaults_to_permissive() {
        let mut cfg = production();
        cfg.environment = "development".into();
        assert_eq!(cfg.cors_policy(), Some(CorsPolicy::Permissive));
    }

    #[test]
    fn dev_secret_rejected_outside_development() {
        let mut cfg = production();
        cfg.cors_allowed_origins = Some("https://shop.example.com".into());
        cfg.jwt_secret = DEV_JWT_SECRET.into();
        assert!(cfg.check_deployment().is_err());
        cfg.environment = "development".into();
        assert!(cfg.check_deployment().is_ok());
    }

    #[test]
    fn field_rules() {
        let mut cfg = production();
        cfg.jwt_secret = "a".repeat(80);
        assert!(cfg.validate().is_err());

        let mut cfg = production();
        cfg.log_level = "loud".into();
        assert!(cfg.validate().is_err());

        let mut cfg = production();
        cfg.db_min_connections = 20;
        cfg.cors_allow_any_origin = false;
        cfg.cors_allowed_origins = Some("https://shop.example.com".into());
        assert!(cfg.check_deployment().is_err());
    }
}
