//! Server configuration

use thiserror::Error;

/// Minimum accepted JWT secret length outside development
const MIN_JWT_SECRET_LEN: usize = 32;

const ENVIRONMENTS: &[&str] = &["development", "staging", "production"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in {1} environment")]
    Missing(&'static str, String),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters long")]
    WeakJwtSecret,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL; `None` selects the in-process store (development only)
    pub database_url: Option<String>,
    /// Connection pool size
    pub database_max_connections: u32,
    /// JWT signing secret
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Token lifetime (minutes)
    pub jwt_expiration_minutes: i64,
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
    /// User granted the built-in `admin` role at startup
    pub admin_user_id: Option<i64>,
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());
        if !ENVIRONMENTS.contains(&environment.as_str()) {
            return Err(ConfigError::Invalid {
                name: "ENVIRONMENT",
                value: environment,
            });
        }
        let development = environment == "development";

        let database_url = var("DATABASE_URL");
        if database_url.is_none() && !development {
            return Err(ConfigError::Missing("DATABASE_URL", environment));
        }

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => {
                if secret.len() < MIN_JWT_SECRET_LEN && !development {
                    return Err(ConfigError::WeakJwtSecret);
                }
                secret
            }
            None if development => "dev-JWT_SECRET-not-for-production-use".into(),
            None => return Err(ConfigError::Missing("JWT_SECRET", environment)),
        };

        let admin_user_id = match var("ADMIN_USER_ID") {
            Some(raw) => Some(
                shared::util::parse_id(&raw).ok_or(ConfigError::Invalid {
                    name: "ADMIN_USER_ID",
                    value: raw,
                })?,
            ),
            None => None,
        };

        Ok(Self {
            http_port: parse_or("HTTP_PORT", var("HTTP_PORT"), 8080)?,
            database_url,
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                var("DATABASE_MAX_CONNECTIONS"),
                10,
            )?,
            jwt_secret,
            jwt_issuer: var("JWT_ISSUER").unwrap_or_else(|| "finance-server".into()),
            jwt_audience: var("JWT_AUDIENCE").unwrap_or_else(|| "finance-clients".into()),
            jwt_expiration_minutes: parse_or(
                "JWT_EXPIRATION_MINUTES",
                var("JWT_EXPIRATION_MINUTES"),
                1440,
            )?,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_json: parse_or("LOG_JSON", var("LOG_JSON"), false)?,
            log_dir: var("LOG_DIR"),
            admin_user_id,
            environment,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: v }),
        None => Ok(default),
    }
}
