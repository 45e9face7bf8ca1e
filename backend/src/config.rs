//! Startup configuration resolved once from the process environment.
//!
//! [`env_status`] reports which required variables are missing.
//! [`AppConfig::from_env`] applies the `DATABASE_URL_LOCAL` fallback and
//! produces an immutable configuration that is shared by reference; the
//! process environment itself is never written.
//!
//! Non-secret server settings (bind address, pool size) are layered through
//! [`ServerSettings`] with `ortho_config`.

use std::fmt;
use std::net::SocketAddr;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::inbound::http::session_config::{
    BuildMode, SessionConfigError, SessionSettings, session_settings_from_env,
};

/// Canonical database connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
/// Local override consulted when `DATABASE_URL` is absent.
pub const DATABASE_URL_LOCAL_ENV: &str = "DATABASE_URL_LOCAL";
/// Secret used to derive the session cookie key.
pub const SESSION_SECRET_ENV: &str = "SESSION_SECRET";
/// Public base URL of the web application.
pub const APP_BASE_URL_ENV: &str = "APP_BASE_URL";
/// Billing provider API key; billing is disabled without it.
pub const STRIPE_SECRET_KEY_ENV: &str = "STRIPE_SECRET_KEY";
/// Subscription price offered at checkout.
pub const STRIPE_PRICE_ID_ENV: &str = "STRIPE_PRICE_ID";
/// Override for the billing provider's API origin.
pub const STRIPE_API_BASE_ENV: &str = "STRIPE_API_BASE";

const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Required variables in reporting order.
pub const REQUIRED_ENV: [&str; 3] = [DATABASE_URL_ENV, SESSION_SECRET_ENV, APP_BASE_URL_ENV];

/// Outcome of checking the required environment variables.
///
/// # Examples
/// ```
/// use backend::config::env_status;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "DATABASE_URL_LOCAL" => Some("postgres://localhost/tabsplit".to_owned()),
///     "SESSION_SECRET" => Some("secret".to_owned()),
///     _ => None,
/// });
///
/// let status = env_status(&env);
/// assert!(!status.ok);
/// assert_eq!(status.missing, vec!["APP_BASE_URL"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvStatus {
    /// `true` when nothing is missing.
    pub ok: bool,
    /// Names of missing variables, in [`REQUIRED_ENV`] order.
    pub missing: Vec<&'static str>,
}

/// Check required variables. Blank values count as missing.
pub fn env_status<E: Env>(env: &E) -> EnvStatus {
    let missing: Vec<&'static str> = REQUIRED_ENV
        .into_iter()
        .filter(|name| match *name {
            DATABASE_URL_ENV => resolve_database_url(env).is_none(),
            other => non_blank(env, other).is_none(),
        })
        .collect();
    EnvStatus {
        ok: missing.is_empty(),
        missing,
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name).filter(|value| !value.trim().is_empty())
}

fn resolve_database_url<E: Env>(env: &E) -> Option<String> {
    non_blank(env, DATABASE_URL_ENV).or_else(|| non_blank(env, DATABASE_URL_LOCAL_ENV))
}

/// Errors raised while resolving startup configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// One or more required variables are absent.
    #[error("missing required environment variables: {}", .names.join(", "))]
    Missing { names: Vec<&'static str> },
    /// A URL-valued variable does not parse as an absolute URL.
    #[error("invalid URL in {name}='{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// Session cookie settings are invalid.
    #[error(transparent)]
    Session(#[from] SessionConfigError),
}

/// Billing provider credentials.
#[derive(Clone)]
pub struct StripeSettings {
    /// Secret API key sent as a bearer token.
    pub secret_key: String,
    /// Recurring price used for subscription checkout.
    pub price_id: String,
    /// API origin, normally `https://api.stripe.com`.
    pub api_base: Url,
}

impl fmt::Debug for StripeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeSettings")
            .field("secret_key", &"<redacted>")
            .field("price_id", &self.price_id)
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

/// Immutable configuration resolved once at startup.
#[derive(Clone)]
pub struct AppConfig {
    database_url: String,
    app_base_url: Url,
    session: SessionSettings,
    stripe: Option<StripeSettings>,
}

impl AppConfig {
    /// Resolve configuration from `env`.
    ///
    /// Every missing required variable is reported at once.
    ///
    /// # Examples
    /// ```
    /// use backend::config::AppConfig;
    /// use backend::inbound::http::session_config::BuildMode;
    /// use mockable::MockEnv;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "DATABASE_URL_LOCAL" => Some("postgres://localhost/tabsplit".to_owned()),
    ///     "SESSION_SECRET" => Some("x".repeat(64)),
    ///     "APP_BASE_URL" => Some("https://tabsplit.example".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let config = AppConfig::from_env(&env, BuildMode::Release).expect("valid config");
    /// assert_eq!(config.database_url(), "postgres://localhost/tabsplit");
    /// assert!(config.stripe().is_none());
    /// ```
    pub fn from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Self, ConfigError> {
        let status = env_status(env);
        if !status.ok {
            return Err(ConfigError::Missing {
                names: status.missing,
            });
        }

        let database_url = resolve_database_url(env).ok_or(ConfigError::Missing {
            names: vec![DATABASE_URL_ENV],
        })?;
        let app_base_url = required_url(env, APP_BASE_URL_ENV)?;
        let session = session_settings_from_env(env, mode)?;
        let stripe = stripe_settings_from_env(env)?;

        Ok(Self {
            database_url,
            app_base_url,
            session,
            stripe,
        })
    }

    /// PostgreSQL connection string.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Public base URL of the web application.
    pub fn app_base_url(&self) -> &Url {
        &self.app_base_url
    }

    /// Session cookie settings.
    pub fn session(&self) -> &SessionSettings {
        &self.session
    }

    /// Billing credentials, when billing is enabled.
    pub fn stripe(&self) -> Option<&StripeSettings> {
        self.stripe.as_ref()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"<redacted>")
            .field("app_base_url", &self.app_base_url.as_str())
            .field("cookie_secure", &self.session.cookie_secure)
            .field("same_site", &self.session.same_site)
            .field("stripe", &self.stripe)
            .finish_non_exhaustive()
    }
}

fn required_url<E: Env>(env: &E, name: &'static str) -> Result<Url, ConfigError> {
    let value = non_blank(env, name).ok_or(ConfigError::Missing { names: vec![name] })?;
    parse_url(name, value)
}

fn parse_url(name: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        name,
        value,
        source,
    })
}

fn stripe_settings_from_env<E: Env>(env: &E) -> Result<Option<StripeSettings>, ConfigError> {
    let secret_key = non_blank(env, STRIPE_SECRET_KEY_ENV);
    let price_id = non_blank(env, STRIPE_PRICE_ID_ENV);
    let (secret_key, price_id) = match (secret_key, price_id) {
        (Some(secret_key), Some(price_id)) => (secret_key, price_id),
        (None, None) => return Ok(None),
        (secret_key, _) => {
            warn!(
                secret_key_set = secret_key.is_some(),
                "billing needs both STRIPE_SECRET_KEY and STRIPE_PRICE_ID; billing disabled"
            );
            return Ok(None);
        }
    };

    let api_base = match non_blank(env, STRIPE_API_BASE_ENV) {
        Some(value) => parse_url(STRIPE_API_BASE_ENV, value)?,
        None => parse_url(STRIPE_API_BASE_ENV, DEFAULT_STRIPE_API_BASE.to_owned())?,
    };

    Ok(Some(StripeSettings {
        secret_key,
        price_id,
        api_base,
    }))
}

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Non-secret server settings layered from defaults, files, environment
/// (`TABSPLIT_*`) and the command line.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TABSPLIT")]
pub struct ServerSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<SocketAddr>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
}

impl ServerSettings {
    /// Configured bind address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or_else(default_bind_addr)
    }

    /// Configured pool size, defaulting to 10 connections.
    pub fn db_max_connections(&self) -> u32 {
        match self.db_max_connections {
            0 => DEFAULT_DB_MAX_CONNECTIONS,
            size => size,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
