use std::fmt;
use std::net::SocketAddr;

use anyhow::Context;
use sqlx::postgres::PgSslMode;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Connection parameters for the product database.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
    pub ssl_mode: PgSslMode,
    pub max_connections: u32,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("port", &self.port)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db: DbConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let db = DbConfig {
            host: required("DB_HOST")?,
            user: required("DB_USER")?,
            password: required("DB_PASSWORD")?,
            name: required("DB_NAME")?,
            port: required("DB_PORT")?
                .trim()
                .parse::<u16>()
                .context("DB_PORT must be a valid port number")?,
            ssl_mode: get("DB_SSLMODE")
                .unwrap_or_else(|| "disable".into())
                .parse::<PgSslMode>()
                .context("DB_SSLMODE is not a recognised sslmode")?,
            max_connections: get("DB_MAX_CONNECTIONS")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        let port = get("PORT")
            .map(|v| v.trim().parse::<u16>())
            .transpose()
            .context("PORT must be a valid port number")?
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            db,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
