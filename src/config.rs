use std::{net::SocketAddr, time::Duration};

use anyhow::{ensure, Context};
use serde::Deserialize;

/// Upper bound for token and cookie lifetimes, one year.
pub const MAX_TTL_HOURS: i64 = 24 * 366;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Session cookie settings. The cookie lifetime is independent of the token
/// lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieConfig {
    pub ttl_hours: i64,
    pub secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub json_logs: bool,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub db_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub cookie: CookieConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let cfg = Self {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT").unwrap_or(8080),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v == "json")
                .unwrap_or(false),
            mongodb_uri: std::env::var("MONGODB_URI").context("MONGODB_URI is not set")?,
            mongodb_db: std::env::var("MONGODB_DB").unwrap_or_else(|_| "hotel_booking".into()),
            db_timeout_secs: env_parse("DB_TIMEOUT_SECS").unwrap_or(10),
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
                ttl_hours: env_parse("JWT_TTL_HOURS").unwrap_or(72),
            },
            cookie: CookieConfig {
                ttl_hours: env_parse("COOKIE_TTL_HOURS").unwrap_or(24),
                secure: env_parse("COOKIE_SECURE").unwrap_or(false),
            },
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects lifetimes that would overflow timestamp arithmetic.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=MAX_TTL_HOURS).contains(&self.jwt.ttl_hours),
            "JWT_TTL_HOURS must be between 1 and {}",
            MAX_TTL_HOURS
        );
        ensure!(
            (1..=MAX_TTL_HOURS).contains(&self.cookie.ttl_hours),
            "COOKIE_TTL_HOURS must be between 1 and {}",
            MAX_TTL_HOURS
        );
        ensure!(self.db_timeout_secs > 0, "DB_TIMEOUT_SECS must be positive");
        Ok(())
    }

    pub fn db_timeout(&self) -> Duration {
        Duration::from_secs(self.db_timeout_secs)
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
