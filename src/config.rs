use std::{fmt::Display, str::FromStr};

use sqlx::postgres::PgConnectOptions;

use crate::error::Error;

pub const DEFAULT_PHOTO: &str = "default.png";

/// Database settings, all that `migrate` and `seed` need.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

/// Settings of the web server.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_path: String,
    pub max_photo_bytes: usize,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub bind_addr: String,
}

/// Identity created by `ballot seed`.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub roll_no: String,
    pub password: String,
    pub fullname: String,
    pub email: String,
    pub dept: String,
}

fn required(key: &str) -> Result<String, Error> {
    match dotenv::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::ConfigError(format!("environment variable {} not been set", key))),
    }
}

fn optional(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| {
        log::info!("{} not set, using default: {}", key, default);
        default.to_owned()
    })
}

fn parsed<T>(key: &str, default: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
{
    optional(key, default).parse().map_err(|e| Error::ConfigError(format!("invalid {}: {}", key, e)))
}

impl DbConfig {
    pub fn load() -> Result<Self, Error> {
        Ok(Self {
            host: optional("DB_HOST", "localhost"),
            port: parsed("DB_PORT", "5432")?,
            user: required("DB_USER")?,
            password: optional("DB_PASSWORD", ""),
            name: required("DB_NAME")?,
            max_connections: parsed("DB_MAX_CONNECTIONS", "5")?,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        Ok(Self {
            upload_path: optional("UPLOAD_PATH", "static/uploads"),
            max_photo_bytes: parsed("MAX_PHOTO_BYTES", "5242880")?,
            session_secret: required("SESSION_SECRET")?,
            session_ttl_hours: parsed("SESSION_TTL_HOURS", "12")?,
            bind_addr: optional("BIND_ADDR", "0.0.0.0:8000"),
        })
    }
}

impl AdminSeed {
    pub fn load() -> Result<Self, Error> {
        Ok(Self {
            roll_no: optional("ADMIN_ROLL_NO", "ADMIN01"),
            password: required("ADMIN_PASSWORD")?,
            fullname: optional("ADMIN_NAME", "System Admin"),
            email: optional("ADMIN_EMAIL", "admin@college.edu"),
            dept: optional("ADMIN_DEPT", "IT"),
        })
    }
}
