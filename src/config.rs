use std::fmt;

use anyhow::{Context, Result};
use sqlx::postgres::PgConnectOptions;

// ---------------------------------------------------------------------------
// DatabaseConfig
// ---------------------------------------------------------------------------

/// Connection settings for the Postgres instance holding the `sensor` table.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server_host: String,
    pub server_port: u16,
    /// Apply `migrations/` before serving. Off unless explicitly enabled.
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    ///
    /// The four database identity variables have no fallback: a deployment
    /// that forgets one of them fails at startup instead of silently talking
    /// to some local default.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database = DatabaseConfig {
            host: required(&lookup, "DB_HOST")?,
            port: optional(&lookup, "DB_PORT", "5432")
                .parse()
                .context("DB_PORT must be a valid port number")?,
            user: required(&lookup, "DB_USER")?,
            password: required(&lookup, "DB_PASSWORD")?,
            name: required(&lookup, "DB_NAME")?,
            max_connections: optional(&lookup, "DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
        };
        anyhow::ensure!(
            database.max_connections > 0,
            "DB_MAX_CONNECTIONS must be a positive integer"
        );

        Ok(Self {
            database,
            server_host: optional(&lookup, "SERVER_HOST", "0.0.0.0"),
            server_port: optional(&lookup, "SERVER_PORT", "8080")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            run_migrations: parse_bool(&optional(&lookup, "RUN_MIGRATIONS", "false"))
                .context("RUN_MIGRATIONS must be true or false")?,
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(anyhow::anyhow!("not a boolean: {other:?}")),
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.is_empty())
        .with_context(|| format!("missing required env var: {key}"))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_owned())
}
