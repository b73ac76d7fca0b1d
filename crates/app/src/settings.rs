//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` next to the binary, then
//! from `MONEY_TRACKER_*` environment variables, e.g.
//! `MONEY_TRACKER_AUTH__JWT_SECRET`. See `settings.example.toml`.
use chrono::TimeDelta;
use config::{Config, ConfigError, Environment, File, Source, builder::DefaultState};
use serde::Deserialize;

const ENV_PREFIX: &str = "MONEY_TRACKER";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
}

impl Auth {
    /// Token lifetime, rejecting values chrono cannot represent.
    pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
        TimeDelta::try_days(self.token_ttl_days).ok_or_else(|| {
            ConfigError::Message(format!(
                "auth.token_ttl_days is out of range: {}",
                self.token_ttl_days
            ))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
}

fn with_defaults(
    builder: config::ConfigBuilder<DefaultState>,
) -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 4011)?
        .set_default("database.url", "sqlite:./money_tracker.db?mode=rwc")?
        .set_default("database.max_connections", 100)?
        .set_default("database.min_connections", 10)?
        .set_default("database.idle_timeout_secs", 600)?
        .set_default("database.max_lifetime_secs", 3600)?
        .set_default("database.connect_timeout_secs", 8)?
        .set_default("auth.token_ttl_days", 30)
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(File::with_name("settings").required(false))
    }

    fn load<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        with_defaults(Config::builder())?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
