//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` next to the binary and from `FLOCKBOOK__*`
//! environment variables (`FLOCKBOOK__SERVER__PORT=8080`).
//!
//! See `settings.toml` for the configuration.
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    pub port: u16,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    pub currency: Option<String>,
}

impl Server {
    /// Server options with defaults applied.
    pub fn config(&self) -> server::ServerConfig {
        let defaults = server::ServerConfig::default();
        server::ServerConfig {
            upload_dir: self.upload_dir.clone().unwrap_or(defaults.upload_dir),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
            currency: self.currency.clone().unwrap_or(defaults.currency),
        }
    }

    pub fn addr(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or("127.0.0.1");
        format!("{bind}:{}", self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

fn default_level() -> String {
    "info".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("FLOCKBOOK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn server_defaults_are_applied() {
        let settings = parse(
            r#"
            [server]
            database = "memory"
            port = 3000
            "#,
        );
        assert_eq!(settings.app.level, "info");
        let server = settings.server.unwrap();
        assert!(matches!(server.database, Database::Memory));
        assert_eq!(server.addr(), "127.0.0.1:3000");

        let config = server.config();
        assert_eq!(config.currency, "UGX");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
    }

    #[test]
    fn sqlite_database_and_overrides() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            database = { sqlite = "./farm.db" }
            bind = "0.0.0.0"
            port = 8080
            currency = "KES"
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        let server = settings.server.unwrap();
        assert!(matches!(&server.database, Database::Sqlite(path) if path == "./farm.db"));
        assert_eq!(server.addr(), "0.0.0.0:8080");
        assert_eq!(server.config().currency, "KES");
    }

    #[test]
    fn server_section_is_optional() {
        let settings = parse("[app]\nlevel = \"warn\"\n");
        assert!(settings.server.is_none());
    }
}
