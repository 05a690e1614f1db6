use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub sqlx_logging: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Directory uploaded photos are stored in and served from.
    pub dir: PathBuf,
    /// Where request bodies are streamed before the upload is accepted.
    pub staging_dir: PathBuf,
    /// Multipart field carrying the image files.
    pub field_name: String,
    pub max_files: usize,
    /// Per-file limit in bytes.
    pub max_file_size: u64,
    /// URL prefix the storage directory is served under.
    pub public_route: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let staging_dir = std::env::temp_dir().join("fileuploaded-staging");

        let s = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 9002)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://fileuploaded.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.sqlx_logging", false)?
            .set_default("upload.dir", "public")?
            .set_default("upload.staging_dir", staging_dir.to_string_lossy().into_owned())?
            .set_default("upload.field_name", "myImages")?
            .set_default("upload.max_files", 5)?
            .set_default("upload.max_file_size", 10_000_000)?
            .set_default("upload.public_route", "/public")?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., FILEUPLOADED__SERVER__PORT)
            .add_source(Environment::with_prefix("FILEUPLOADED").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
