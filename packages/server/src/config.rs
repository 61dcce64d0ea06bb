use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
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
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    Memory,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default)]
    pub path_style: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend.
    pub data_dir: PathBuf,
    /// Prefix for externally resolvable object URLs, e.g. `https://cdn.example.com`.
    pub public_base_url: String,
    /// Largest object the filesystem backend accepts, in bytes.
    pub max_blob_size: u64,
    /// Largest image accepted by the staging upload, in bytes.
    pub max_image_size: u64,
    pub s3: Option<S3Config>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageConfig {
    /// Base URL of the WebP conversion service. Images are staged unconverted when unset.
    pub conversion_endpoint: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub image: ImageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SCOREHUB__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SCOREHUB").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.max_connections", 20)?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.data_dir", "./data/blobs")?
            .set_default("storage.public_base_url", "http://127.0.0.1:3000/files")?
            .set_default("storage.max_blob_size", 16 * 1024 * 1024)?
            .set_default("storage.max_image_size", 8 * 1024 * 1024)
    }
}
