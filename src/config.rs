use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetsConfig {
    /// Bundled backend assets (first local fallback for the template).
    pub assets_dir: PathBuf,
    /// Public static root shared with the storefront frontend.
    pub static_dir: PathBuf,
    /// Last-resort fetch origin for template and subject images.
    pub companion_base_url: String,
    /// Per-attempt bound on asset fetches.
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root of persisted receipts; served read-only under /uploads.
    pub uploads_dir: PathBuf,
}

impl Config {
    /// Loads `config/default.toml` when present and layers `OPERA__*`
    /// environment variables on top (e.g. `OPERA__SERVER__PORT=8080`).
    /// Every key has a baked-in default so the service starts with no
    /// config file at all.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001_i64)?
            .set_default("assets.assets_dir", "assets")?
            .set_default("assets.static_dir", "public")?
            .set_default("assets.companion_base_url", "http://localhost:5173")?
            .set_default("assets.fetch_timeout_secs", 5_i64)?
            .set_default("storage.uploads_dir", "uploads")?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::Environment::with_prefix("OPERA")
                    .prefix_separator("__")
                    .separator("__"),
            );

        builder.build()?.try_deserialize()
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.assets.fetch_timeout_secs)
    }
}
