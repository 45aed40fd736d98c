//! Layered configuration loader.
//!
//! Uses Figment to merge built-in defaults + `config.toml` +
//! `config.<env>.toml` + `APP_*` env vars (`__` separates nested keys, e.g.
//! `APP_POLLING__INTERVAL_MS=500`). `RUST_ENV` picks the environment and
//! defaults to `dev`.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    pub interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileSettings {
    pub move_threshold_px: f64,
    pub distance_unit_px: f64,
    pub animation_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub polling: PollingSettings,
    pub reconcile: ReconcileSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings { base_url: "http://localhost:8000".to_string(), timeout_ms: 30_000 },
            polling: PollingSettings { interval_ms: 1000 },
            reconcile: ReconcileSettings { move_threshold_px: 5.0, distance_unit_px: 10.0, animation_ms: 1000 },
        }
    }
}

impl Settings {
    pub fn poll_interval(&self) -> Duration { Duration::from_millis(self.polling.interval_ms) }
    pub fn request_timeout(&self) -> Duration { Duration::from_millis(self.api.timeout_ms) }
    pub fn animation_duration(&self) -> Duration { Duration::from_millis(self.reconcile.animation_ms) }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() { return Err(ConfigError::Invalid("api.base_url must not be empty".into())); }
        if self.api.timeout_ms == 0 { return Err(ConfigError::Invalid("api.timeout_ms must be > 0".into())); }
        if self.polling.interval_ms == 0 { return Err(ConfigError::Invalid("polling.interval_ms must be > 0".into())); }
        if self.reconcile.animation_ms == 0 { return Err(ConfigError::Invalid("reconcile.animation_ms must be > 0".into())); }
        if self.reconcile.distance_unit_px <= 0.0 { return Err(ConfigError::Invalid("reconcile.distance_unit_px must be > 0".into())); }
        if self.reconcile.move_threshold_px < 0.0 { return Err(ConfigError::Invalid("reconcile.move_threshold_px must be >= 0".into())); }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Loads from the current directory.
    pub fn load() -> Result<Self, ConfigError> { Self::load_from(Path::new(".")) }

    /// Loads `config.toml` and `config.<env>.toml` from `dir`.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?.validate()?;
        Ok(config)
    }

    /// Typed view of the whole configuration.
    pub fn settings(&self) -> Result<Settings, ConfigError> { Ok(self.figment.extract()?) }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }
}
