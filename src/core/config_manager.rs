// src/core/config_manager.rs
//! Configuration: `config.yaml` sections per environment, then env overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use super::FsOps;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub api_timeout_ms: u64,
    pub storage_path: PathBuf,
    pub locales_dir: Option<PathBuf>,
    pub enable_multi_language: bool,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            api_timeout_ms: 30_000,
            storage_path: PathBuf::from("data/local_storage.json"),
            locales_dir: None,
            enable_multi_language: true,
            port: 8080,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    local: Option<AppConfig>,
    production: Option<AppConfig>,
}

impl ConfigManager {
    /// Load `config.yaml` from the working directory (if present) plus env overrides
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut app = Self::load_file(&base_dir.join(CONFIG_FILE), &environment)?;
        app.apply_overrides(|name| std::env::var(name).ok())?;
        app.resolve_paths(&base_dir);

        Ok(Self { environment, app })
    }

    fn get_environment() -> String {
        std::env::var("GREEN_MATCHERS_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Section of `path` for `environment`; defaults when the file or section is absent
    pub fn load_file(path: &Path, environment: &str) -> Result<AppConfig> {
        if !path.exists() {
            info!("{} not found, using built-in defaults", path.display());
            return Ok(AppConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }
}

impl AppConfig {
    /// Apply `GREEN_MATCHERS_*` / `ROCKET_PORT` overrides read through `var`
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("GREEN_MATCHERS_API_URL") {
            self.api_url = url;
        }
        if let Some(timeout) = var("GREEN_MATCHERS_API_TIMEOUT_MS") {
            self.api_timeout_ms = timeout
                .parse()
                .map_err(|_| anyhow::anyhow!("GREEN_MATCHERS_API_TIMEOUT_MS must be a number"))?;
        }
        if let Some(path) = var("GREEN_MATCHERS_STORAGE_PATH") {
            self.storage_path = PathBuf::from(path);
        }
        if let Some(dir) = var("GREEN_MATCHERS_LOCALES_DIR") {
            self.locales_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = var("GREEN_MATCHERS_ENABLE_MULTI_LANGUAGE") {
            self.enable_multi_language = flag != "false";
        }
        if let Some(port) = var("ROCKET_PORT") {
            self.port = port
                .parse()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        Ok(())
    }

    pub fn resolve_paths(&mut self, base_dir: &Path) {
        self.storage_path = FsOps::normalize_path(base_dir, &self.storage_path);
        if let Some(dir) = &self.locales_dir {
            self.locales_dir = Some(FsOps::normalize_path(base_dir, dir));
        }
    }
}
