use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DashboardError, DashboardResult};
use crate::keyboard::InsertPolicy;
use crate::remote::price::DEFAULT_TTL;

const APP_DIR: &str = "deskboard";
const DEFAULT_CITY: &str = "West Covina";
const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    pub log_filter: String,
    pub weather_api_key: Option<String>,
    pub city: String,
    pub country: String,
    /// Signs this user in automatically when no session exists
    pub default_user: Option<String>,
    pub insert_policy: InsertPolicy,
    pub message_timeout: Duration,
    pub price_ttl: Duration,
    pub price_refresh: Duration,
    pub weather_refresh: Duration,
    pub clock_tick: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR);

        Self {
            db_path: data_dir.join("deskboard.db"),
            log_path: data_dir.join("deskboard.log"),
            log_filter: "info".to_string(),
            weather_api_key: option_env!("DESKBOARD_WEATHER_API_KEY").map(str::to_string),
            city: DEFAULT_CITY.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            default_user: None,
            insert_policy: InsertPolicy::default(),
            message_timeout: Duration::from_secs(5),
            price_ttl: DEFAULT_TTL,
            price_refresh: Duration::from_secs(60),
            weather_refresh: Duration::from_secs(600),
            clock_tick: Duration::from_secs(1),
        }
    }
}

/// Optional overrides read from `config.json`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    db_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    log: Option<String>,
    weather_api_key: Option<String>,
    city: Option<String>,
    country: Option<String>,
    user: Option<String>,
    insert_policy: Option<InsertPolicy>,
    weather_refresh_secs: Option<u64>,
    price_refresh_secs: Option<u64>,
}

impl AppConfig {
    pub fn config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.json"))
    }

    /// Defaults, then the config file, then `DESKBOARD_*` environment variables
    pub fn load() -> DashboardResult<Self> {
        let file = Self::config_file();
        Self::load_from(file.as_deref(), |name| std::env::var(name).ok())
    }

    pub fn load_from(file: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> DashboardResult<Self> {
        let mut config = Self::default();

        if let Some(path) = file.filter(|p| p.exists()) {
            let raw = std::fs::read_to_string(path)?;
            let overrides: FileConfig = serde_json::from_str(&raw)
                .map_err(|e| DashboardError::config(format!("Invalid config file {}: {}", path.display(), e)))?;
            config.apply_file(overrides);
        }

        config.apply_env(env);
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.db_path {
            self.db_path = v;
        }
        if let Some(v) = file.log_path {
            self.log_path = v;
        }
        if let Some(v) = file.log {
            self.log_filter = v;
        }
        if let Some(v) = file.weather_api_key {
            self.weather_api_key = Some(v);
        }
        if let Some(v) = file.city {
            self.city = v;
        }
        if let Some(v) = file.country {
            self.country = v;
        }
        if let Some(v) = file.user {
            self.default_user = Some(v);
        }
        if let Some(v) = file.insert_policy {
            self.insert_policy = v;
        }
        if let Some(v) = file.weather_refresh_secs {
            self.weather_refresh = Duration::from_secs(v);
        }
        if let Some(v) = file.price_refresh_secs {
            self.price_refresh = Duration::from_secs(v);
        }
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("DESKBOARD_WEATHER_API_KEY") {
            self.weather_api_key = Some(v);
        }
        if let Some(v) = var("DESKBOARD_CITY") {
            self.city = v;
        }
        if let Some(v) = var("DESKBOARD_DB") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = var("DESKBOARD_USER") {
            self.default_user = Some(v);
        }
        if let Some(v) = var("DESKBOARD_LOG") {
            self.log_filter = v;
        }
    }
}

#[derive(Debug, Clone)]
pub enum PendingAction {
    DeleteTodo(String),
    Logout,
}

impl PendingAction {
    pub fn confirm_message(&self) -> &'static str {
        match self {
            Self::DeleteTodo(_) => "Delete this todo?",
            Self::Logout => "Sign out?",
        }
    }
}
