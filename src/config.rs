// src/config.rs
//! Configuration loading: `config.yaml` with one section per environment.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const JWT_SECRET_VAR: &str = "SCOUTLING_JWT_SECRET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database_path: PathBuf,
    pub log_path: Option<PathBuf>,
    pub profile: ProfileSettings,
    pub linkedin: LinkedinSettings,
    pub auth: AuthSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: IpAddr,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Upper bound for a single stored text field, in bytes
    pub max_field_bytes: usize,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            max_field_bytes: 256 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedinSettings {
    pub search_url: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub retries: u32,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rate_limit_cooldown_ms: u64,
    pub locations: HashMap<String, LocationIds>,
}

impl Default for LinkedinSettings {
    fn default() -> Self {
        Self {
            search_url:
                "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search".to_string(),
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            timeout_seconds: 15,
            retries: 3,
            min_delay_ms: 2_000,
            max_delay_ms: 5_000,
            rate_limit_cooldown_ms: 10_000,
            locations: HashMap::new(),
        }
    }
}

impl LinkedinSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// LinkedIn identifiers for a location name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationIds {
    pub geo_id: u64,
    #[serde(default)]
    pub populated_places: Vec<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub issuer: String,
    pub token_ttl_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            issuer: "scoutling".to_string(),
            token_ttl_hours: 24 * 7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub save_indicator_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            save_indicator_ms: 1_000,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: AppConfig,
    #[serde(default)]
    production: AppConfig,
}

impl AppConfig {
    /// Load configuration for the environment named by `ENVIRONMENT`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let environment = Self::environment();
        let path = Self::config_path(path);

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_yaml(&content, &environment)?;
        config.database_path = Self::resolve_path(&config.database_path)?;
        Ok(config)
    }

    /// Explicit path, then `$SCOUTLING_CONFIG`, then `config.yaml`
    pub fn config_path(path: Option<&Path>) -> PathBuf {
        path.map(Path::to_path_buf)
            .or_else(|| std::env::var("SCOUTLING_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse configuration")?;

        let mut config = match environment {
            "production" => file.production,
            _ => file.local,
        };
        if config.database_path.as_os_str().is_empty() {
            config.database_path = PathBuf::from("data/scoutling.db");
        }
        Ok(config)
    }

    pub fn environment() -> String {
        std::env::var("SCOUTLING_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir =
                std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// JWT signing secret, taken from the environment only
    pub fn jwt_secret() -> Result<String> {
        std::env::var(JWT_SECRET_VAR)
            .map_err(|_| anyhow::anyhow!("{} environment variable not set", JWT_SECRET_VAR))
    }

    pub fn save_indicator(&self) -> Duration {
        Duration::from_millis(self.ui.save_indicator_ms)
    }
}
