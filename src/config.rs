//! 設定檔（TOML）
//!
//! 所有欄位都有預設值，檔案只需寫要覆寫的部分。

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::MAX_EPISODE_TURNS;

pub use crate::game::RewardConfig;

/// Game Service 連線
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    pub max_episode_turns: u32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_episode_turns: MAX_EPISODE_TURNS,
        }
    }
}

/// gRPC 監聽位址
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:50051".into(),
        }
    }
}

/// 隨機對局 baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    pub games: u32,
    pub seed: u64,
    pub max_turns: u32,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            games: 1,
            seed: 0,
            max_turns: MAX_EPISODE_TURNS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub env: EnvConfig,
    pub reward: RewardConfig,
    pub server: ServerConfig,
    pub baseline: BaselineConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// 檔案不存在時使用預設值
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".into()));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.request_timeout_secs must be > 0".into(),
            ));
        }
        if self.env.max_episode_turns == 0 {
            return Err(ConfigError::Validation(
                "env.max_episode_turns must be > 0".into(),
            ));
        }
        if self.baseline.games == 0 {
            return Err(ConfigError::Validation("baseline.games must be > 0".into()));
        }
        if self.baseline.max_turns == 0 {
            return Err(ConfigError::Validation(
                "baseline.max_turns must be > 0".into(),
            ));
        }
        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::Validation("server.addr must not be empty".into()));
        }
        Ok(())
    }
}
