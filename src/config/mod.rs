#[cfg(feature = "cli")]
pub mod cli;

use crate::utils::error::{ConfigError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://t1.aplus.rs/coordinator/api";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 5;
pub const MAX_CONCURRENT_REQUESTS_LIMIT: usize = 64;

/// 應用程式資訊，用於組成 User-Agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub build: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            build: "1".to_string(),
        }
    }
}

/// Construction-time settings for a [`crate::ServiceClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: Option<u64>,
    pub locale: Option<String>,
    pub app: AppInfo,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            request_timeout_seconds: None,
            locale: None,
            app: AppInfo::default(),
        }
    }
}

impl ServiceConfig {
    /// 從環境變數載入，未設定的欄位使用預設值
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup("COORDINATOR_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(value) = lookup("COORDINATOR_MAX_CONCURRENT_REQUESTS") {
            config.max_concurrent_requests =
                parse_number("COORDINATOR_MAX_CONCURRENT_REQUESTS", &value)?;
        }
        if let Some(value) = lookup("COORDINATOR_TIMEOUT_SECONDS") {
            config.request_timeout_seconds =
                Some(parse_number("COORDINATOR_TIMEOUT_SECONDS", &value)?);
        }
        if let Some(locale) = lookup("COORDINATOR_LOCALE") {
            config.locale = Some(locale);
        }
        if let Some(name) = lookup("COORDINATOR_APP_NAME") {
            config.app.name = name;
        }
        if let Some(version) = lookup("COORDINATOR_APP_VERSION") {
            config.app.version = version;
        }
        if let Some(build) = lookup("COORDINATOR_APP_BUILD") {
            config.app.build = build;
        }

        Ok(config)
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConfigError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConfigError::ParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${COORDINATOR_HOST})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_base_url("base_url", &self.base_url)?;
        validation::validate_range(
            "max_concurrent_requests",
            self.max_concurrent_requests,
            1,
            MAX_CONCURRENT_REQUESTS_LIMIT,
        )?;
        if let Some(timeout) = self.request_timeout_seconds {
            validation::validate_range("request_timeout_seconds", timeout, 1, u64::MAX)?;
        }
        validation::validate_non_empty_string("app.name", &self.app.name)?;
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected a positive integer".to_string(),
        })
}
