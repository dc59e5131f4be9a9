use crate::config::ServiceConfig;
use crate::domain::endpoint::Endpoint;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "coordinator-client")]
#[command(about = "Query the coordinator catalog API")]
pub struct CliArgs {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the API base URL")]
    pub base_url: Option<String>,

    #[arg(long, help = "Maximum number of requests in flight at once")]
    pub concurrent_requests: Option<usize>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Locale reported in the User-Agent (e.g. en_US)")]
    pub locale: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 首頁輪播的促銷內容
    Promotions,
    Seasons,
    Products,
    /// 單一款式的詳細資料
    Details {
        #[arg(long)]
        style: String,
    },
    /// 同時請求 promotions、seasons、products
    All,
}

impl Command {
    pub fn endpoints(&self) -> Vec<Endpoint> {
        match self {
            Command::Promotions => vec![Endpoint::Promotions],
            Command::Seasons => vec![Endpoint::Seasons],
            Command::Products => vec![Endpoint::Products],
            Command::Details { style } => vec![Endpoint::details(style.clone())],
            Command::All => vec![Endpoint::Promotions, Endpoint::Seasons, Endpoint::Products],
        }
    }
}

impl CliArgs {
    /// 設定來源優先序：CLI 參數 > 設定檔 > 環境變數 > 預設值
    pub fn resolve_config(&self) -> Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => ServiceConfig::from_env()?,
        };

        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(concurrent) = self.concurrent_requests {
            config.max_concurrent_requests = concurrent;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_seconds = Some(timeout);
        }
        if let Some(locale) = &self.locale {
            config.locale = Some(locale.clone());
        }

        Ok(config)
    }
}
