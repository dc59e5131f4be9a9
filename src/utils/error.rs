use crate::domain::model::Payload;
use thiserror::Error;

/// 傳輸層失敗（DNS、連線、TLS、讀取 body 等）
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("Request interrupted: {message}")]
    Interrupted { message: String },
}

/// 回傳給呼叫端的錯誤，每次呼叫只會出現一個
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    NetworkError(#[from] TransportError),

    #[error("Invalid response type")]
    InvalidResponseType,

    #[error("Empty response")]
    EmptyResponse,

    #[error("Unexpected response (HTTP {status})")]
    UnexpectedResponse { status: u16, body: Option<String> },
}

impl ServiceError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            ServiceError::NetworkError(e) => format!("Could not reach the service: {}", e),
            ServiceError::InvalidResponseType => {
                "The service answered with an error status".to_string()
            }
            ServiceError::EmptyResponse => "The service returned no data".to_string(),
            ServiceError::UnexpectedResponse { status, body } => match body {
                Some(text) => format!("Unexpected response (HTTP {}): {}", status, text),
                None => format!("Unexpected response shape (HTTP {})", status),
            },
        }
    }
}

/// 建構期錯誤：設定不正確時直接中止建構，不會經過 callback
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("HTTP client could not be built: {0}")]
    HttpClientError(#[from] reqwest::Error),

    #[error("No tokio runtime available to host the work queue")]
    RuntimeUnavailable,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub type ServiceResult = std::result::Result<Payload, ServiceError>;
