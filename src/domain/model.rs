use crate::domain::endpoint::HttpMethod;
use crate::utils::error::TransportError;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use url::Url;

/// 成功回應的內容：字串 key 對應 JSON 值
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// A fully-formed transport request, built once from an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// 編碼後的 query，沒有參數時為空字串
    pub fn query(&self) -> &str {
        self.url.query().unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

/// 收到的回應；head 或 body 都可能缺席
#[derive(Debug, Clone, Default)]
pub struct Received {
    pub head: Option<ResponseHead>,
    pub body: Option<Vec<u8>>,
}

/// Raw result of executing one request.
#[derive(Debug)]
pub struct Outcome {
    pub result: std::result::Result<Received, TransportError>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Outcome {
    pub fn received(
        head: Option<ResponseHead>,
        body: Option<Vec<u8>>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            result: Ok(Received { head, body }),
            started_at: Some(started_at),
            finished_at: Some(finished_at),
        }
    }

    pub fn failed(
        error: TransportError,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            result: Err(error),
            started_at: Some(started_at),
            finished_at: Some(finished_at),
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.result
            .as_ref()
            .ok()
            .and_then(|r| r.head.as_ref())
            .map(|h| h.status)
    }

    /// 以毫秒計的耗時，缺少任一時間戳時為 None
    pub fn elapsed_ms(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => {
                let delta = end.signed_duration_since(start);
                Some(delta.num_microseconds().unwrap_or(i64::MAX) as f64 / 1000.0)
            }
            _ => None,
        }
    }
}
