use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// 描述一個邏輯 API 操作如何對應到 HTTP 請求
pub trait EndpointDescriptor {
    fn method(&self) -> HttpMethod;

    /// 附加在 base URL 之後的路徑片段
    fn path(&self) -> &'static str;

    fn params(&self) -> BTreeMap<String, String>;

    fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers
    }
}

/// Closed set of logical API operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Promotions,
    Seasons,
    Products,
    Details { style_code: String },
}

/// Endpoint 的標籤，不帶參數，用來查找回應格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Promotions,
    Seasons,
    Products,
    Details,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::Promotions => "promotions",
            EndpointKind::Seasons => "seasons",
            EndpointKind::Products => "products",
            EndpointKind::Details => "details",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Endpoint {
    pub fn details(style_code: impl Into<String>) -> Self {
        Endpoint::Details {
            style_code: style_code.into(),
        }
    }

    pub fn kind(&self) -> EndpointKind {
        match self {
            Endpoint::Promotions => EndpointKind::Promotions,
            Endpoint::Seasons => EndpointKind::Seasons,
            Endpoint::Products => EndpointKind::Products,
            Endpoint::Details { .. } => EndpointKind::Details,
        }
    }
}

impl EndpointDescriptor for Endpoint {
    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn path(&self) -> &'static str {
        match self {
            Endpoint::Promotions => "slides.json",
            Endpoint::Seasons => "seasons.json",
            Endpoint::Products => "products.json",
            Endpoint::Details { .. } => "details",
        }
    }

    fn params(&self) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        if let Endpoint::Details { style_code } = self {
            params.insert("style".to_string(), style_code.clone());
        }
        params
    }
}
