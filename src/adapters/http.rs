use crate::adapters::device::DeviceInfo;
use crate::config::ServiceConfig;
use crate::domain::model::{HttpRequest, Outcome, ResponseHead};
use crate::domain::ports::Transport;
use crate::utils::error::{Result, TransportError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_CHARSET, ACCEPT_ENCODING};
use reqwest::Client;
use std::time::Duration;

/// Transport backed by a single shared `reqwest::Client`.
///
/// Every request carries `Accept-Charset`, `Accept-Encoding` and the composed
/// `User-Agent`. No cookie store is configured, so cookies are never stored or
/// sent.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let device = DeviceInfo::detect(config.locale.as_deref());
        let user_agent = device.user_agent(&config.app);
        tracing::debug!("User-Agent: {}", user_agent);

        Self::with_user_agent(user_agent, config.request_timeout())
    }

    pub fn with_user_agent(user_agent: String, timeout: Option<Duration>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_CHARSET, HeaderValue::from_static("utf-8"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(user_agent);

        // 未設定時使用 reqwest 的預設行為
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Outcome {
        let started_at = Utc::now();

        let mut builder = self.client.request(request.method.into(), request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                return Outcome::failed(TransportError::Client(e), started_at, Utc::now());
            }
        };

        let head = ResponseHead {
            status: response.status().as_u16(),
            headers: response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect(),
        };

        match response.bytes().await {
            Ok(bytes) => {
                // 空 body 視為沒有 body
                let body = (!bytes.is_empty()).then(|| bytes.to_vec());
                Outcome::received(Some(head), body, started_at, Utc::now())
            }
            Err(e) => Outcome::failed(TransportError::Client(e), started_at, Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::endpoint::HttpMethod;
    use std::collections::BTreeMap;

    #[test]
    fn test_invalid_user_agent_fails_construction() {
        let result = ReqwestTransport::with_user_agent("bad\nagent".to_string(), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_unreachable_host_yields_transport_error() {
        let transport =
            ReqwestTransport::with_user_agent("test 1.0 (1)".to_string(), None).unwrap();
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: url::Url::parse("http://127.0.0.1:1/slides.json").unwrap(),
            headers: BTreeMap::new(),
            body: None,
        };

        let outcome = tokio_test::block_on(transport.execute(request));

        assert!(matches!(outcome.result, Err(TransportError::Client(_))));
        assert!(outcome.elapsed_ms().is_some());
    }
}
