use crate::adapters::http::ReqwestTransport;
use crate::config::ServiceConfig;
use crate::core::classifier::ResponseClassifier;
use crate::core::dispatcher::Dispatcher;
use crate::core::request_builder::RequestBuilder;
use crate::domain::endpoint::Endpoint;
use crate::domain::model::HttpRequest;
use crate::domain::ports::Transport;
use crate::utils::error::{ConfigError, Result, ServiceError, ServiceResult, TransportError};
use crate::utils::validation::Validate;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;

/// Client for the coordinator API.
///
/// Construct once at startup and clone the handle wherever calls are made;
/// all clones share the same work queue.
#[derive(Clone)]
pub struct ServiceClient {
    builder: RequestBuilder,
    dispatcher: Dispatcher,
}

impl ServiceClient {
    /// 使用 reqwest transport 與目前的 tokio runtime
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::RuntimeUnavailable)?;
        let transport = ReqwestTransport::new(config)?;
        Self::assemble(config, Arc::new(transport), runtime)
    }

    pub fn with_transport(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;
        Self::assemble(config, transport, runtime)
    }

    // 呼叫端已完成 config 驗證
    fn assemble(
        config: &ServiceConfig,
        transport: Arc<dyn Transport>,
        runtime: Handle,
    ) -> Result<Self> {
        let builder = RequestBuilder::new(&config.base_url)?;
        let dispatcher = Dispatcher::new(
            transport,
            ResponseClassifier::default(),
            config.max_concurrent_requests,
            runtime,
        );

        tracing::info!(
            "Service client ready: {} (max {} concurrent requests)",
            builder.base_url(),
            dispatcher.max_concurrent()
        );

        Ok(Self {
            builder,
            dispatcher,
        })
    }

    pub fn build_request(&self, endpoint: &Endpoint) -> HttpRequest {
        self.builder.build(endpoint)
    }

    /// 非阻塞：排入佇列後立即返回，結果透過 callback 交付一次
    pub fn call<F>(&self, endpoint: Endpoint, callback: F)
    where
        F: FnOnce(ServiceResult) + Send + 'static,
    {
        let request = self.build_request(&endpoint);
        self.dispatcher.submit(request, endpoint.kind(), callback);
    }

    /// Same as [`ServiceClient::call`], awaiting the result instead of taking a callback.
    pub async fn fetch(&self, endpoint: Endpoint) -> ServiceResult {
        let (tx, rx) = oneshot::channel();
        self.call(endpoint, move |result| {
            let _ = tx.send(result);
        });

        rx.await.unwrap_or_else(|_| {
            Err(ServiceError::NetworkError(TransportError::Interrupted {
                message: "request task ended before delivering a result".to_string(),
            }))
        })
    }

    pub fn pending_requests(&self) -> usize {
        self.dispatcher.pending()
    }
}
