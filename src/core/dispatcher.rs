//! Bounded asynchronous work queue for transport requests.
//!
//! Each submission becomes one task on the tokio runtime. A semaphore caps how
//! many tasks talk to the transport at the same time; tasks beyond the cap wait
//! inside the runtime, never in the caller. Completion order is not tied to
//! submission order.

use crate::core::classifier::ResponseClassifier;
use crate::domain::endpoint::EndpointKind;
use crate::domain::model::HttpRequest;
use crate::domain::ports::Transport;
use crate::utils::error::{ServiceError, ServiceResult, TransportError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    classifier: Arc<ResponseClassifier>,
    permits: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    max_concurrent: usize,
    runtime: Handle,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        classifier: ResponseClassifier,
        max_concurrent: usize,
        runtime: Handle,
    ) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            transport,
            classifier: Arc::new(classifier),
            permits: Arc::new(Semaphore::new(max_concurrent)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_concurrent,
            runtime,
        }
    }

    /// 排入一個請求後立即返回；完成時 callback 恰好被呼叫一次
    pub fn submit<F>(&self, request: HttpRequest, kind: EndpointKind, callback: F)
    where
        F: FnOnce(ServiceResult) + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);
        let classifier = Arc::clone(&self.classifier);
        let permits = Arc::clone(&self.permits);
        let queued = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let completion = Completion::new(callback, Arc::clone(&self.in_flight));
        tracing::debug!(
            endpoint = %kind,
            queued,
            "📡 Queued {} {}",
            request.method,
            request.url
        );

        self.runtime.spawn(async move {
            // semaphore 從不關閉；萬一關閉則不限流
            let permit = permits.acquire_owned().await.ok();

            let outcome = transport.execute(request).await;
            if let Some(elapsed_ms) = outcome.elapsed_ms() {
                tracing::debug!(
                    endpoint = %kind,
                    status = outcome.status(),
                    elapsed_ms,
                    "⏱ {:.1} ms",
                    elapsed_ms
                );
            }

            let result = classifier.classify(kind, outcome);

            drop(permit);
            completion.complete(result);
        });
    }

    /// 尚未完成（排隊中或執行中）的請求數
    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

/// 持有 callback 與佇列計數；任務未正常完成就被丟棄時
/// （runtime 關閉、transport panic）在 Drop 中以 Interrupted 交付結果
struct Completion<F>
where
    F: FnOnce(ServiceResult),
{
    callback: Option<F>,
    in_flight: Arc<AtomicUsize>,
}

impl<F> Completion<F>
where
    F: FnOnce(ServiceResult),
{
    fn new(callback: F, in_flight: Arc<AtomicUsize>) -> Self {
        Self {
            callback: Some(callback),
            in_flight,
        }
    }

    fn complete(mut self, result: ServiceResult) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: ServiceResult) {
        if let Some(callback) = self.callback.take() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            callback(result);
        }
    }
}

impl<F> Drop for Completion<F>
where
    F: FnOnce(ServiceResult),
{
    fn drop(&mut self) {
        if self.callback.is_some() {
            tracing::warn!("Request task ended before completing");
            self.deliver(Err(ServiceError::NetworkError(
                TransportError::Interrupted {
                    message: "request task ended before delivering a result".to_string(),
                },
            )));
        }
    }
}
