use crate::domain::model::{HttpRequest, Outcome};
use async_trait::async_trait;

/// 傳輸層：送出請求，回傳恰好一個 Outcome（成功或錯誤），含起訖時間
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Outcome;
}
