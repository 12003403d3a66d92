use crate::domain::model::{Alert, DayWindow, Delivery, DeliveryPage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// One page request against the deliveries list endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// First page of a scope, carries the day window as query parameters.
    First { scope_id: String, window: DayWindow },
    /// Follow-up page, the opaque `next_href` is requested as-is.
    Next { url: String },
}

#[async_trait]
pub trait DeliverySource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<DeliveryPage>;

    async fn fetch_detail(&self, scope_id: &str, delivery_id: &str) -> Result<Delivery>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<()>;

    fn describe(&self) -> &'static str;
}
