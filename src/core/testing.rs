//! In-memory fakes for the domain ports, shared by the unit tests.

use crate::domain::model::{Alert, Delivery, DeliveryPage};
use crate::domain::ports::{DeliverySource, Notifier, PageRequest};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type ErrorFactory = Box<dyn Fn() -> MonitorError + Send + Sync>;

pub fn delivery(id: &str, status: &str, store_id: &str) -> Delivery {
    let mut delivery: Delivery = serde_json::from_value(serde_json::json!({
        "id": id,
        "status": status,
        "external_store_id": store_id,
    }))
    .expect("valid delivery fixture");
    delivery.scope_id = "cust-1".to_string();
    delivery
}

fn not_found() -> MonitorError {
    MonitorError::HttpStatusError {
        status: 404,
        body: "not found".to_string(),
    }
}

#[derive(Default)]
pub struct FakeSource {
    first_pages: HashMap<String, DeliveryPage>,
    next_pages: HashMap<String, DeliveryPage>,
    failing_scopes: HashMap<String, ErrorFactory>,
    details: HashMap<String, Delivery>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn with_first_page(mut self, scope_id: &str, page: DeliveryPage) -> Self {
        self.first_pages.insert(scope_id.to_string(), page);
        self
    }

    pub fn with_next_page(mut self, href: &str, page: DeliveryPage) -> Self {
        self.next_pages.insert(href.to_string(), page);
        self
    }

    pub fn with_page_error<F>(mut self, scope_id: &str, error: F) -> Self
    where
        F: Fn() -> MonitorError + Send + Sync + 'static,
    {
        self.failing_scopes
            .insert(scope_id.to_string(), Box::new(error));
        self
    }

    pub fn with_detail(mut self, delivery_id: &str, status: &str, last_known: Option<&str>) -> Self {
        let mut raw = serde_json::json!({"id": delivery_id, "status": status});
        if let Some(last_known) = last_known {
            raw["cancellation_details"] =
                serde_json::json!({"last_known_delivery_status": last_known});
        }
        let detail: Delivery = serde_json::from_value(raw).expect("valid detail fixture");
        self.details.insert(delivery_id.to_string(), detail);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn detail_requests(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with("detail:"))
            .count()
    }

    fn record(&self, request: String) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl DeliverySource for FakeSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<DeliveryPage> {
        match request {
            PageRequest::First { scope_id, .. } => {
                self.record(format!("first:{}", scope_id));
                if let Some(error) = self.failing_scopes.get(scope_id) {
                    return Err(error());
                }
                self.first_pages.get(scope_id).cloned().ok_or_else(not_found)
            }
            PageRequest::Next { url } => {
                self.record(format!("next:{}", url));
                self.next_pages.get(url).cloned().ok_or_else(not_found)
            }
        }
    }

    async fn fetch_detail(&self, scope_id: &str, delivery_id: &str) -> Result<Delivery> {
        self.record(format!("detail:{}/{}", scope_id, delivery_id));
        let mut detail = self.details.get(delivery_id).cloned().ok_or_else(not_found)?;
        detail.scope_id = scope_id.to_string();
        Ok(detail)
    }
}

/// Keeps every alert it receives; optionally fails each send.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub alerts: Arc<Mutex<Vec<Alert>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        if self.fail {
            return Err(MonitorError::MailError {
                message: "535 authentication failed".to_string(),
            });
        }
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "recording"
    }
}
