use crate::config::ApiConfig;
use crate::domain::model::{Delivery, DeliveryPage};
use crate::domain::ports::{DeliverySource, PageRequest};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

const ERROR_BODY_LIMIT: usize = 200;

/// Uber Direct deliveries API client.
pub struct UberDirectClient {
    client: Client,
    base_url: Url,
    token: String,
    page_limit: usize,
}

impl UberDirectClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        // 結尾補上 '/'，相對 next_href 才會接在版本路徑後面
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).map_err(|e| MonitorError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: config.base_url.clone(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
            page_limit: config.page_limit,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MonitorError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn deliveries_url(&self, scope_id: &str) -> Result<Url> {
        self.endpoint(&["customers", scope_id, "deliveries"])
    }

    fn detail_url(&self, scope_id: &str, delivery_id: &str) -> Result<Url> {
        self.endpoint(&["customers", scope_id, "deliveries", delivery_id])
    }

    fn resolve_next_href(&self, href: &str) -> Result<String> {
        match Url::parse(href) {
            Ok(url) => Ok(url.into()),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(href)
                .map(String::from)
                .map_err(|e| MonitorError::InvalidConfigValueError {
                    field: "next_href".to_string(),
                    value: href.to_string(),
                    reason: e.to_string(),
                }),
            Err(e) => Err(MonitorError::InvalidConfigValueError {
                field: "next_href".to_string(),
                value: href.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        context: &str,
    ) -> Result<T> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();
        tracing::debug!("API response status for {}: {}", context, status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(MonitorError::HttpStatusError {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| MonitorError::PayloadShapeError {
            context: context.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DeliverySource for UberDirectClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<DeliveryPage> {
        match request {
            PageRequest::First { scope_id, window } => {
                let url = self.deliveries_url(scope_id)?;
                tracing::debug!("Making API request to: {}", url);

                let limit = self.page_limit.to_string();
                let start_dt = window.start_dt();
                let end_dt = window.end_dt();
                let builder = self.client.get(url.clone()).query(&[
                    ("start_dt", start_dt.as_str()),
                    ("end_dt", end_dt.as_str()),
                    ("limit", limit.as_str()),
                ]);
                self.get_json(builder, url.as_str()).await
            }
            PageRequest::Next { url } => {
                // 後續分頁直接使用 next_href，不再帶查詢參數
                let url = self.resolve_next_href(url)?;
                tracing::debug!("Following next_href: {}", url);
                self.get_json(self.client.get(&url), &url).await
            }
        }
    }

    async fn fetch_detail(&self, scope_id: &str, delivery_id: &str) -> Result<Delivery> {
        let url = self.detail_url(scope_id, delivery_id)?;
        tracing::debug!("Fetching delivery detail: {}", url);

        let mut delivery: Delivery = self
            .get_json(self.client.get(url.clone()), url.as_str())
            .await?;
        delivery.scope_id = scope_id.to_string();
        Ok(delivery)
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let truncated: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    format!("{}...", truncated)
}
