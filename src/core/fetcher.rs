use crate::domain::model::{DayWindow, Delivery};
use crate::domain::ports::{DeliverySource, PageRequest};
use crate::utils::error::Result;
use std::collections::HashSet;

/// Lazy page-by-page view over one scope's deliveries for a day window.
///
/// Nothing is requested until [`DeliveryPages::next_page`] is awaited; after
/// the last page (or an error) the pager is exhausted until [`DeliveryPages::restart`].
/// Records are never filtered here; the server's `start_dt`/`end_dt` filter is trusted.
pub struct DeliveryPages<'a, S: DeliverySource + ?Sized> {
    source: &'a S,
    scope_id: String,
    window: DayWindow,
    next: Option<PageRequest>,
    visited_hrefs: HashSet<String>,
    pages_fetched: usize,
}

impl<'a, S: DeliverySource + ?Sized> DeliveryPages<'a, S> {
    pub fn new(source: &'a S, scope_id: impl Into<String>, window: DayWindow) -> Self {
        let scope_id = scope_id.into();
        Self {
            source,
            next: Some(PageRequest::First {
                scope_id: scope_id.clone(),
                window,
            }),
            scope_id,
            window,
            visited_hrefs: HashSet::new(),
            pages_fetched: 0,
        }
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn restart(&mut self) {
        self.next = Some(PageRequest::First {
            scope_id: self.scope_id.clone(),
            window: self.window,
        });
        self.visited_hrefs.clear();
        self.pages_fetched = 0;
    }

    /// `None` once exhausted. Records come back tagged with the scope id.
    pub async fn next_page(&mut self) -> Option<Result<Vec<Delivery>>> {
        let request = self.next.take()?;

        let page = match self.source.fetch_page(&request).await {
            Ok(page) => page,
            Err(e) => return Some(Err(e)),
        };
        self.pages_fetched += 1;

        self.next = match page.next_url() {
            Some(href) if self.visited_hrefs.contains(href) => {
                tracing::warn!(
                    "⚠️ Scope {}: next_href already visited ({}), stopping pagination",
                    self.scope_id,
                    href
                );
                None
            }
            Some(href) => {
                self.visited_hrefs.insert(href.to_string());
                Some(PageRequest::Next {
                    url: href.to_string(),
                })
            }
            None => None,
        };

        let deliveries = page
            .data
            .into_iter()
            .map(|mut delivery| {
                delivery.scope_id = self.scope_id.clone();
                delivery
            })
            .inspect(|delivery| self.flag_out_of_window(delivery))
            .collect();

        Some(Ok(deliveries))
    }

    /// Drains the remaining pages; any page error discards the whole scope.
    pub async fn collect_all(&mut self) -> Result<Vec<Delivery>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await {
            let deliveries = page?;
            tracing::debug!(
                "📦 Scope {}: fetched batch of {} deliveries",
                self.scope_id,
                deliveries.len()
            );
            all.extend(deliveries);
        }
        Ok(all)
    }

    fn flag_out_of_window(&self, delivery: &Delivery) {
        if let Some(ts) = delivery.event_time() {
            if !self.window.contains(ts) {
                tracing::warn!(
                    "⚠️ Scope {}: delivery {:?} created at {} is outside {}, counting it anyway",
                    self.scope_id,
                    delivery.id,
                    ts,
                    self.window
                );
            }
        }
    }
}

/// Fetches every scope in turn. A failing scope is logged and skipped.
pub async fn fetch_deliveries<S: DeliverySource + ?Sized>(
    source: &S,
    scope_ids: &[String],
    window: DayWindow,
) -> Vec<Delivery> {
    let mut all_deliveries = Vec::new();

    for scope_id in scope_ids {
        let mut pages = DeliveryPages::new(source, scope_id.as_str(), window);
        match pages.collect_all().await {
            Ok(deliveries) => {
                tracing::info!(
                    "📡 Fetched {} deliveries for scope {} on {} ({} pages)",
                    deliveries.len(),
                    scope_id,
                    window,
                    pages.pages_fetched()
                );
                all_deliveries.extend(deliveries);
            }
            Err(e) => {
                tracing::error!("❌ API error for scope {}: {}", scope_id, e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
    }

    tracing::info!(
        "📊 Total fetched: {} deliveries across {} scopes for {}",
        all_deliveries.len(),
        scope_ids.len(),
        window
    );
    all_deliveries
}
