use crate::adapters::storage::LocalStorage;
use crate::config::MonitorConfig;
use crate::core::aggregate::{analyze_overuse, check_early_cancellations, count_by_store};
use crate::core::alerts::{early_cancellation_alert, overuse_alert};
use crate::core::fetcher::fetch_deliveries;
use crate::core::report::write_store_summary;
use crate::domain::model::{Alert, DayWindow, StoreCount};
use crate::domain::ports::{DeliverySource, Notifier, Storage};
use crate::domain::stores::StoreDirectory;
use serde::Serialize;

/// Outcome of one daily run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub date: String,
    pub fetched: usize,
    pub overuse: Vec<StoreCount>,
    pub early_cancellations: Vec<StoreCount>,
    pub alerts_sent: usize,
    pub report_path: Option<String>,
}

impl RunSummary {
    fn empty(window: DayWindow) -> Self {
        Self {
            date: window.to_string(),
            fetched: 0,
            overuse: Vec::new(),
            early_cancellations: Vec::new(),
            alerts_sent: 0,
            report_path: None,
        }
    }

    pub fn has_incidents(&self) -> bool {
        !self.overuse.is_empty() || !self.early_cancellations.is_empty()
    }
}

/// fetch → aggregate → notify, one stage after another.
pub struct MonitorEngine<S: DeliverySource, R: Storage = LocalStorage> {
    source: S,
    notifier: Box<dyn Notifier>,
    stores: StoreDirectory,
    scope_ids: Vec<String>,
    report_storage: Option<R>,
}

impl<S: DeliverySource> MonitorEngine<S> {
    pub fn new(
        source: S,
        notifier: Box<dyn Notifier>,
        stores: StoreDirectory,
        scope_ids: Vec<String>,
    ) -> Self {
        Self {
            source,
            notifier,
            stores,
            scope_ids,
            report_storage: None,
        }
    }

    /// Uses the configured scopes and store names; adds a local report when a directory is set.
    pub fn from_config(source: S, notifier: Box<dyn Notifier>, config: &MonitorConfig) -> Self {
        let engine = Self::new(
            source,
            notifier,
            config.stores.clone(),
            config.api.scope_ids.clone(),
        );
        match &config.report_dir {
            Some(dir) => engine.with_report_storage(LocalStorage::new(dir.clone())),
            None => engine,
        }
    }
}

impl<S: DeliverySource, R: Storage> MonitorEngine<S, R> {
    pub fn with_report_storage<R2: Storage>(self, storage: R2) -> MonitorEngine<S, R2> {
        MonitorEngine {
            source: self.source,
            notifier: self.notifier,
            stores: self.stores,
            scope_ids: self.scope_ids,
            report_storage: Some(storage),
        }
    }

    pub async fn run(&self, window: DayWindow) -> RunSummary {
        tracing::info!(
            "🚀 Starting Uber Direct monitor for {} ({} scopes, alerts via {})",
            window,
            self.scope_ids.len(),
            self.notifier.describe()
        );

        // Fetch
        let deliveries = fetch_deliveries(&self.source, &self.scope_ids, window).await;
        if deliveries.is_empty() {
            tracing::info!("📭 No data fetched - check token/customer ids.");
            tracing::info!("✅ Daily check complete: No incidents.");
            return RunSummary::empty(window);
        }

        // Aggregate
        let volume = count_by_store(&deliveries);
        let overuse = analyze_overuse(&deliveries);
        tracing::info!("📊 {} stores at or above the overuse threshold", overuse.len());

        let early_cancellations = check_early_cancellations(&self.source, &deliveries).await;
        tracing::info!(
            "📊 {} stores with early cancellations",
            early_cancellations.len()
        );

        let report_path = match &self.report_storage {
            Some(storage) => match write_store_summary(
                storage,
                window,
                &volume,
                &early_cancellations,
                &self.stores,
            )
            .await
            {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::error!("❌ {}", e.user_friendly_message());
                    None
                }
            },
            None => None,
        };

        // Notify
        let mut alerts_sent = 0;
        let alerts = [
            overuse_alert(&overuse, &self.stores, window),
            early_cancellation_alert(&early_cancellations, &self.stores, window),
        ];
        for alert in alerts.iter().flatten() {
            if self.dispatch(alert).await {
                alerts_sent += 1;
            }
        }

        let summary = RunSummary {
            date: window.to_string(),
            fetched: deliveries.len(),
            overuse,
            early_cancellations,
            alerts_sent,
            report_path,
        };

        if summary.has_incidents() {
            tracing::info!("🚨 Alerts sent for incidents ({} delivered).", alerts_sent);
        } else {
            tracing::info!("✅ Daily check complete: No incidents.");
        }
        summary
    }

    /// Notification failures never fail the run.
    async fn dispatch(&self, alert: &Alert) -> bool {
        match self.notifier.notify(alert).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("❌ Email failed for '{}': {}", alert.subject, e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                false
            }
        }
    }
}
