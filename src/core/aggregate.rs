use crate::domain::model::{Delivery, StoreCount};
use crate::domain::ports::DeliverySource;
use std::collections::HashMap;

/// Daily delivery count at which a store is flagged for overuse.
pub const OVERUSE_THRESHOLD: usize = 3;

/// Per-store counter that remembers first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCounter {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

impl StoreCounter {
    pub fn increment(&mut self, store_id: &str) {
        if let Some(count) = self.counts.get_mut(store_id) {
            *count += 1;
            return;
        }
        self.order.push(store_id.to_string());
        self.counts.insert(store_id.to_string(), 1);
    }

    pub fn get(&self, store_id: &str) -> usize {
        self.counts.get(store_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StoreCount> + '_ {
        self.order
            .iter()
            .map(|store_id| StoreCount::new(store_id.clone(), self.get(store_id)))
    }
}

pub fn count_by_store(deliveries: &[Delivery]) -> StoreCounter {
    let mut counter = StoreCounter::default();
    for delivery in deliveries {
        let store_id = delivery.store_id();
        if store_id.is_empty() {
            tracing::debug!("Delivery {:?} has no store id, not counted", delivery.id);
            continue;
        }
        counter.increment(store_id);
    }
    counter
}

/// Stores with at least [`OVERUSE_THRESHOLD`] deliveries, in first-occurrence order.
pub fn analyze_overuse(deliveries: &[Delivery]) -> Vec<StoreCount> {
    count_by_store(deliveries)
        .iter()
        .filter(|store| store.count >= OVERUSE_THRESHOLD)
        .collect()
}

/// Counts canceled/failed deliveries whose last known state was before pickup.
///
/// One detail request per candidate, strictly sequential. A failed request
/// only drops that record.
pub async fn check_early_cancellations<S: DeliverySource + ?Sized>(
    source: &S,
    deliveries: &[Delivery],
) -> Vec<StoreCount> {
    let mut early_cancels = StoreCounter::default();

    for delivery in deliveries.iter().filter(|d| d.status.is_cancellation()) {
        let Some(delivery_id) = delivery.id.as_deref() else {
            tracing::warn!(
                "⚠️ {} delivery for store {} has no id, skipping detail check",
                delivery.status,
                delivery.store_id()
            );
            continue;
        };

        let detail = match source.fetch_detail(&delivery.scope_id, delivery_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!("⚠️ Detail fetch error for {}: {}", delivery_id, e);
                continue;
            }
        };

        match detail.last_known_status() {
            Some(status) if status.is_before_pickup() => {
                tracing::debug!(
                    "Early cancellation: {} at store {} (last status {})",
                    delivery_id,
                    delivery.store_id(),
                    status
                );
                early_cancels.increment(delivery.store_id());
            }
            other => {
                tracing::debug!(
                    "Delivery {} canceled after pickup stage ({:?})",
                    delivery_id,
                    other
                );
            }
        }
    }

    early_cancels.iter().filter(|store| store.count > 0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{delivery, FakeSource};

    #[test]
    fn test_overuse_scenario() {
        let mut deliveries = Vec::new();
        for i in 0..4 {
            deliveries.push(delivery(&format!("a{}", i), "completed", "store-a"));
        }
        for i in 0..2 {
            deliveries.push(delivery(&format!("b{}", i), "completed", "store-b"));
        }

        assert_eq!(analyze_overuse(&deliveries), vec![StoreCount::new("store-a", 4)]);
    }

    #[test]
    fn test_overuse_threshold_is_inclusive() {
        let deliveries: Vec<_> = (0..3)
            .map(|i| delivery(&format!("d{}", i), "delivered", "store-x"))
            .collect();
        assert_eq!(analyze_overuse(&deliveries), vec![StoreCount::new("store-x", 3)]);
        assert!(analyze_overuse(&deliveries[..2]).is_empty());
    }

    #[test]
    fn test_overuse_keeps_first_occurrence_order() {
        let deliveries = vec![
            delivery("1", "delivered", "zeta"),
            delivery("2", "delivered", "alpha"),
            delivery("3", "delivered", "zeta"),
            delivery("4", "delivered", "alpha"),
            delivery("5", "delivered", "zeta"),
            delivery("6", "delivered", "alpha"),
            delivery("7", "delivered", "alpha"),
        ];

        assert_eq!(
            analyze_overuse(&deliveries),
            vec![StoreCount::new("zeta", 3), StoreCount::new("alpha", 4)]
        );
    }

    #[test]
    fn test_overuse_is_idempotent() {
        let deliveries: Vec<_> = (0..5)
            .map(|i| delivery(&format!("d{}", i), "delivered", if i % 2 == 0 { "a" } else { "b" }))
            .collect();
        assert_eq!(analyze_overuse(&deliveries), analyze_overuse(&deliveries));
    }

    #[test]
    fn test_empty_input_has_no_overuse() {
        assert!(analyze_overuse(&[]).is_empty());
        assert!(count_by_store(&[]).is_empty());
    }

    #[test]
    fn test_store_counter_counts() {
        let mut counter = StoreCounter::default();
        counter.increment("a");
        counter.increment("b");
        counter.increment("a");

        assert_eq!(counter.get("a"), 2);
        assert_eq!(counter.get("b"), 1);
        assert_eq!(counter.get("c"), 0);
    }

    #[tokio::test]
    async fn test_en_route_cancellation_counts_once() {
        let source = FakeSource::default().with_detail("c1", "canceled", Some("en route to pickup"));
        let deliveries = vec![delivery("c1", "canceled", "store-a")];

        let result = check_early_cancellations(&source, &deliveries).await;
        assert_eq!(result, vec![StoreCount::new("store-a", 1)]);
    }

    #[tokio::test]
    async fn test_late_cancellation_is_ignored() {
        let source = FakeSource::default()
            .with_detail("c1", "canceled", Some("completed"))
            .with_detail("c2", "canceled", Some("PICKUP_COMPLETE"))
            .with_detail("c3", "canceled", None);
        let deliveries = vec![
            delivery("c1", "canceled", "store-a"),
            delivery("c2", "canceled", "store-a"),
            delivery("c3", "canceled", "store-a"),
        ];

        assert!(check_early_cancellations(&source, &deliveries).await.is_empty());
    }

    #[tokio::test]
    async fn test_only_canceled_or_failed_records_are_checked() {
        let source = FakeSource::default()
            .with_detail("f1", "failed", Some("SCHEDULED"))
            .with_detail("ok", "delivered", Some("SCHEDULED"));
        let deliveries = vec![
            delivery("f1", "failed", "store-b"),
            delivery("ok", "delivered", "store-b"),
        ];

        let result = check_early_cancellations(&source, &deliveries).await;

        assert_eq!(result, vec![StoreCount::new("store-b", 1)]);
        assert_eq!(source.detail_requests(), 1);
    }

    #[tokio::test]
    async fn test_detail_failure_skips_only_that_record() {
        let source = FakeSource::default()
            .with_detail("c2", "canceled", Some("SCHEDULED"))
            .with_detail("c3", "canceled", Some("SCHEDULED"));
        let deliveries = vec![
            delivery("missing", "canceled", "store-a"),
            delivery("c2", "canceled", "store-a"),
            delivery("c3", "canceled", "store-b"),
        ];

        let result = check_early_cancellations(&source, &deliveries).await;

        assert_eq!(
            result,
            vec![StoreCount::new("store-a", 1), StoreCount::new("store-b", 1)]
        );
        assert_eq!(source.detail_requests(), 3);
    }

    #[tokio::test]
    async fn test_cancellation_without_id_is_skipped() {
        let source = FakeSource::default();
        let mut record = delivery("x", "canceled", "store-a");
        record.id = None;

        assert!(check_early_cancellations(&source, &[record]).await.is_empty());
        assert_eq!(source.detail_requests(), 0);
    }
}
