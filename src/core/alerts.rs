use crate::core::aggregate::OVERUSE_THRESHOLD;
use crate::domain::model::{Alert, DayWindow, StoreCount};
use crate::domain::stores::StoreDirectory;

pub const OVERUSE_SUBJECT: &str = "🚨 Uber Direct Overuse Alert";
pub const EARLY_CANCELLATION_SUBJECT: &str = "🚨 Uber Direct Early Cancellation Alert";

fn store_lines(counts: &[StoreCount], stores: &StoreDirectory) -> String {
    counts
        .iter()
        .map(|store| format!("{} ({}x)", stores.name(&store.store_id), store.count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `None` when no store crossed the threshold.
pub fn overuse_alert(
    counts: &[StoreCount],
    stores: &StoreDirectory,
    window: DayWindow,
) -> Option<Alert> {
    if counts.is_empty() {
        return None;
    }

    Some(Alert {
        subject: OVERUSE_SUBJECT.to_string(),
        body: format!(
            "Stores overusing Uber Direct (≥{} deliveries) on {}:\n\n{}\n\nAction needed: Review and limit if necessary.",
            OVERUSE_THRESHOLD,
            window,
            store_lines(counts, stores)
        ),
    })
}

pub fn early_cancellation_alert(
    counts: &[StoreCount],
    stores: &StoreDirectory,
    window: DayWindow,
) -> Option<Alert> {
    if counts.is_empty() {
        return None;
    }

    Some(Alert {
        subject: EARLY_CANCELLATION_SUBJECT.to_string(),
        body: format!(
            "Stores with early cancellations (before driver arrival) on {}:\n\n{}\n\nAction needed: Train staff on proper usage.",
            window,
            store_lines(counts, stores)
        ),
    })
}
