use crate::core::aggregate::StoreCounter;
use crate::domain::model::{DayWindow, StoreCount};
use crate::domain::ports::Storage;
use crate::domain::stores::StoreDirectory;
use crate::utils::error::{MonitorError, Result};

const HEADER: [&str; 4] = ["store_id", "store_name", "deliveries", "early_cancellations"];

pub fn report_filename(window: DayWindow) -> String {
    format!("store_summary_{}.csv", window)
}

/// One row per store seen in the day's deliveries, aggregates only.
pub fn render_store_summary(
    volume: &StoreCounter,
    early_cancellations: &[StoreCount],
    stores: &StoreDirectory,
) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for store in volume.iter() {
        let early = early_cancellations
            .iter()
            .find(|c| c.store_id == store.store_id)
            .map(|c| c.count)
            .unwrap_or(0);
        let deliveries = store.count.to_string();
        let early = early.to_string();

        writer.write_record([
            store.store_id.as_str(),
            stores.name(&store.store_id),
            deliveries.as_str(),
            early.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| MonitorError::IoError(e.into_error()))
}

pub async fn write_store_summary<S: Storage>(
    storage: &S,
    window: DayWindow,
    volume: &StoreCounter,
    early_cancellations: &[StoreCount],
    stores: &StoreDirectory,
) -> Result<String> {
    let data = render_store_summary(volume, early_cancellations, stores)?;
    let path = storage.write_file(&report_filename(window), &data).await?;
    tracing::info!("💾 Daily summary saved: {}", path);
    Ok(path)
}
