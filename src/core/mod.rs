pub mod aggregate;
pub mod alerts;
pub mod engine;
pub mod fetcher;
pub mod report;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{Alert, DayWindow, Delivery, DeliveryStatus, StoreCount};
pub use crate::domain::ports::{DeliverySource, Notifier, PageRequest, Storage};
pub use crate::utils::error::Result;
