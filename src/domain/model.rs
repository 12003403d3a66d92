use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Uber Direct 配送狀態。API 大小寫與分隔符號不一致，統一在這裡正規化
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryStatus {
    Pending,
    Scheduled,
    EnRouteToPickup,
    Pickup,
    PickupComplete,
    EnRouteToDropoff,
    Dropoff,
    Delivered,
    Completed,
    Canceled,
    Failed,
    Returned,
    Other(String),
}

impl DeliveryStatus {
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "pending" => DeliveryStatus::Pending,
            "scheduled" => DeliveryStatus::Scheduled,
            "en_route_to_pickup" => DeliveryStatus::EnRouteToPickup,
            "pickup" => DeliveryStatus::Pickup,
            "pickup_complete" => DeliveryStatus::PickupComplete,
            "en_route_to_dropoff" => DeliveryStatus::EnRouteToDropoff,
            "dropoff" => DeliveryStatus::Dropoff,
            "delivered" => DeliveryStatus::Delivered,
            "completed" => DeliveryStatus::Completed,
            "canceled" | "cancelled" => DeliveryStatus::Canceled,
            "failed" => DeliveryStatus::Failed,
            "returned" => DeliveryStatus::Returned,
            _ => DeliveryStatus::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Scheduled => "scheduled",
            DeliveryStatus::EnRouteToPickup => "en_route_to_pickup",
            DeliveryStatus::Pickup => "pickup",
            DeliveryStatus::PickupComplete => "pickup_complete",
            DeliveryStatus::EnRouteToDropoff => "en_route_to_dropoff",
            DeliveryStatus::Dropoff => "dropoff",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Completed => "completed",
            DeliveryStatus::Canceled => "canceled",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Returned => "returned",
            DeliveryStatus::Other(raw) => raw.as_str(),
        }
    }

    /// Canceled or failed deliveries are candidates for the early-cancellation check.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DeliveryStatus::Canceled | DeliveryStatus::Failed)
    }

    /// True for states before the courier reached the pickup point.
    pub fn is_before_pickup(&self) -> bool {
        matches!(
            self,
            DeliveryStatus::Scheduled | DeliveryStatus::EnRouteToPickup
        )
    }
}

impl From<String> for DeliveryStatus {
    fn from(raw: String) -> Self {
        DeliveryStatus::parse(&raw)
    }
}

impl From<DeliveryStatus> for String {
    fn from(status: DeliveryStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationDetails {
    #[serde(default)]
    pub last_known_delivery_status: Option<DeliveryStatus>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// 配送記錄。列表端點與明細端點回傳相同結構，明細才會帶 cancellation_details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    #[serde(default)]
    pub id: Option<String>,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub external_store_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub cancellation_details: Option<CancellationDetails>,
    /// Scope the record was fetched under; the payload does not carry it.
    #[serde(skip_deserializing)]
    pub scope_id: String,
}

impl Delivery {
    /// Owning store: `external_store_id` when present, otherwise the fetch scope.
    pub fn store_id(&self) -> &str {
        match self.external_store_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => self.scope_id.as_str(),
        }
    }

    pub fn event_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.created.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn last_known_status(&self) -> Option<&DeliveryStatus> {
        self.cancellation_details
            .as_ref()
            .and_then(|details| details.last_known_delivery_status.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryPage {
    #[serde(alias = "deliveries")]
    pub data: Vec<Delivery>,
    #[serde(default)]
    pub next_href: Option<String>,
}

impl DeliveryPage {
    pub fn next_url(&self) -> Option<&str> {
        self.next_href
            .as_deref()
            .map(str::trim)
            .filter(|href| !href.is_empty())
    }
}

/// 查詢用的 UTC 日曆日 (00:00:00Z - 23:59:59Z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayWindow {
    date: NaiveDate,
}

impl DayWindow {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn previous_utc_day(now: DateTime<Utc>) -> Self {
        Self::new(now.date_naive() - chrono::Duration::days(1))
    }

    pub fn yesterday() -> Self {
        Self::previous_utc_day(Utc::now())
    }

    pub fn start_dt(&self) -> String {
        format!("{}T00:00:00Z", self.date.format("%Y-%m-%d"))
    }

    pub fn end_dt(&self) -> String {
        format!("{}T23:59:59Z", self.date.format("%Y-%m-%d"))
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp.date_naive() == self.date
    }
}

impl fmt::Display for DayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreCount {
    pub store_id: String,
    pub count: usize,
}

impl StoreCount {
    pub fn new(store_id: impl Into<String>, count: usize) -> Self {
        Self {
            store_id: store_id.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub subject: String,
    pub body: String,
}
