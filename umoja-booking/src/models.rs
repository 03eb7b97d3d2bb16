use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use umoja_shared::pii::Masked;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Deposit,
    Paid,
    Refunded,
}

/// Where the customer-facing reference came from. Server-issued
/// references are authoritative; a fallback reference means the write was
/// degraded and the record needs back-office reconciliation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceSource {
    Server,
    Fallback,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(BookingStatus::Pending),
            "CONFIRMED" => Some(BookingStatus::Confirmed),
            "CANCELLED" => Some(BookingStatus::Cancelled),
            "COMPLETED" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Deposit => "DEPOSIT",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(PaymentStatus::Pending),
            "DEPOSIT" => Some(PaymentStatus::Deposit),
            "PAID" => Some(PaymentStatus::Paid),
            "REFUNDED" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// The payload the submitter hands to the write interface. Exactly one of
/// `tour_id` / `event_id` is set, matching the draft's booking type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPayload {
    /// Client-side fallback reference, used only if the write path does
    /// not issue its own.
    pub reference: String,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub tour_id: Option<String>,
    pub event_id: Option<String>,
    pub travel_date: String,
    pub adults: u32,
    pub children: u32,
    pub total: f64,
    pub deposit: f64,
    pub balance: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BookingPayload {
    pub fn item_id(&self) -> &str {
        self.tour_id
            .as_deref()
            .or(self.event_id.as_deref())
            .unwrap_or("")
    }
}

/// Result of `create_booking`. An `id` of `pending`, `fallback` or
/// `error` is non-authoritative: the reference was issued but the write
/// is not known to have landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingOutcome {
    pub id: String,
    pub booking_reference: String,
    pub error_details: Option<String>,
}

impl CreateBookingOutcome {
    pub fn is_authoritative(&self) -> bool {
        !self.id.is_empty() && !matches!(self.id.as_str(), "pending" | "fallback" | "error")
    }
}

/// Created once at submission, immutable from the wizard's point of view.
/// Status changes happen through the admin surface only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub id: Uuid,
    pub reference: String,
    pub reference_source: ReferenceSource,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    /// Masked in Debug/log output; serializes as the plain value
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub tour_id: Option<String>,
    pub event_id: Option<String>,
    pub travel_date: String,
    pub adults: u32,
    pub children: u32,
    pub total: f64,
    pub deposit: f64,
    pub balance: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The external booking write interface the wizard consumes. One call per
/// submission, no automatic retry; the customer is the retry trigger.
#[async_trait]
pub trait BookingWriter: Send + Sync {
    async fn create_booking(&self, payload: &BookingPayload) -> StoreResult<CreateBookingOutcome>;
}

/// Back-office read/update surface over persisted bookings.
#[async_trait]
pub trait BookingAdmin: Send + Sync {
    async fn get_by_reference(&self, reference: &str) -> StoreResult<Option<BookingRecord>>;

    async fn list_bookings(&self) -> StoreResult<Vec<BookingRecord>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_ids_are_not_authoritative() {
        for id in ["pending", "fallback", "error", ""] {
            let outcome = CreateBookingOutcome {
                id: id.to_string(),
                booking_reference: "UE-0001".to_string(),
                error_details: None,
            };
            assert!(!outcome.is_authoritative(), "id {:?}", id);
        }

        let real = CreateBookingOutcome {
            id: Uuid::new_v4().to_string(),
            booking_reference: "UE-0001".to_string(),
            error_details: None,
        };
        assert!(real.is_authoritative());
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("NOPE"), None);
    }
}
