use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingCreatedEvent {
    pub booking_id: Uuid,
    pub reference: String,
    pub customer_id: Option<Uuid>,
    pub item_id: String,
    pub total: f64,
    pub timestamp: i64,
}

/// Emitted when a write came back non-authoritative but a reference was
/// still handed to the customer. Back office reconciles these.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct BookingDegradedEvent {
    pub reference: String,
    pub detail: String,
    pub timestamp: i64,
}
