use crate::models::{
    BookingAdmin, BookingPayload, BookingRecord, BookingStatus, BookingWriter,
    CreateBookingOutcome, PaymentStatus, ReferenceSource, StoreResult,
};
use crate::submit::fallback_reference;
use async_trait::async_trait;
use umoja_shared::pii::Masked;
use std::sync::Mutex;
use uuid::Uuid;

/// Attempts at a unique server-issued reference before degrading to the
/// client's fallback reference. The 4-digit space only holds 10,000
/// codes, so the loop must terminate even when the space is full.
const MAX_REFERENCE_ATTEMPTS: usize = 32;

/// In-memory booking store: the configured backend when no database is
/// available, and the test double for the wizard and API.
pub struct MemoryBookingStore {
    records: Mutex<Vec<BookingRecord>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    fn record_from(id: Uuid, reference: &str, source: ReferenceSource, payload: &BookingPayload) -> BookingRecord {
        BookingRecord {
            id,
            reference: reference.to_string(),
            reference_source: source,
            user_id: payload.user_id,
            first_name: payload.first_name.clone(),
            last_name: payload.last_name.clone(),
            email: Masked(payload.email.clone()),
            phone: Masked(payload.phone.clone()),
            tour_id: payload.tour_id.clone(),
            event_id: payload.event_id.clone(),
            travel_date: payload.travel_date.clone(),
            adults: payload.adults,
            children: payload.children,
            total: payload.total,
            deposit: payload.deposit,
            balance: payload.balance,
            status: payload.status,
            payment_status: payload.payment_status,
            special_requests: payload.special_requests.clone(),
            created_at: payload.created_at,
        }
    }
}

impl Default for MemoryBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingWriter for MemoryBookingStore {
    async fn create_booking(&self, payload: &BookingPayload) -> StoreResult<CreateBookingOutcome> {
        let mut records = self.records.lock().expect("booking store lock poisoned");
        let id = Uuid::new_v4();

        // Server-issued reference, bounded collide-and-regenerate.
        for _ in 0..MAX_REFERENCE_ATTEMPTS {
            let candidate = fallback_reference();
            if records.iter().any(|r| r.reference == candidate) {
                continue;
            }
            records.push(Self::record_from(id, &candidate, ReferenceSource::Server, payload));
            return Ok(CreateBookingOutcome {
                id: id.to_string(),
                booking_reference: candidate,
                error_details: None,
            });
        }

        // The reference space is full or nearly full. Fall back to the
        // client's reference, mirroring the Postgres writer's degraded
        // path; a taken client reference is a hard failure.
        if records.iter().any(|r| r.reference == payload.reference) {
            return Err("booking reference space exhausted".into());
        }
        tracing::warn!(reference = %payload.reference, "server reference allocation failed, recording client fallback");
        records.push(Self::record_from(id, &payload.reference, ReferenceSource::Fallback, payload));
        Ok(CreateBookingOutcome {
            id: "fallback".to_string(),
            booking_reference: payload.reference.clone(),
            error_details: Some("reference allocation conflicted; fallback reference recorded".to_string()),
        })
    }
}

#[async_trait]
impl BookingAdmin for MemoryBookingStore {
    async fn get_by_reference(&self, reference: &str) -> StoreResult<Option<BookingRecord>> {
        let records = self.records.lock().expect("booking store lock poisoned");
        Ok(records.iter().find(|r| r.reference == reference).cloned())
    }

    async fn list_bookings(&self) -> StoreResult<Vec<BookingRecord>> {
        let records = self.records.lock().expect("booking store lock poisoned");
        let mut all = records.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> StoreResult<bool> {
        let mut records = self.records.lock().expect("booking store lock poisoned");
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                record.payment_status = payment_status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn payload() -> BookingPayload {
        BookingPayload {
            reference: "UE-9999".to_string(),
            user_id: None,
            first_name: "Asha".to_string(),
            last_name: "Mrema".to_string(),
            email: "asha@example.com".to_string(),
            phone: String::new(),
            tour_id: Some("hiking-001".to_string()),
            event_id: None,
            travel_date: "2026-09-15".to_string(),
            adults: 2,
            children: 0,
            total: 498.0,
            deposit: 99.6,
            balance: 398.4,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_requests: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_then_lookup_by_reference() {
        let store = MemoryBookingStore::new();
        let outcome = store.create_booking(&payload()).await.unwrap();

        assert!(outcome.is_authoritative());
        let record = store
            .get_by_reference(&outcome.booking_reference)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.email.0, "asha@example.com");
        assert_eq!(record.reference_source, ReferenceSource::Server);
        assert_eq!(record.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn issued_references_are_unique() {
        let store = MemoryBookingStore::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..40 {
            let outcome = store.create_booking(&payload()).await.unwrap();
            assert!(seen.insert(outcome.booking_reference));
        }
    }

    #[tokio::test]
    async fn full_reference_space_degrades_instead_of_spinning() {
        let store = MemoryBookingStore::new();
        {
            let mut records = store.records.lock().unwrap();
            let base = payload();
            records.extend((0..10_000).map(|n| {
                MemoryBookingStore::record_from(
                    Uuid::new_v4(),
                    &format!("UE-{:04}", n),
                    ReferenceSource::Server,
                    &base,
                )
            }));
        }

        let mut request = payload();
        request.reference = "UE-OVERFLOW-1".to_string();

        let outcome = store.create_booking(&request).await.unwrap();
        assert_eq!(outcome.id, "fallback");
        assert!(!outcome.is_authoritative());
        assert_eq!(outcome.booking_reference, "UE-OVERFLOW-1");
        assert!(outcome.error_details.is_some());

        let record = store
            .get_by_reference("UE-OVERFLOW-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.reference_source, ReferenceSource::Fallback);

        // Same client reference again: nothing left to issue at all
        assert!(store.create_booking(&request).await.is_err());
    }

    #[tokio::test]
    async fn admin_status_update_targets_one_record() {
        let store = MemoryBookingStore::new();
        let outcome = store.create_booking(&payload()).await.unwrap();
        let id = Uuid::parse_str(&outcome.id).unwrap();

        assert!(store
            .update_status(id, BookingStatus::Confirmed, PaymentStatus::Deposit)
            .await
            .unwrap());

        let record = store
            .get_by_reference(&outcome.booking_reference)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, BookingStatus::Confirmed);
        assert_eq!(record.payment_status, PaymentStatus::Deposit);

        assert!(!store
            .update_status(Uuid::new_v4(), BookingStatus::Cancelled, PaymentStatus::Refunded)
            .await
            .unwrap());
    }
}
