use async_trait::async_trait;
use sqlx::PgPool;
use umoja_booking::models::{
    BookingAdmin, BookingPayload, BookingRecord, BookingStatus, CreateBookingOutcome,
    PaymentStatus, ReferenceSource, StoreResult,
};
use umoja_booking::submit::fallback_reference;
use umoja_booking::BookingWriter;
use umoja_shared::pii::Masked;
use uuid::Uuid;

/// Postgres-backed booking store. References are issued here, not by the
/// client: the insert retries once with a fresh reference on a unique
/// collision, then degrades to the client's fallback reference instead of
/// losing the customer.
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(
        &self,
        id: Uuid,
        reference: &str,
        source: ReferenceSource,
        payload: &BookingPayload,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO bookings
                (id, reference, reference_source, user_id, first_name, last_name, email, phone,
                 tour_id, event_id, travel_date, adults, children, total, deposit, balance,
                 status, payment_status, special_requests, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(id)
        .bind(reference)
        .bind(match source {
            ReferenceSource::Server => "SERVER",
            ReferenceSource::Fallback => "FALLBACK",
        })
        .bind(payload.user_id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.tour_id)
        .bind(&payload.event_id)
        .bind(&payload.travel_date)
        .bind(payload.adults as i32)
        .bind(payload.children as i32)
        .bind(payload.total)
        .bind(payload.deposit)
        .bind(payload.balance)
        .bind(payload.status.as_str())
        .bind(payload.payment_status.as_str())
        .bind(&payload.special_requests)
        .bind(payload.created_at)
        .execute(&self.pool)
        .await
        .map(|_| ())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[async_trait]
impl BookingWriter for PgBookingStore {
    async fn create_booking(&self, payload: &BookingPayload) -> StoreResult<CreateBookingOutcome> {
        let id = Uuid::new_v4();

        // Server-issued reference, one retry on collision.
        for _ in 0..2 {
            let reference = fallback_reference();
            match self.insert(id, &reference, ReferenceSource::Server, payload).await {
                Ok(()) => {
                    return Ok(CreateBookingOutcome {
                        id: id.to_string(),
                        booking_reference: reference,
                        error_details: None,
                    });
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::warn!(reference = %reference, "booking reference collision, reissuing");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Both server references collided. Degrade to the client fallback
        // reference so the customer still has a code to quote to support.
        match self
            .insert(id, &payload.reference, ReferenceSource::Fallback, payload)
            .await
        {
            Ok(()) => Ok(CreateBookingOutcome {
                id: "fallback".to_string(),
                booking_reference: payload.reference.clone(),
                error_details: Some("reference allocation conflicted; fallback reference recorded".to_string()),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    reference: String,
    reference_source: String,
    user_id: Option<Uuid>,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    tour_id: Option<String>,
    event_id: Option<String>,
    travel_date: String,
    adults: i32,
    children: i32,
    total: f64,
    deposit: f64,
    balance: f64,
    status: String,
    payment_status: String,
    special_requests: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl BookingRow {
    fn into_record(self) -> StoreResult<BookingRecord> {
        let status = BookingStatus::parse(&self.status)
            .ok_or_else(|| format!("unknown booking status: {}", self.status))?;
        let payment_status = PaymentStatus::parse(&self.payment_status)
            .ok_or_else(|| format!("unknown payment status: {}", self.payment_status))?;
        let reference_source = match self.reference_source.as_str() {
            "FALLBACK" => ReferenceSource::Fallback,
            _ => ReferenceSource::Server,
        };

        Ok(BookingRecord {
            id: self.id,
            reference: self.reference,
            reference_source,
            user_id: self.user_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: Masked(self.email),
            phone: Masked(self.phone),
            tour_id: self.tour_id,
            event_id: self.event_id,
            travel_date: self.travel_date,
            adults: self.adults.max(0) as u32,
            children: self.children.max(0) as u32,
            total: self.total,
            deposit: self.deposit,
            balance: self.balance,
            status,
            payment_status,
            special_requests: self.special_requests,
            created_at: self.created_at,
        })
    }
}

const BOOKING_COLUMNS: &str = "id, reference, reference_source, user_id, first_name, last_name, \
    email, phone, tour_id, event_id, travel_date, adults, children, total, deposit, balance, \
    status, payment_status, special_requests, created_at";

#[async_trait]
impl BookingAdmin for PgBookingStore {
    async fn get_by_reference(&self, reference: &str) -> StoreResult<Option<BookingRecord>> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings WHERE reference = $1",
            BOOKING_COLUMNS
        ))
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_record).transpose()
    }

    async fn list_bookings(&self) -> StoreResult<Vec<BookingRecord>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM bookings ORDER BY created_at DESC LIMIT 200",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_record).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $1, payment_status = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
