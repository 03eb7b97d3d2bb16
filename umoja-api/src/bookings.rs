use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use umoja_booking::draft::{BookingDraft, BookingType};
use umoja_booking::models::{BookingRecord, CreateBookingOutcome};
use umoja_booking::steps::Step;
use umoja_booking::submit::build_payload;
use umoja_booking::validate::validate_step;
use umoja_catalog::ItemKind;
use umoja_shared::models::events::{BookingCreatedEvent, BookingDegradedEvent};
use uuid::Uuid;

use crate::middleware::auth::user_from_token;
use crate::state::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub booking_type: BookingType,
    pub item_id: String,
    pub date: String,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub special_requests: String,
    pub agree_to_terms: bool,
    /// Client-side fallback reference; kept only for the degraded path.
    pub reference: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking))
        .route("/v1/bookings/{reference}", get(get_booking))
}

/// POST /v1/bookings
/// The booking write interface the wizard consumes:
/// `createBooking(payload) → { id, booking_reference, error_details? }`.
async fn create_booking(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingOutcome>), AppError> {
    // 1. Optional identity context; anonymous is fine
    let user = bearer
        .as_ref()
        .and_then(|TypedHeader(Authorization(b))| user_from_token(b.token(), &state.auth.secret));

    // 2. Re-run the wizard's own validators server-side; never trust the
    //    form that rendered in someone else's browser
    let mut draft = BookingDraft::default();
    draft.set_booking_type(req.booking_type);
    draft.select_item(req.item_id.clone());
    draft.set_date(req.date.clone());
    draft.set_party(req.adults, req.children);
    draft.set_contact(
        req.first_name.clone(),
        req.last_name.clone(),
        req.email.clone(),
        req.phone.clone(),
    );
    draft.set_special_requests(req.special_requests.clone());
    draft.set_agree_to_terms(req.agree_to_terms);

    for step in [Step::SelectType, Step::TripDetails, Step::PersonalInfo] {
        validate_step(step, &draft).map_err(|e| AppError::ValidationError(e.to_string()))?;
    }

    // 3. Resolve the item; totals are computed here from the catalog price
    let item = state
        .catalog
        .get(&req.item_id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError("Selected tour or event not found".to_string()))?;

    let expected_kind = match req.booking_type {
        BookingType::Tour => ItemKind::Tour,
        BookingType::Event => ItemKind::Event,
        BookingType::Unset => {
            return Err(AppError::ValidationError("Please select a booking type".to_string()))
        }
    };
    if item.kind != expected_kind {
        return Err(AppError::ValidationError(
            "Selected item does not match the booking type".to_string(),
        ));
    }
    if !item.is_bookable() {
        return Err(AppError::ValidationError(
            "Selected tour or event is not currently bookable".to_string(),
        ));
    }

    let mut payload = build_payload(&draft, user.as_ref(), &item);
    if let Some(reference) = req.reference {
        payload.reference = reference;
    }

    // 4. Single write, no automatic retry
    let outcome = state
        .bookings
        .create_booking(&payload)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if outcome.is_authoritative() {
        if let Ok(booking_id) = Uuid::parse_str(&outcome.id) {
            let event = BookingCreatedEvent {
                booking_id,
                reference: outcome.booking_reference.clone(),
                customer_id: user.as_ref().map(|u| u.id),
                item_id: item.id.clone(),
                total: payload.total,
                timestamp: Utc::now().timestamp(),
            };
            info!(target: "telemetry", event = ?event, "booking.created");
        }
    } else {
        let event = BookingDegradedEvent {
            reference: outcome.booking_reference.clone(),
            detail: outcome.error_details.clone().unwrap_or_default(),
            timestamp: Utc::now().timestamp(),
        };
        warn!(target: "telemetry", event = ?event, "booking.degraded");
    }

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET /v1/bookings/{reference}
/// Customer-facing lookup by the human-readable reference.
async fn get_booking(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> Result<Json<BookingRecord>, AppError> {
    let record = state
        .booking_admin
        .get_by_reference(&reference)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .ok_or_else(|| AppError::NotFoundError(format!("No booking with reference {}", reference)))?;

    Ok(Json(record))
}
