use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use umoja_booking::models::{BookingRecord, BookingStatus, PaymentStatus};
use umoja_catalog::{CatalogItem, ItemKind};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpsertItemRequest {
    pub id: String,
    pub kind: ItemKind,
    pub title: String,
    pub location: String,
    pub price: f64,
    pub duration: String,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
    pub payment_status: String,
}

impl UpsertItemRequest {
    /// Shared gate for create and update; an update must not turn a
    /// valid item into a free or undated one.
    fn validate(&self) -> Result<(), AppError> {
        if self.price <= 0.0 {
            return Err(AppError::ValidationError("Price must be positive".to_string()));
        }
        if self.kind == ItemKind::Event && self.date.is_none() {
            return Err(AppError::ValidationError("Events require a date".to_string()));
        }
        Ok(())
    }

    fn into_item(self, id: String) -> CatalogItem {
        CatalogItem {
            id,
            kind: self.kind,
            title: self.title,
            location: self.location,
            price: self.price,
            duration: self.duration,
            date: self.date,
            description: self.description,
            image_url: self.image_url,
            is_active: self.is_active,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/items", post(create_item))
        .route("/v1/admin/items/{id}", put(update_item).delete(delete_item))
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/{id}/status", put(update_booking_status))
}

// ============================================================================
// Catalog Management Handlers
// ============================================================================

/// POST /v1/admin/items
async fn create_item(
    State(state): State<AppState>,
    Json(req): Json<UpsertItemRequest>,
) -> Result<(StatusCode, Json<CatalogItem>), AppError> {
    req.validate()?;

    let existing = state
        .catalog
        .get(&req.id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    if existing.is_some() {
        return Err(AppError::ConflictError(format!(
            "Catalog item {} already exists",
            req.id
        )));
    }

    let id = req.id.clone();
    let item = req.into_item(id);
    state
        .catalog_admin
        .upsert(item.clone())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /v1/admin/items/{id}
async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpsertItemRequest>,
) -> Result<Json<CatalogItem>, AppError> {
    req.validate()?;

    // The path id wins over whatever the body carries
    let item = req.into_item(id);
    state
        .catalog_admin
        .upsert(item.clone())
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(item))
}

/// DELETE /v1/admin/items/{id}
async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let deleted = state
        .catalog_admin
        .delete(&id)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("No catalog item {}", id)))
    }
}

// ============================================================================
// Booking Management Handlers
// ============================================================================

/// GET /v1/admin/bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let bookings = state
        .booking_admin
        .list_bookings()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(Json(bookings))
}

/// PUT /v1/admin/bookings/{id}/status
async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBookingStatusRequest>,
) -> Result<StatusCode, AppError> {
    let status = BookingStatus::parse(&req.status)
        .ok_or_else(|| AppError::ValidationError(format!("Unknown status {}", req.status)))?;
    let payment_status = PaymentStatus::parse(&req.payment_status).ok_or_else(|| {
        AppError::ValidationError(format!("Unknown payment status {}", req.payment_status))
    })?;

    let updated = state
        .booking_admin
        .update_status(id, status, payment_status)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    if updated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("No booking {}", id)))
    }
}
