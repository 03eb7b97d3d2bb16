use axum::{extract::State, routing::get, Json, Router};
use umoja_catalog::{derive_destinations, CatalogItem};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tours", get(list_tours))
        .route("/v1/events", get(list_events))
        .route("/v1/destinations", get(list_destinations))
}

/// GET /v1/tours
async fn list_tours(State(state): State<AppState>) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let tours = state
        .catalog
        .list_tours()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(Json(tours))
}

/// GET /v1/events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<CatalogItem>>, AppError> {
    let events = state
        .catalog
        .list_events()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    Ok(Json(events))
}

/// GET /v1/destinations
/// Destination list derived from active catalog items, for the wizard's
/// destination picker.
async fn list_destinations(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let mut items = state
        .catalog
        .list_tours()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    let events = state
        .catalog
        .list_events()
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    items.extend(events);

    Ok(Json(derive_destinations(&items)))
}
