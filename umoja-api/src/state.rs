use std::sync::Arc;
use umoja_booking::models::{BookingAdmin, BookingWriter};
use umoja_catalog::{CatalogAdmin, CatalogProvider};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

/// Backend selection happens at startup: the same state shape serves the
/// in-memory and Postgres implementations behind the trait objects.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub catalog_admin: Arc<dyn CatalogAdmin>,
    pub bookings: Arc<dyn BookingWriter>,
    pub booking_admin: Arc<dyn BookingAdmin>,
    pub auth: AuthConfig,
}
