use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use umoja_api::{app, state::{AppState, AuthConfig}};
use umoja_booking::MemoryBookingStore;
use umoja_catalog::MemoryCatalog;
use umoja_store::app_config::CatalogBackend;
use umoja_store::{DbClient, PgBookingStore, PgCatalog};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "umoja_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = umoja_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Umoja API on port {}", config.server.port);

    let auth = AuthConfig {
        secret: config.auth.jwt_secret.clone(),
        expiration: config.auth.jwt_expiration_seconds,
    };

    let app_state = match config.catalog.backend {
        CatalogBackend::Memory => {
            tracing::info!("Catalog backend: in-memory seed catalog");
            let catalog = Arc::new(MemoryCatalog::seeded());
            let store = Arc::new(MemoryBookingStore::new());
            AppState {
                catalog: catalog.clone(),
                catalog_admin: catalog,
                bookings: store.clone(),
                booking_admin: store,
                auth,
            }
        }
        CatalogBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .expect("database.url is required for the postgres backend");
            let db = DbClient::new(url).await.expect("Failed to connect to Postgres");
            db.migrate().await.expect("Failed to run migrations");
            tracing::info!("Catalog backend: postgres");

            let catalog = Arc::new(PgCatalog::new(db.pool.clone()));
            let store = Arc::new(PgBookingStore::new(db.pool.clone()));
            AppState {
                catalog: catalog.clone(),
                catalog_admin: catalog,
                bookings: store.clone(),
                booking_admin: store,
                auth,
            }
        }
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
