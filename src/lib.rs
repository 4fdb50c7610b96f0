pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::TokenVerifier;
use config::AppConfig;
use database::{DrinkStore, StoreError};

/// Explicitly constructed application context, injected into every handler
/// via router state. Tests build isolated instances of this directly.
#[derive(Clone)]
pub struct AppContext {
    pub store: DrinkStore,
    pub verifier: TokenVerifier,
}

impl AppContext {
    /// Connect the store, run schema creation, and wire up the verifier.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store =
            DrinkStore::connect(&config.database.url, config.database.max_connections).await?;
        store.migrate().await?;

        Ok(Self {
            store,
            verifier: TokenVerifier::new(config.auth.clone()),
        })
    }
}

pub fn app(ctx: AppContext) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Drinks menu
        .route(
            "/drinks",
            get(handlers::drinks::list)
                .post(handlers::drinks::create)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/drinks-detail",
            get(handlers::drinks::list_detail).fallback(handlers::method_not_allowed),
        )
        .route(
            "/drinks/:id",
            patch(handlers::drinks::update)
                .delete(handlers::drinks::remove)
                .fallback(handlers::method_not_allowed),
        )
        // Unknown paths get the same error body shape as everything else
        .fallback(handlers::not_found)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
