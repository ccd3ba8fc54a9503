//! # Routes
//!
//! Axum router configuration for the intent API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use saga_core::IntentKind;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /health, / - Health check
/// - GET  /config - Publishable key for the widget
/// - POST /create-payment-intent - Create payment intent
/// - POST /create-setup-intent - Create setup intent
pub fn create_router(state: AppState) -> Router {
    // The widget is usually served from another origin than this API
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .route("/config", get(handlers::client_config))
        // Intent endpoints
        .route(
            IntentKind::Payment.route(),
            post(handlers::create_payment_intent),
        )
        .route(IntentKind::Setup.route(), post(handlers::create_setup_intent))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
