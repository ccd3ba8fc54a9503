//! # saga-api
//!
//! HTTP intent endpoints for saga-pay-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Endpoints that create payment and setup intents and hand the client
//!   secret to the browser widget
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/config` | Publishable key for the widget |
//! | POST | `/create-payment-intent` | Create payment intent, returns `{secret}` |
//! | POST | `/create-setup-intent` | Create setup intent, returns `{secret}` |

pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
