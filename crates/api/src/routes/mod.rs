//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health               - Liveness check
//! GET  /health/ready         - Readiness check (verifies database)
//!
//! # Checkout
//! POST /api/orders           - Order intake (checkout submission)
//! GET  /api/orders/{id}      - Order with items (order status page)
//!
//! # LINE webhook
//! POST /api/line/webhook     - Inbound platform events (postbacks, messages)
//!
//! # Catalog
//! GET  /api/products         - Active products (?category&search&page&limit)
//! GET  /api/categories       - Active categories
//!
//! # Favorites
//! GET  /api/favorites        - A user's favorites (?userId)
//! POST /api/favorites        - Toggle a favorite pair
//!
//! # Auth
//! POST /api/auth/line        - Upsert a user from the LINE profile sync
//!
//! # Client bootstrap
//! GET  /api/config           - Client-safe configuration (LIFF app ID)
//! ```
//!
//! All responses are JSON; errors are `{"error": "<message>"}` with a
//! 4xx/5xx status.

pub mod auth;
pub mod config;
pub mod favorites;
pub mod orders;
pub mod products;
pub mod webhook;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all `/api` routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Checkout
        .route("/orders", post(orders::create))
        .route("/orders/{id}", get(orders::show))
        // Inbound webhook
        .route("/line/webhook", post(webhook::inbound))
        // Catalog
        .route("/products", get(products::index))
        .route("/categories", get(products::categories))
        // Favorites
        .route(
            "/favorites",
            get(favorites::index).post(favorites::toggle),
        )
        // Auth sync
        .route("/auth/line", post(auth::sync))
        // Client bootstrap
        .route("/config", get(config::show))
}
