//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database ping)
//!
//! # Auth
//! POST   /auth/join            - Register and log in
//! POST   /auth/login           - Login with email and password
//! GET    /auth/logout          - Logout, destroying the session
//! GET    /auth/status          - Current authentication status
//!
//! # Items
//! GET    /item                 - Paginated item listing with search filters
//! GET    /item/{id}            - Item detail with all images
//! POST   /item                 - Create item with images (admin)
//! DELETE /item/{id}            - Delete item (admin)
//!
//! # Orders (all require login)
//! POST   /order                - Place an order
//! GET    /order/list           - Paginated order history, newest first
//! POST   /order/cancel/{id}    - Cancel an order, restoring stock
//! DELETE /order/delete/{id}    - Hard-delete an order (admin)
//! ```

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod items;
pub mod orders;

/// Create all application routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(items::router())
        .merge(orders::router())
}
