//! HTTP route handlers for the order server.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Health check
//!
//! # Ordering (requires auth)
//! GET    /menu                      - Menu catalog
//! POST   /addToBasket/{product_id}  - Append a product to the basket
//! DELETE /clearBasket               - Empty the basket
//! GET    /placeOrder                - Price the basket, open a payment intent
//! POST   /confirmOrder/{id}         - Confirm a payment intent
//! POST   /cancelPayment/{id}        - Cancel a payment intent
//!
//! # Accounts
//! POST   /users                     - Sign up
//! POST   /users/login               - Log in
//! POST   /users/logout              - Revoke the presented token (requires auth)
//! GET    /users/me                  - Current account (requires auth)
//! ```

pub mod basket;
pub mod menu;
pub mod orders;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the account routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(users::signup))
        .route("/login", post(users::login))
        .route("/logout", post(users::logout))
        .route("/me", get(users::me))
}

/// Create all routes for the order server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Catalog
        .route("/menu", get(menu::index))
        // Basket
        .route("/addToBasket/{product_id}", post(basket::add))
        .route("/clearBasket", delete(basket::clear))
        // Payment lifecycle
        .route("/placeOrder", get(orders::place))
        .route("/confirmOrder/{id}", post(orders::confirm))
        .route("/cancelPayment/{id}", post(orders::cancel))
        // Accounts
        .nest("/users", user_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
