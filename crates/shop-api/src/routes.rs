//! # Routes
//!
//! Axum router configuration for the storefront API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name for the storefront.
pub const SESSION_COOKIE_NAME: &str = "shop_session";

/// Session expiry in seconds (7 days — carts survive a weekend).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer backed by the in-memory store.
///
/// The cart lives here; there is no database behind this deployment, so
/// sessions (and carts) last for the process lifetime at most.
fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(secure)
        .with_http_only(true)
        .with_path("/")
}

/// Create the main application router
///
/// Routes:
/// - Catalog:
///   - GET  /api/v1/products?category= - List products
///   - GET  /api/v1/products/{id} - Get product by ID
///
/// - Cart (session-scoped):
///   - GET    /api/v1/cart - Show cart
///   - POST   /api/v1/cart/items - Add to cart (form)
///   - DELETE /api/v1/cart/items/{product_id} - Remove from cart
///
/// - Checkout:
///   - GET  /api/v1/checkout - Checkout summary
///   - GET  /api/v1/checkout/payment - Payment page context
///   - POST /api/v1/checkout/confirm - Confirm payment (form)
///
/// - Auth:
///   - POST /api/v1/auth/signup | login | logout
///   - GET  /api/v1/auth/me
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - the storefront frontend is served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let session_layer = create_session_layer(state.config.is_production());

    let catalog_routes = Router::new()
        .route("/products", get(handlers::list_products))
        .route("/products/{product_id}", get(handlers::get_product));

    let cart_routes = Router::new()
        .route("/cart", get(handlers::show_cart))
        .route("/cart/items", post(handlers::add_to_cart))
        .route(
            "/cart/items/{product_id}",
            delete(handlers::remove_from_cart),
        );

    let checkout_routes = Router::new()
        .route("/checkout", get(handlers::checkout_summary))
        .route("/checkout/payment", get(handlers::payment_page))
        .route("/checkout/confirm", post(handlers::confirm_payment));

    let auth_routes = Router::new()
        .route("/auth/signup", post(handlers::signup))
        .route("/auth/login", post(handlers::login))
        .route("/auth/logout", post(handlers::logout))
        .route("/auth/me", get(handlers::me));

    let api_routes = Router::new()
        .merge(catalog_routes)
        .merge(cart_routes)
        .merge(checkout_routes)
        .merge(auth_routes);

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
