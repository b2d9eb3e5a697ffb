//! # Request Handlers
//!
//! Axum request handlers for the storefront API: catalog browsing,
//! session cart management, auth, and the checkout/payment flow.

use crate::auth::AuthError;
use crate::session::{self, CurrentUser, SessionCartStore};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shop_core::{
    compute_total, CartStore, Category, CheckoutError, PaymentMethod, PaymentPage,
    PaymentSubmission,
};
use tower_sessions::Session;
use tracing::{error, info, instrument};

/// Client-side paths the error payloads point back at.
pub const CART_PATH: &str = "/api/v1/cart";
pub const PAYMENT_PATH: &str = "/api/v1/checkout/payment";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Product list query
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    /// Category filter (optional)
    #[serde(default)]
    pub category: Option<String>,
}

/// Add-to-cart form data
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    /// Product ID
    pub product_id: String,
    /// Quantity, clamped to [1, 10]
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Payment submission form data
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    /// `cod` or `upi`; anything else (or nothing) is treated as `cod`
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub razorpay_payment_id: Option<String>,
    #[serde(default)]
    pub razorpay_order_id: Option<String>,
    #[serde(default)]
    pub razorpay_signature: Option<String>,
}

/// Signup form data
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm: String,
}

/// Login form data
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// One cart line as rendered to the client
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// Cart contents plus the running total
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartView {
    fn from_cart(cart: &shop_core::Cart) -> Self {
        Self {
            items: cart
                .iter()
                .map(|(id, entry)| CartLineView {
                    product_id: id.clone(),
                    name: entry.name.clone(),
                    unit_price: entry.unit_price,
                    quantity: entry.quantity,
                    line_total: entry.total(),
                })
                .collect(),
            total: compute_total(cart),
            item_count: cart.item_count(),
        }
    }
}

/// Payment confirmation response
#[derive(Debug, Serialize)]
pub struct PaymentSuccessResponse {
    pub payment_method: PaymentMethod,
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Where the client should send the user next (cart or payment page)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
            redirect: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_redirect(mut self, redirect: impl Into<String>) -> Self {
        self.redirect = Some(redirect.into());
        self
    }
}

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ErrorReply {
    let code = err.status_code();
    let mut response = ErrorResponse::new(err.to_string(), code);

    // Failed payments route back to the payment page (the cart is
    // untouched); an empty cart routes back to the cart view.
    if err.allows_retry() {
        response = response.with_redirect(PAYMENT_PATH);
    } else if matches!(err, CheckoutError::CartEmpty) {
        response = response.with_redirect(CART_PATH);
    }

    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn auth_error_to_response(err: AuthError) -> ErrorReply {
    let code = err.status_code();
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ErrorResponse::new(err.to_string(), code)),
    )
}

// =============================================================================
// Health
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// =============================================================================
// Catalog
// =============================================================================

/// List active products, optionally filtered by category
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> impl IntoResponse {
    let products: Vec<_> = match query.category.as_deref() {
        None => state.catalog.active_products().collect(),
        Some(raw) => match Category::parse(raw) {
            Some(category) => state.catalog.by_category(category).collect(),
            // an unknown filter behaves like a category with no products
            None => Vec::new(),
        },
    };

    Json(serde_json::json!({
        "products": products,
        "count": products.len(),
        "category": query.category,
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<impl IntoResponse, ErrorReply> {
    let product = state.catalog.get(&product_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Product not found: {product_id}"),
                404,
            )),
        )
    })?;

    Ok(Json(product.clone()))
}

// =============================================================================
// Cart
// =============================================================================

/// Show the session cart
pub async fn show_cart(session: Session) -> Result<Json<CartView>, ErrorReply> {
    let store = SessionCartStore::new(session);
    let cart = store.load().await.map_err(checkout_error_to_response)?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Add a product to the cart, snapshotting its price
#[instrument(skip(state, session), fields(product_id = %form.product_id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse, ErrorReply> {
    let product = state.catalog.get(&form.product_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                format!("Product not found: {}", form.product_id),
                404,
            )),
        )
    })?;

    if !product.active {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                format!("Product is not available: {}", form.product_id),
                400,
            )),
        ));
    }

    let quantity = shop_core::clamp_quantity(form.quantity.unwrap_or(1));

    let store = SessionCartStore::new(session);
    let mut cart = store.load().await.map_err(checkout_error_to_response)?;
    cart.add(product, quantity);
    store.save(&cart).await.map_err(checkout_error_to_response)?;

    let message = if quantity > 1 {
        format!("{} x {} added to your cart!", quantity, product.name)
    } else {
        format!("{} added to your cart!", product.name)
    };

    Ok(Json(serde_json::json!({
        "message": message,
        "cart": CartView::from_cart(&cart),
    })))
}

/// Remove a product from the cart
pub async fn remove_from_cart(
    session: Session,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>, ErrorReply> {
    let store = SessionCartStore::new(session);
    let mut cart = store.load().await.map_err(checkout_error_to_response)?;
    cart.remove(&product_id);
    store.save(&cart).await.map_err(checkout_error_to_response)?;
    Ok(Json(CartView::from_cart(&cart)))
}

// =============================================================================
// Checkout
// =============================================================================

/// Checkout summary: the cart as it will be charged
pub async fn checkout_summary(session: Session) -> Result<Json<CartView>, ErrorReply> {
    show_cart(session).await
}

/// Enter the payment step.
///
/// Emits the payment-page context: total, paise amount, gateway fields
/// when an intent was created, QR fallback fields when configured. A
/// fresh intent is created on every call; reloading the page is safe.
#[instrument(skip(state, session))]
pub async fn payment_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PaymentPage>, ErrorReply> {
    let user = session::current_user(&session).await;
    let store = SessionCartStore::new(session);
    let cart = store.load().await.map_err(checkout_error_to_response)?;

    let page = state
        .checkout
        .payment_page(&cart, user.as_ref().map(|u| u.username.as_str()))
        .await
        .map_err(|e| {
            info!("payment page rejected: {}", e);
            checkout_error_to_response(e)
        })?;

    Ok(Json(page))
}

/// Conclude checkout for the submitted payment method.
///
/// COD confirms immediately; UPI verifies the gateway signature first.
/// The cart is cleared exactly when this succeeds.
#[instrument(skip(state, session, form))]
pub async fn confirm_payment(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Json<PaymentSuccessResponse>, ErrorReply> {
    let submission = PaymentSubmission {
        method: PaymentMethod::from_form(form.payment_method.as_deref()),
        payment_id: form.razorpay_payment_id,
        order_id: form.razorpay_order_id,
        signature: form.razorpay_signature,
    };

    let store = SessionCartStore::new(session);
    let method = state
        .checkout
        .confirm(&store, &submission)
        .await
        .map_err(|e| {
            error!("payment confirmation failed: {}", e);
            checkout_error_to_response(e)
        })?;

    let message = match method {
        PaymentMethod::Cod => {
            "Order placed successfully! You will pay cash on delivery.".to_string()
        }
        PaymentMethod::Upi => "Payment successful! Your order has been placed.".to_string(),
    };

    Ok(Json(PaymentSuccessResponse {
        payment_method: method,
        message,
    }))
}

// =============================================================================
// Auth
// =============================================================================

/// Create an account
#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<impl IntoResponse, ErrorReply> {
    state
        .users
        .register(&form.username, &form.password, &form.confirm)
        .await
        .map_err(auth_error_to_response)?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Account created! Please log in."
        })),
    ))
}

/// Log in and remember the user in the session
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ErrorReply> {
    let username = state
        .users
        .authenticate(&form.username, &form.password)
        .await
        .map_err(auth_error_to_response)?;

    session::set_current_user(&session, &CurrentUser { username: username.clone() })
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Session error: {e}"), 500)),
            )
        })?;

    Ok(Json(serde_json::json!({
        "message": "Logged in",
        "username": username,
    })))
}

/// Log out
pub async fn logout(session: Session) -> impl IntoResponse {
    session::clear_current_user(&session).await;
    Json(serde_json::json!({ "message": "Logged out" }))
}

/// Who am I
pub async fn me(session: Session) -> impl IntoResponse {
    let user = session::current_user(&session).await;
    Json(serde_json::json!({
        "username": user.map(|u| u.username),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_builder() {
        let err = ErrorResponse::new("Test error", 400)
            .with_details("more context")
            .with_redirect(CART_PATH);
        assert_eq!(err.error, "Test error");
        assert_eq!(err.code, 400);
        assert_eq!(err.redirect.as_deref(), Some(CART_PATH));
    }

    #[test]
    fn test_cart_empty_redirects_to_cart() {
        let (status, Json(body)) = checkout_error_to_response(CheckoutError::CartEmpty);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.redirect.as_deref(), Some(CART_PATH));
    }

    #[test]
    fn test_retryable_errors_redirect_to_payment_page() {
        for err in [
            CheckoutError::ConfirmationIncomplete,
            CheckoutError::SignatureInvalid,
            CheckoutError::Verification("broken".into()),
            CheckoutError::GatewayNotConfigured,
        ] {
            let (_, Json(body)) = checkout_error_to_response(err);
            assert_eq!(body.redirect.as_deref(), Some(PAYMENT_PATH));
        }
    }

    #[test]
    fn test_gateway_errors_have_no_redirect() {
        let (status, Json(body)) = checkout_error_to_response(CheckoutError::Network("down".into()));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.redirect.is_none());
    }
}
