//! # Storefront RS
//!
//! Small online storefront: catalog browsing, session carts, and
//! checkout via Razorpay, UPI QR, or cash on delivery.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: enable online payments
//! export RAZORPAY_KEY_ID=rzp_test_...
//! export RAZORPAY_KEY_SECRET=...
//!
//! # Optional: enable the UPI QR fallback
//! export UPI_ID=yourshop@upi
//! export MERCHANT_NAME="Your Shop"
//!
//! # Run the server
//! storefront
//! ```

use shop_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Products loaded: {}", state.catalog.products.len());
    info!(
        "Online payments: {}",
        if state.checkout.gateway_configured() {
            "razorpay"
        } else {
            "disabled (COD/QR only)"
        }
    );

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("🛒 Storefront starting on http://{}", addr);

    if !is_prod {
        info!("📝 Health: http://{}/health", addr);
        info!("🧺 Cart: GET http://{}/api/v1/cart", addr);
        info!("💳 Payment: GET http://{}/api/v1/checkout/payment", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
