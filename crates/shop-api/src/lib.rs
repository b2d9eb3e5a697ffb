//! # shop-api
//!
//! HTTP API layer for storefront-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server with session-scoped carts
//! - REST endpoints for catalog, cart, auth, and checkout
//! - The QR fallback renderer
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/products` | List products (`?category=` filter) |
//! | GET | `/api/v1/products/{id}` | Get product |
//! | GET | `/api/v1/cart` | Show cart |
//! | POST | `/api/v1/cart/items` | Add to cart |
//! | DELETE | `/api/v1/cart/items/{id}` | Remove from cart |
//! | GET | `/api/v1/checkout` | Checkout summary |
//! | GET | `/api/v1/checkout/payment` | Payment page context |
//! | POST | `/api/v1/checkout/confirm` | Confirm payment |
//! | POST | `/api/v1/auth/signup` | Create account |
//! | POST | `/api/v1/auth/login` | Log in |
//! | POST | `/api/v1/auth/logout` | Log out |
//! | GET | `/api/v1/auth/me` | Current user |

pub mod auth;
pub mod handlers;
pub mod qr;
pub mod routes;
pub mod session;
pub mod state;

pub use qr::PngQrRenderer;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
