//! # Session State
//!
//! The cart and the logged-in user live in the session. This module owns
//! the session keys and the `CartStore` implementation handlers hand to
//! the checkout orchestrator — core code never sees `tower_sessions`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shop_core::{Cart, CartStore, CheckoutError, CheckoutResult};
use tower_sessions::Session;

/// Session keys for storefront data.
pub mod keys {
    /// Key for the shopping cart.
    pub const CART: &str = "cart";

    /// Key for the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Username chosen at signup; doubles as the checkout receipt id.
    pub username: String,
}

/// Get the current user from the session.
pub async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

/// Store the current user in the session.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Drop the current user from the session.
pub async fn clear_current_user(session: &Session) {
    let _ = session.remove::<CurrentUser>(keys::CURRENT_USER).await;
}

/// `CartStore` over the request's session.
///
/// Each read and write moves the whole cart as one unit; `clear`
/// replaces it with nothing in a single session write.
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CartStore for SessionCartStore {
    async fn load(&self) -> CheckoutResult<Cart> {
        Ok(self
            .session
            .get::<Cart>(keys::CART)
            .await
            .map_err(|e| CheckoutError::Store(e.to_string()))?
            .unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> CheckoutResult<()> {
        self.session
            .insert(keys::CART, cart)
            .await
            .map_err(|e| CheckoutError::Store(e.to_string()))
    }

    async fn clear(&self) -> CheckoutResult<()> {
        self.session
            .remove::<Cart>(keys::CART)
            .await
            .map(|_| ())
            .map_err(|e| CheckoutError::Store(e.to_string()))
    }
}
