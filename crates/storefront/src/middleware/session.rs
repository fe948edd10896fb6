//! Session layer and page snapshots.
//!
//! Sessions live in memory. Their only content is the snapshot of the last
//! server response each page rendered, so losing them on restart just means
//! the next page view reads from the server again.

use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::api::Cart;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shopfront_session";

/// Idle lifetime of a session (2 hours).
const SESSION_IDLE_SECONDS: i64 = 2 * 60 * 60;

/// Session keys.
pub mod keys {
    /// Last cart the cart page rendered.
    pub const CART_SNAPSHOT: &str = "page:cart";
}

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_IDLE_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// The cart snapshot of the current cart page lifetime, if any.
pub async fn cart_snapshot(session: &Session) -> Option<Cart> {
    match session.get::<Cart>(keys::CART_SNAPSHOT).await {
        Ok(cart) => cart,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable cart snapshot");
            None
        }
    }
}

/// Store the cart snapshot. Without a snapshot the key is cleared.
///
/// # Errors
///
/// Returns the session store's error if the write fails.
pub async fn store_cart_snapshot(
    session: &Session,
    cart: Option<&Cart>,
) -> Result<(), tower_sessions::session::Error> {
    match cart {
        Some(cart) => session.insert(keys::CART_SNAPSHOT, cart).await,
        None => session.remove::<Cart>(keys::CART_SNAPSHOT).await.map(drop),
    }
}
