//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Home page
//! GET  /health                   - Liveness check
//!
//! # Products
//! GET  /products                 - Product listing (?page=, ?category=)
//! GET  /products/{id}            - Product detail
//! POST /products/{id}/cart       - Add to cart (add_to_cart fragment)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                     - Cart page
//! POST /cart/clear               - Empty the cart (cart_panel fragment)
//! POST /cart/items/{id}/remove   - Remove a line (cart_panel fragment)
//! POST /cart/items/{id}/qty      - Set a line's quantity (cart_panel fragment)
//! POST /cart/checkout            - Place the order (cart_panel fragment)
//!
//! *                              - Not-found page
//! ```
//!
//! POST handlers answer HTMX requests with a fragment plus an out-of-band
//! notices block. A plain form post gets the full page instead.

pub mod cart;
pub mod home;
pub mod products;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::FromRequestParts,
    http::{StatusCode, Uri, request::Parts},
    routing::{get, post},
};

use crate::middleware::CspNonce;
use crate::pages::Notices;
use crate::state::AppState;

/// Whether the request came from HTMX (`HX-Request` header).
#[derive(Debug, Clone, Copy)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.headers.contains_key("hx-request")))
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/cart", post(products::add_to_cart))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/clear", post(cart::clear))
        .route("/items/{id}/remove", post(cart::remove))
        .route("/items/{id}/qty", post(cart::update_qty))
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub path: String,
    pub nonce: String,
    pub notices: Notices,
}

/// Fallback for unmatched paths.
pub async fn not_found(uri: Uri, CspNonce(nonce): CspNonce) -> (StatusCode, NotFoundTemplate) {
    tracing::debug!(path = %uri.path(), "No route");
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            path: uri.path().to_string(),
            nonce,
            notices: Notices::new(),
        },
    )
}
