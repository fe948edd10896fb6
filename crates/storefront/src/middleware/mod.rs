//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (recorded in the span, the Sentry scope and the response)
//! 4. CSP nonce (per-request nonce for inline scripts and styles)
//! 5. Security headers (CSP built from the nonce, framing, sniffing, referrer)
//! 6. Session layer (in-memory store holding page snapshots)

pub mod csp;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use csp::{CspNonce, csp_nonce_middleware};
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
