//! Per-request CSP nonce.
//!
//! The base template stamps the nonce on its inline `<script>` and `<style>`
//! blocks; [`security_headers_middleware`](super::security_headers_middleware)
//! puts the same value in the `Content-Security-Policy` header.

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};

/// A 128-bit random nonce, base64-encoded.
#[derive(Clone, Debug)]
pub struct CspNonce(pub String);

impl CspNonce {
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(STANDARD.encode(bytes))
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The policy sent with a response carrying this nonce.
    ///
    /// Bootstrap and HTMX load from jsDelivr. Product images live on
    /// arbitrary hosts the commerce API chooses, so any https image is
    /// allowed.
    #[must_use]
    pub fn policy(&self) -> String {
        let nonce = &self.0;
        format!(
            "default-src 'none'; \
             script-src 'self' 'nonce-{nonce}' https://cdn.jsdelivr.net; \
             style-src 'self' 'nonce-{nonce}' https://cdn.jsdelivr.net; \
             font-src https://cdn.jsdelivr.net; \
             img-src 'self' https: data:; \
             connect-src 'self'; \
             object-src 'none'; \
             base-uri 'self'; \
             form-action 'self'; \
             frame-ancestors 'none'"
        )
    }
}

/// Generate a nonce and store it in request extensions.
///
/// Must run inside `security_headers_middleware` so the header can read it.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    let nonce = CspNonce::generate();
    request.extensions_mut().insert(nonce.clone());
    let mut response = next.run(request).await;
    response.extensions_mut().insert(nonce);
    response
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("CSP nonce missing from request extensions");
            Self(String::new())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonces_are_unique_and_encoded() {
        let a = CspNonce::generate();
        let b = CspNonce::generate();
        assert_ne!(a.value(), b.value());
        assert_eq!(STANDARD.decode(a.value()).map(|v| v.len()).ok(), Some(16));
    }

    #[test]
    fn test_policy_embeds_nonce() {
        let nonce = CspNonce("abc123".to_string());
        let policy = nonce.policy();
        assert!(policy.contains("script-src 'self' 'nonce-abc123'"));
        assert!(policy.contains("frame-ancestors 'none'"));
    }
}
