//! Request ID middleware.
//!
//! An id supplied by an upstream proxy is kept when it looks sane; otherwise
//! a UUID v4 is generated. The id is recorded on the request span, tagged on
//! the Sentry scope, stored in request extensions for handlers and echoed in
//! the `x-request-id` response header.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id accepted as is.
const MAX_UPSTREAM_LEN: usize = 128;

/// The id of the request being handled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Use the upstream value if it is short and printable, else generate one.
    fn from_upstream(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|h| h.to_str().ok())
            .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_LEN)
            .filter(|id| id.bytes().all(|b| b.is_ascii_graphic()))
            .map_or_else(|| Self(Uuid::new_v4().to_string()), |id| Self(id.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Attach a [`RequestId`] to every request and its response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_upstream(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", request_id.as_str());
    });

    let header = HeaderValue::from_str(request_id.as_str()).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self(String::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_sane_upstream_id() {
        let header = HeaderValue::from_static("cf-1234-abcd");
        assert_eq!(RequestId::from_upstream(Some(&header)).as_str(), "cf-1234-abcd");
    }

    #[test]
    fn test_replaces_missing_or_odd_upstream_id() {
        assert_eq!(RequestId::from_upstream(None).as_str().len(), 36);

        let spaced = HeaderValue::from_static("has spaces");
        assert_ne!(RequestId::from_upstream(Some(&spaced)).as_str(), "has spaces");

        let long = HeaderValue::from_str(&"a".repeat(200)).ok();
        assert_eq!(RequestId::from_upstream(long.as_ref()).as_str().len(), 36);
    }
}
