//! Integration tests for the storefront's middleware and fallback pages.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use shopfront_integration_tests::TestContext;

#[tokio::test]
async fn test_health_does_not_call_api() {
    let ctx = TestContext::start().await;

    let (status, body) = ctx.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert!(ctx.api.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_path_renders_not_found_page() {
    let ctx = TestContext::start().await;

    let (status, body) = ctx.get("/no-such-page").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("找不到頁面"));
    assert!(body.contains("/no-such-page"));
}

#[tokio::test]
async fn test_security_headers_carry_page_nonce() {
    let ctx = TestContext::start().await;

    let response = ctx.client.get(ctx.url("/")).send().await.unwrap();
    let headers = response.headers().clone();
    let body = response.text().await.unwrap();

    let policy = headers
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");

    let nonce = policy
        .split("'nonce-")
        .nth(1)
        .and_then(|rest| rest.split('\'').next())
        .unwrap();
    assert_eq!(nonce.len(), 24);
    assert!(body.contains("<style nonce=\""));
}

#[tokio::test]
async fn test_nonce_changes_per_request() {
    let ctx = TestContext::start().await;

    let first = ctx.client.get(ctx.url("/")).send().await.unwrap();
    let second = ctx.client.get(ctx.url("/")).send().await.unwrap();

    assert_ne!(
        first.headers().get("content-security-policy"),
        second.headers().get("content-security-policy")
    );
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let ctx = TestContext::start().await;

    let generated = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    let id = generated.headers().get("x-request-id").unwrap();
    assert_eq!(id.len(), 36);

    let propagated = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "edge-1234")
        .send()
        .await
        .unwrap();
    assert_eq!(propagated.headers().get("x-request-id").unwrap(), "edge-1234");
}
