//! Integration tests for the cart page and checkout.
//!
//! Every test opens the cart page first so the session carries a cart
//! snapshot, as a browser would before posting any cart form.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use shopfront_integration_tests::{FAILURE_MESSAGE, TestContext};

/// A storefront whose cart holds one line of `-P1` with the given quantity.
async fn cart_with(qty: u32) -> (TestContext, String) {
    let ctx = TestContext::start().await;
    ctx.api.add_product("-P1", "草莓莓果夾心圈", 99, 150);
    ctx.api.add_product("-P2", "抹茶紅豆捲", 120, 120);
    let line = ctx.api.put_line("-P1", qty);

    let (status, _) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    ctx.api.reset_calls();

    (ctx, line)
}

const VALID_ORDER: [(&str, &str); 5] = [
    ("email", "buyer@example.com"),
    ("name", "王小明"),
    ("tel", "0912345678"),
    ("address", "台北市信義區市府路 1 號"),
    ("message", ""),
];

fn order_with<'a>(field: &str, value: &'a str) -> Vec<(&'static str, &'a str)> {
    VALID_ORDER
        .iter()
        .map(|&(name, default)| (name, if name == field { value } else { default }))
        .collect()
}

#[tokio::test]
async fn test_cart_page_lists_lines_and_totals() {
    let (ctx, _) = cart_with(2).await;

    let (_, body) = ctx.get("/cart").await;

    assert!(body.contains("草莓莓果夾心圈"));
    assert!(body.contains("<span class=\"qty\">2</span>"));
    assert!(body.contains("NT$ 198"));
    assert!(body.contains("id=\"checkout-form\""));
}

#[tokio::test]
async fn test_decrement_disabled_at_one() {
    let (ctx, _) = cart_with(1).await;

    let (_, body) = ctx.get("/cart").await;

    assert!(body.contains("aria-label=\"減少數量\" disabled>"));
}

#[tokio::test]
async fn test_decrement_enabled_above_one() {
    let (ctx, _) = cart_with(2).await;

    let (_, body) = ctx.get("/cart").await;

    assert!(body.contains("name=\"qty\" value=\"1\""));
    assert!(!body.contains("aria-label=\"減少數量\" disabled>"));
}

#[tokio::test]
async fn test_quantity_change_reloads_cart_once() {
    let (ctx, line) = cart_with(1).await;

    let (status, body) = ctx
        .hx_post(
            &format!("/cart/items/{line}/qty"),
            &[("product_id", "-P1"), ("qty", "2")],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.api.calls(), ["PUT /cart/{id}", "GET /cart"]);
    assert_eq!(ctx.api.qty_of("-P1"), Some(2));
    assert!(body.contains("<span class=\"qty\">2</span>"));
    assert!(body.contains("id=\"cart-panel\""));
}

#[tokio::test]
async fn test_quantity_below_one_is_refused_locally() {
    let (ctx, line) = cart_with(1).await;

    let (status, body) = ctx
        .hx_post(
            &format!("/cart/items/{line}/qty"),
            &[("product_id", "-P1"), ("qty", "0")],
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(ctx.api.calls().is_empty());
    assert!(body.contains("商品數量至少為 1"));
    assert_eq!(ctx.api.qty_of("-P1"), Some(1));
}

#[tokio::test]
async fn test_quantity_without_product_is_bad_request() {
    let (ctx, line) = cart_with(1).await;

    let (status, _) = ctx
        .hx_post(&format!("/cart/items/{line}/qty"), &[("product_id", " "), ("qty", "2")])
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(ctx.api.calls().is_empty());
}

#[tokio::test]
async fn test_remove_line_reloads_cart_once() {
    let (ctx, line) = cart_with(1).await;

    let (_, body) = ctx.hx_post(&format!("/cart/items/{line}/remove"), &[]).await;

    assert_eq!(ctx.api.calls(), ["DELETE /cart/{id}", "GET /cart"]);
    assert!(body.contains("購物車目前是空的"));
}

#[tokio::test]
async fn test_failed_removal_keeps_snapshot_without_reload() {
    let (ctx, line) = cart_with(1).await;
    ctx.api.fail("DELETE /cart/{id}");

    let (status, body) = ctx.hx_post(&format!("/cart/items/{line}/remove"), &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.api.calls(), ["DELETE /cart/{id}"]);
    assert!(body.contains(FAILURE_MESSAGE));
    assert!(body.contains("草莓莓果夾心圈"));
}

#[tokio::test]
async fn test_clear_empties_cart() {
    let (ctx, _) = cart_with(3).await;
    ctx.api.put_line("-P2", 1);

    let (_, body) = ctx.hx_post("/cart/clear", &[]).await;

    assert_eq!(ctx.api.calls(), ["DELETE /carts", "GET /cart"]);
    assert_eq!(ctx.api.line_count(), 0);
    assert!(body.contains("購物車目前是空的"));
}

#[tokio::test]
async fn test_failed_cart_read_shows_notice() {
    let (ctx, _) = cart_with(1).await;
    ctx.api.fail("GET /cart");

    let (status, body) = ctx.get("/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(FAILURE_MESSAGE));
    assert!(body.contains("無法讀取購物車"));
}

#[tokio::test]
async fn test_checkout_requires_address() {
    let (ctx, _) = cart_with(1).await;

    let (_, body) = ctx.hx_post("/cart/checkout", &order_with("address", "")).await;

    assert!(body.contains("地址欄位必填"));
    assert!(ctx.api.calls().is_empty());
    assert!(body.contains("value=\"buyer@example.com\""));
}

#[tokio::test]
async fn test_checkout_rejects_malformed_email() {
    let (ctx, _) = cart_with(1).await;

    let (_, body) = ctx
        .hx_post("/cart/checkout", &order_with("email", "not-an-email"))
        .await;

    assert!(body.contains("Email 格式錯誤"));
    assert!(body.contains("is-invalid"));
    assert!(ctx.api.calls().is_empty());
}

#[tokio::test]
async fn test_checkout_places_order_and_reloads() {
    let (ctx, _) = cart_with(2).await;

    let (status, body) = ctx.hx_post("/cart/checkout", &VALID_ORDER).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.api.calls(), ["POST /order", "GET /cart"]);
    assert!(body.contains("-Order1"));
    assert!(body.contains("購物車目前是空的"));
}

#[tokio::test]
async fn test_checkout_failure_keeps_form_values() {
    let (ctx, _) = cart_with(1).await;
    ctx.api.fail("POST /order");

    let (_, body) = ctx.hx_post("/cart/checkout", &VALID_ORDER).await;

    assert_eq!(ctx.api.calls(), ["POST /order"]);
    assert!(body.contains(FAILURE_MESSAGE));
    assert!(body.contains("value=\"0912345678\""));
}

#[tokio::test]
async fn test_full_page_post_without_htmx() {
    let (ctx, _) = cart_with(1).await;

    let response = ctx
        .client
        .post(ctx.url("/cart/clear"))
        .send()
        .await
        .unwrap();
    let body = response.text().await.unwrap();

    assert!(body.contains("<html"));
    assert!(body.contains("購物車目前是空的"));
}
