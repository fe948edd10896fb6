//! Integration tests for Shopfront.
//!
//! Each test starts two servers on ephemeral ports: an in-memory fake of
//! the remote commerce API and the storefront itself, configured to talk to
//! the fake. Tests drive the storefront over HTTP with a cookie-keeping
//! client and inspect both the rendered HTML and the calls the fake saw.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use shopfront_storefront::config::CommerceApiConfig;
use shopfront_storefront::{AppState, StorefrontConfig};
use tokio::net::TcpListener;

/// Shop path segment the fake API serves under `/v2/api/`.
pub const API_PATH: &str = "test-shop";

/// Message the fake API answers a failing call with.
pub const FAILURE_MESSAGE: &str = "伺服器暫時無法處理";

// =============================================================================
// Fake Commerce API
// =============================================================================

#[derive(Debug, Clone)]
struct FakeProduct {
    id: String,
    title: String,
    category: String,
    price: i64,
    origin_price: i64,
}

#[derive(Debug, Clone)]
struct FakeLine {
    id: String,
    product_id: String,
    qty: u32,
}

#[derive(Debug, Default)]
struct FakeState {
    products: Vec<FakeProduct>,
    cart: Vec<FakeLine>,
    next_line: u32,
    next_order: u32,
    calls: Vec<String>,
    failing: HashSet<String>,
}

impl FakeState {
    fn product(&self, id: &str) -> Option<&FakeProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    fn product_json(product: &FakeProduct) -> Value {
        json!({
            "id": product.id,
            "title": product.title,
            "category": product.category,
            "description": format!("{} description", product.title),
            "content": "",
            "origin_price": product.origin_price,
            "price": product.price,
            "unit": "個",
            "imageUrl": "",
            "imagesUrl": [],
            "is_enabled": 1,
        })
    }

    fn cart_json(&self) -> Value {
        let mut total = 0_i64;
        let lines: Vec<Value> = self
            .cart
            .iter()
            .filter_map(|line| {
                let product = self.product(&line.product_id)?;
                let line_total = product.price * i64::from(line.qty);
                total += line_total;
                Some(json!({
                    "id": line.id,
                    "product_id": line.product_id,
                    "qty": line.qty,
                    "total": line_total,
                    "final_total": line_total,
                    "product": {
                        "title": product.title,
                        "imageUrl": "",
                        "unit": "個",
                        "price": product.price,
                    },
                }))
            })
            .collect();

        json!({ "carts": lines, "total": total, "final_total": total })
    }

    fn cart_total(&self) -> i64 {
        self.cart
            .iter()
            .filter_map(|line| {
                self.product(&line.product_id)
                    .map(|p| p.price * i64::from(line.qty))
            })
            .sum()
    }

    fn add_line(&mut self, product_id: &str, qty: u32) -> String {
        if let Some(line) = self.cart.iter_mut().find(|l| l.product_id == product_id) {
            line.qty += qty;
            return line.id.clone();
        }
        self.next_line += 1;
        let id = format!("-Line{}", self.next_line);
        self.cart.push(FakeLine {
            id: id.clone(),
            product_id: product_id.to_string(),
            qty,
        });
        id
    }
}

type Shared = Arc<Mutex<FakeState>>;

/// In-memory stand-in for the remote commerce API.
///
/// Records every call by its route (`GET /cart`, `PUT /cart/{id}`, ...) and
/// fails any route switched on with [`FakeCommerceApi::fail`].
#[derive(Clone)]
pub struct FakeCommerceApi {
    state: Shared,
    addr: SocketAddr,
}

impl FakeCommerceApi {
    /// Start the fake on an ephemeral port.
    pub async fn start() -> Self {
        let state = Shared::default();
        let shop = Router::new()
            .route("/products", get(list_products))
            .route("/product/{id}", get(get_product))
            .route("/cart", get(get_cart).post(add_to_cart))
            .route("/cart/{id}", delete(remove_line).put(update_line))
            .route("/carts", delete(clear_cart))
            .route("/order", post(submit_order))
            .with_state(state.clone());
        let app = Router::new().nest(&format!("/v2/api/{API_PATH}"), shop);

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind fake API listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read fake API address");
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self { state, addr }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        lock(&self.state)
    }

    /// Origin the storefront should call.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Add a product to the catalog.
    pub fn add_product(&self, id: &str, title: &str, price: i64, origin_price: i64) {
        self.lock().products.push(FakeProduct {
            id: id.to_string(),
            title: title.to_string(),
            category: "甜點".to_string(),
            price,
            origin_price,
        });
    }

    /// Put a line in the server cart and return its id.
    pub fn put_line(&self, product_id: &str, qty: u32) -> String {
        self.lock().add_line(product_id, qty)
    }

    /// Make every call to `route` fail from now on.
    pub fn fail(&self, route: &str) {
        self.lock().failing.insert(route.to_string());
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Forget the calls received so far.
    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    /// Quantity of the server cart line for `product_id`.
    #[must_use]
    pub fn qty_of(&self, product_id: &str) -> Option<u32> {
        self.lock()
            .cart
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.qty)
    }

    /// Number of lines in the server cart.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lock().cart.len()
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, FakeState> {
    state.lock().expect("Fake API state poisoned")
}

/// Record the call and return the failure response if the route is failing.
fn record(state: &mut FakeState, route: &str) -> Option<Response> {
    state.calls.push(route.to_string());
    state
        .failing
        .contains(route)
        .then(|| failure(StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE))
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn confirmed(message: &str) -> Response {
    Json(json!({ "success": true, "message": message })).into_response()
}

#[derive(Deserialize)]
struct LineBody {
    data: LineInput,
}

#[derive(Deserialize)]
struct LineInput {
    product_id: String,
    qty: u32,
}

async fn list_products(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "GET /products") {
        return response;
    }

    let category = query.get("category").filter(|c| !c.is_empty());
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| category.is_none_or(|c| &p.category == c))
        .map(FakeState::product_json)
        .collect();

    Json(json!({
        "success": true,
        "products": products,
        "pagination": {
            "total_pages": 1,
            "current_page": 1,
            "has_pre": false,
            "has_next": false,
            "category": category.cloned().unwrap_or_default(),
        },
    }))
    .into_response()
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "GET /product/{id}") {
        return response;
    }

    match state.product(&id) {
        Some(product) => Json(json!({
            "success": true,
            "product": FakeState::product_json(product),
        }))
        .into_response(),
        None => failure(StatusCode::NOT_FOUND, "找不到產品"),
    }
}

async fn get_cart(State(state): State<Shared>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "GET /cart") {
        return response;
    }
    Json(json!({ "success": true, "data": state.cart_json() })).into_response()
}

async fn add_to_cart(State(state): State<Shared>, Json(body): Json<LineBody>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "POST /cart") {
        return response;
    }
    if state.product(&body.data.product_id).is_none() {
        return failure(StatusCode::BAD_REQUEST, "找不到產品");
    }
    state.add_line(&body.data.product_id, body.data.qty);
    confirmed("已加入購物車")
}

async fn update_line(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<LineBody>,
) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "PUT /cart/{id}") {
        return response;
    }
    match state.cart.iter_mut().find(|l| l.id == id) {
        Some(line) => {
            line.product_id = body.data.product_id;
            line.qty = body.data.qty;
            confirmed("已更新購物車")
        }
        None => failure(StatusCode::BAD_REQUEST, "找不到購物車品項"),
    }
}

async fn remove_line(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "DELETE /cart/{id}") {
        return response;
    }
    state.cart.retain(|l| l.id != id);
    confirmed("已刪除")
}

async fn clear_cart(State(state): State<Shared>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "DELETE /carts") {
        return response;
    }
    state.cart.clear();
    confirmed("已全部刪除")
}

async fn submit_order(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    if let Some(response) = record(&mut state, "POST /order") {
        return response;
    }
    if body.pointer("/data/user/email").is_none() {
        return failure(StatusCode::BAD_REQUEST, "Email 欄位必填");
    }
    if state.cart.is_empty() {
        return failure(StatusCode::BAD_REQUEST, "購物車內沒有資料");
    }

    state.next_order += 1;
    let order_id = format!("-Order{}", state.next_order);
    let total = state.cart_total();
    state.cart.clear();

    Json(json!({
        "success": true,
        "message": "已建立訂單",
        "total": total,
        "create_at": 1_700_000_000,
        "orderId": order_id,
    }))
    .into_response()
}

// =============================================================================
// Storefront
// =============================================================================

/// A running storefront wired to a fresh fake API.
pub struct TestContext {
    pub api: FakeCommerceApi,
    pub client: reqwest::Client,
    base_url: String,
}

impl TestContext {
    /// Start the fake API and a storefront in front of it.
    pub async fn start() -> Self {
        let api = FakeCommerceApi::start().await;

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind storefront listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read storefront address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: addr.port(),
            base_url: base_url.clone(),
            api: CommerceApiConfig::new(&api.base_url(), API_PATH)
                .expect("Fake API config is valid"),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let app = shopfront_storefront::app(AppState::new(config));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api,
            client,
            base_url,
        }
    }

    /// Absolute URL of a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a storefront page and return status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Storefront request failed");
        let status = response.status();
        (status, response.text().await.expect("Unreadable body"))
    }

    /// POST a form as HTMX would and return status and body.
    pub async fn hx_post(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .post(self.url(path))
            .header("hx-request", "true")
            .form(form)
            .send()
            .await
            .expect("Storefront request failed");
        let status = response.status();
        (status, response.text().await.expect("Unreadable body"))
    }
}
