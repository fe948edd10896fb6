//! In-memory [`CommerceApi`] for page tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Mutex;

use rust_decimal::Decimal;
use shopfront_core::{CartItemId, OrderDraft, OrderId, Price, ProductId, Quantity};

use super::loading::{LoadingFlag, LoadingState};
use crate::api::{
    ApiError, Cart, CartItem, CartLineInput, CartProduct, CommerceApi, OrderReceipt, Pagination,
    Product, ProductList,
};

/// Records every call and serves a mutable in-memory cart.
#[derive(Default)]
pub struct FakeApi {
    cart: Mutex<Cart>,
    products: Mutex<Vec<Product>>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<Vec<&'static str>>,
    watched: Mutex<Option<LoadingFlag>>,
    flag_states: Mutex<Vec<LoadingState>>,
}

pub fn sample_product(id: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("產品 {id}"),
        category: "甜甜圈".to_string(),
        description: "濃郁的草莓風味".to_string(),
        content: "https://example.com/donut".to_string(),
        origin_price: Price::from(150),
        price: Price::from(100),
        unit: "個".to_string(),
        image_url: "https://images.example.com/donut.jpg".to_string(),
        images_url: Vec::new(),
        is_enabled: true,
    }
}

pub fn cart_line(id: &str, product: &Product, qty: u32) -> CartItem {
    let total = line_total(product.price, qty);
    CartItem {
        id: CartItemId::new(id),
        product_id: product.id.clone(),
        qty: Quantity::new(qty).unwrap(),
        total,
        final_total: total,
        product: CartProduct {
            title: product.title.clone(),
            image_url: product.image_url.clone(),
            unit: product.unit.clone(),
            price: product.price,
        },
    }
}

fn line_total(price: Price, qty: u32) -> Price {
    Price::new(price.amount() * Decimal::from(qty))
}

fn server_error(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: message.to_string(),
    }
}

impl FakeApi {
    pub fn put_line(&self, line: CartItem) {
        let mut cart = self.cart.lock().unwrap();
        cart.carts.push(line);
        recompute(&mut cart);
    }

    pub fn put_product(&self, product: Product) {
        self.products.lock().unwrap().push(product);
    }

    /// Make every later call of `op` fail.
    pub fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Record the state of `flag` at every later call.
    pub fn watch(&self, flag: &LoadingFlag) {
        *self.watched.lock().unwrap() = Some(flag.clone());
    }

    pub fn server_cart(&self) -> Cart {
        self.cart.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn flag_states(&self) -> Vec<LoadingState> {
        self.flag_states.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(op);
        if let Some(flag) = self.watched.lock().unwrap().as_ref() {
            self.flag_states.lock().unwrap().push(flag.state());
        }
        if self.failing.lock().unwrap().contains(op) {
            return Err(server_error(500, "伺服器暫時無法處理"));
        }
        Ok(())
    }

    fn find_product(&self, id: &ProductId) -> Option<Product> {
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
    }
}

fn recompute(cart: &mut Cart) {
    let total = cart
        .carts
        .iter()
        .fold(Decimal::ZERO, |sum, line| sum + line.total.amount());
    cart.total = Price::new(total);
    cart.final_total = cart.total;
}

impl CommerceApi for FakeApi {
    async fn list_products(&self, page: u32, category: Option<&str>) -> Result<ProductList, ApiError> {
        self.record("list_products")?;
        let products = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| category.is_none_or(|c| p.category == c))
            .cloned()
            .collect();
        Ok(ProductList {
            products,
            pagination: Pagination {
                total_pages: 1,
                current_page: page,
                has_pre: false,
                has_next: false,
                category: category.unwrap_or_default().to_string(),
            },
        })
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.record("get_product")?;
        self.find_product(id)
            .ok_or_else(|| server_error(404, "找不到產品"))
    }

    async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.record("get_cart")?;
        Ok(self.server_cart())
    }

    async fn add_to_cart(&self, line: &CartLineInput) -> Result<String, ApiError> {
        self.record("add_to_cart")?;
        let product = self
            .find_product(&line.product_id)
            .ok_or_else(|| server_error(400, "找不到產品"))?;
        let id = format!("line-{}", self.cart.lock().unwrap().carts.len());
        self.put_line(cart_line(&id, &product, line.qty.get()));
        Ok("已加入購物車".to_string())
    }

    async fn update_cart_item(
        &self,
        item_id: &CartItemId,
        line: &CartLineInput,
    ) -> Result<String, ApiError> {
        self.record("update_cart_item")?;
        let mut cart = self.cart.lock().unwrap();
        let item = cart
            .carts
            .iter_mut()
            .find(|item| &item.id == item_id)
            .ok_or_else(|| server_error(400, "找不到購物車項目"))?;
        item.product_id = line.product_id.clone();
        item.qty = line.qty;
        item.total = line_total(item.product.price, line.qty.get());
        item.final_total = item.total;
        recompute(&mut cart);
        Ok("已更新購物車".to_string())
    }

    async fn remove_cart_item(&self, item_id: &CartItemId) -> Result<String, ApiError> {
        self.record("remove_cart_item")?;
        let mut cart = self.cart.lock().unwrap();
        let before = cart.carts.len();
        cart.carts.retain(|item| &item.id != item_id);
        if cart.carts.len() == before {
            return Err(server_error(400, "找不到購物車項目"));
        }
        recompute(&mut cart);
        Ok("已刪除".to_string())
    }

    async fn clear_cart(&self) -> Result<String, ApiError> {
        self.record("clear_cart")?;
        *self.cart.lock().unwrap() = Cart::default();
        Ok("已全部刪除".to_string())
    }

    async fn submit_order(&self, _draft: &OrderDraft) -> Result<OrderReceipt, ApiError> {
        self.record("submit_order")?;
        let mut cart = self.cart.lock().unwrap();
        let total = cart.final_total;
        *cart = Cart::default();
        Ok(OrderReceipt {
            order_id: OrderId::new("order-1"),
            total,
            create_at: 1_700_000_000,
            message: "已建立訂單".to_string(),
        })
    }
}
