//! Product detail page orchestration.

use shopfront_core::{ProductId, Quantity};
use tracing::instrument;

use super::loading::LoadingFlag;
use super::notice::Notices;
use crate::api::{CartLineInput, CommerceApi, Product};

/// Shown after adding to the cart when the server sends no message.
const ADDED_MESSAGE: &str = "已加入購物車";

/// State and operations of the product detail page.
///
/// Loading the product blocks the screen; adding to the cart only blocks
/// its button.
pub struct ProductPage<'a, A> {
    api: &'a A,
    product: Option<Product>,
    screen: LoadingFlag,
    button: LoadingFlag,
    notices: Notices,
}

impl<'a, A: CommerceApi> ProductPage<'a, A> {
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            product: None,
            screen: LoadingFlag::new(),
            button: LoadingFlag::new(),
            notices: Notices::new(),
        }
    }

    /// The loaded product, or `None` before loading or after a failed read.
    #[must_use]
    pub const fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    #[must_use]
    pub const fn screen(&self) -> &LoadingFlag {
        &self.screen
    }

    #[must_use]
    pub const fn button(&self) -> &LoadingFlag {
        &self.button
    }

    #[must_use]
    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    #[must_use]
    pub fn into_parts(self) -> (Option<Product>, Notices) {
        (self.product, self.notices)
    }

    /// Read the product.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn load_product(&mut self, id: &ProductId) -> bool {
        let _guard = self.screen.begin();
        match self.api.get_product(id).await {
            Ok(product) => {
                self.product = Some(product);
                true
            }
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }

    /// Add units of a product to the cart. Nothing is read back.
    #[instrument(skip(self), fields(product_id = %product_id, qty = %qty))]
    pub async fn add_to_cart(&mut self, product_id: ProductId, qty: Quantity) -> bool {
        let _guard = self.button.begin();
        let line = CartLineInput { product_id, qty };
        match self.api.add_to_cart(&line).await {
            Ok(message) => {
                self.notices.info(if message.is_empty() {
                    ADDED_MESSAGE.to_string()
                } else {
                    message
                });
                true
            }
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }
}
