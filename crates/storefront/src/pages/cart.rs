//! Cart page orchestration.
//!
//! The page owns the last cart the server returned and never edits it
//! locally. Every mutation runs under the screen-blocking flag and, once the
//! server accepts it, is followed by exactly one cart read.

use shopfront_core::{CartItemId, OrderForm, ProductId, Quantity, ValidationErrors};
use tracing::instrument;

use super::loading::LoadingFlag;
use super::notice::Notices;
use crate::api::{Cart, CartLineInput, CommerceApi, OrderReceipt};

/// Shown when checkout is attempted against a cart known to be empty.
pub const EMPTY_CART_MESSAGE: &str = "購物車目前是空的";

/// Result of a checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// The form failed validation; nothing was sent.
    Invalid(ValidationErrors),
    /// The cart is empty; nothing was sent.
    EmptyCart,
    /// The server accepted the order.
    Placed(OrderReceipt),
    /// The server rejected the order or could not be reached.
    Failed,
}

impl CheckoutOutcome {
    /// Whether the submitted form should be cleared.
    #[must_use]
    pub const fn resets_form(&self) -> bool {
        matches!(self, Self::Placed(_))
    }
}

/// State and operations of the cart page.
pub struct CartPage<'a, A> {
    api: &'a A,
    cart: Option<Cart>,
    screen: LoadingFlag,
    notices: Notices,
}

impl<'a, A: CommerceApi> CartPage<'a, A> {
    /// Start a new page lifetime with no snapshot.
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self::with_snapshot(api, None)
    }

    /// Resume a page lifetime from a stored snapshot.
    #[must_use]
    pub fn with_snapshot(api: &'a A, cart: Option<Cart>) -> Self {
        Self {
            api,
            cart,
            screen: LoadingFlag::new(),
            notices: Notices::new(),
        }
    }

    /// The last cart the server returned, if any read has succeeded.
    #[must_use]
    pub const fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// The screen-blocking flag.
    #[must_use]
    pub const fn screen(&self) -> &LoadingFlag {
        &self.screen
    }

    #[must_use]
    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    /// The notice channel, for failures detected before any request.
    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Consume the page, returning its snapshot and notices.
    #[must_use]
    pub fn into_parts(self) -> (Option<Cart>, Notices) {
        (self.cart, self.notices)
    }

    /// Read the cart. On failure the previous snapshot is kept.
    #[instrument(skip(self))]
    pub async fn load_cart(&mut self) -> bool {
        match self.api.get_cart().await {
            Ok(cart) => {
                self.cart = Some(cart);
                true
            }
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }

    /// Empty the cart, then reload it.
    #[instrument(skip(self))]
    pub async fn clear_cart(&mut self) -> bool {
        let _guard = self.screen.begin();
        match self.api.clear_cart().await {
            Ok(_) => self.load_cart().await,
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }

    /// Remove one line, then reload the cart.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove_item(&mut self, item_id: &CartItemId) -> bool {
        let _guard = self.screen.begin();
        match self.api.remove_cart_item(item_id).await {
            Ok(_) => self.load_cart().await,
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }

    /// Set a line's quantity, then reload the cart.
    ///
    /// The full line is sent: the server expects the product id alongside
    /// the new quantity.
    #[instrument(skip(self), fields(item_id = %item_id, qty = %qty))]
    pub async fn update_item_qty(
        &mut self,
        item_id: &CartItemId,
        product_id: ProductId,
        qty: Quantity,
    ) -> bool {
        let _guard = self.screen.begin();
        let line = CartLineInput { product_id, qty };
        match self.api.update_cart_item(item_id, &line).await {
            Ok(_) => self.load_cart().await,
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }

    /// Validate the checkout form and place the order.
    ///
    /// On success the cart is reloaded and a receipt notice is raised. The
    /// form itself is owned by the caller, which clears it only when
    /// [`CheckoutOutcome::resets_form`] holds.
    #[instrument(skip(self, form))]
    pub async fn submit_order(&mut self, form: &OrderForm) -> CheckoutOutcome {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(errors) => {
                tracing::debug!(fields = errors.iter().count(), "Checkout form rejected");
                return CheckoutOutcome::Invalid(errors);
            }
        };

        if self.cart.as_ref().is_some_and(Cart::is_empty) {
            self.notices.error(EMPTY_CART_MESSAGE);
            return CheckoutOutcome::EmptyCart;
        }

        let _guard = self.screen.begin();
        match self.api.submit_order(&draft).await {
            Ok(receipt) => {
                tracing::info!(order_id = %receipt.order_id, total = %receipt.total, "Order placed");
                self.notices.info(receipt_message(&receipt));
                self.load_cart().await;
                CheckoutOutcome::Placed(receipt)
            }
            Err(e) => {
                self.notices.api_error(&e);
                CheckoutOutcome::Failed
            }
        }
    }
}

fn receipt_message(receipt: &OrderReceipt) -> String {
    let headline = if receipt.message.is_empty() {
        "已建立訂單"
    } else {
        receipt.message.as_str()
    };
    format!(
        "{headline}（訂單編號 {}，金額 NT$ {}）",
        receipt.order_id, receipt.total
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pages::LoadingState;
    use crate::pages::testing::{FakeApi, cart_line, sample_product};
    use shopfront_core::order::messages;
    use shopfront_core::{Field, OrderId, Price};

    fn filled_form() -> OrderForm {
        OrderForm {
            email: "a@b.com".to_string(),
            name: "王小明".to_string(),
            tel: "0912345678".to_string(),
            address: "台北市信義區市府路 1 號".to_string(),
            message: String::new(),
        }
    }

    fn api_with_lines(qtys: &[u32]) -> FakeApi {
        let api = FakeApi::default();
        for (i, qty) in qtys.iter().enumerate() {
            api.put_line(cart_line(&format!("line-{i}"), &sample_product(&format!("p{i}")), *qty));
        }
        api
    }

    #[tokio::test]
    async fn test_load_cart_replaces_snapshot() {
        let api = api_with_lines(&[2]);
        let mut page = CartPage::new(&api);

        assert!(page.load_cart().await);

        let cart = page.cart().unwrap();
        assert_eq!(cart.carts.len(), 1);
        assert_eq!(*cart, api.server_cart());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_snapshot() {
        let api = api_with_lines(&[1]);
        let previous = api.server_cart();
        api.fail("get_cart");

        let mut page = CartPage::with_snapshot(&api, Some(previous.clone()));
        assert!(!page.load_cart().await);

        assert_eq!(page.cart(), Some(&previous));
        assert!(page.notices().has_errors());
    }

    #[tokio::test]
    async fn test_clear_cart_reloads_empty_cart() {
        let api = api_with_lines(&[1, 3]);
        let mut page = CartPage::new(&api);
        page.load_cart().await;
        api.reset_calls();

        assert!(page.clear_cart().await);

        assert_eq!(api.calls(), ["clear_cart", "get_cart"]);
        assert!(page.cart().unwrap().is_empty());
        assert_eq!(page.screen().state(), LoadingState::Idle);
    }

    #[tokio::test]
    async fn test_mutation_runs_under_screen_flag() {
        let api = api_with_lines(&[1]);
        let mut page = CartPage::new(&api);
        api.watch(page.screen());

        page.remove_item(&CartItemId::new("line-0")).await;

        assert_eq!(
            api.flag_states(),
            [LoadingState::Loading, LoadingState::Loading]
        );
        assert_eq!(page.screen().state(), LoadingState::Idle);
    }

    #[tokio::test]
    async fn test_remove_item_refetches_once() {
        let api = api_with_lines(&[1, 2]);
        let mut page = CartPage::new(&api);

        assert!(page.remove_item(&CartItemId::new("line-0")).await);

        assert_eq!(api.calls(), ["remove_cart_item", "get_cart"]);
        let cart = page.cart().unwrap();
        assert_eq!(cart.carts.len(), 1);
        assert_eq!(*cart, api.server_cart());
    }

    #[tokio::test]
    async fn test_update_qty_sends_full_line() {
        let api = api_with_lines(&[1]);
        let mut page = CartPage::new(&api);

        let updated = page
            .update_item_qty(
                &CartItemId::new("line-0"),
                ProductId::new("p0"),
                Quantity::new(4).unwrap(),
            )
            .await;

        assert!(updated);
        assert_eq!(api.calls(), ["update_cart_item", "get_cart"]);
        let line = &page.cart().unwrap().carts[0];
        assert_eq!(line.qty.get(), 4);
        assert_eq!(line.product_id.as_str(), "p0");
        assert_eq!(page.cart().unwrap().total, Price::from(400));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_snapshot_and_skips_refetch() {
        let api = api_with_lines(&[2]);
        let mut page = CartPage::new(&api);
        page.load_cart().await;
        let before = page.cart().cloned();
        api.fail("remove_cart_item");
        api.reset_calls();

        assert!(!page.remove_item(&CartItemId::new("line-0")).await);

        assert_eq!(api.calls(), ["remove_cart_item"]);
        assert_eq!(page.cart().cloned(), before);
        assert!(page.notices().has_errors());
        assert_eq!(page.screen().state(), LoadingState::Idle);
    }

    #[tokio::test]
    async fn test_checkout_with_empty_address_sends_nothing() {
        let api = api_with_lines(&[1]);
        let mut page = CartPage::with_snapshot(&api, Some(api.server_cart()));
        let form = OrderForm {
            address: "  ".to_string(),
            ..filled_form()
        };

        let outcome = page.submit_order(&form).await;

        let CheckoutOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure, got {outcome:?}");
        };
        assert_eq!(errors.get(Field::Address), Some(messages::ADDRESS_REQUIRED));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_with_bad_email_sends_nothing() {
        let api = api_with_lines(&[1]);
        let mut page = CartPage::with_snapshot(&api, Some(api.server_cart()));
        let form = OrderForm {
            email: "not-an-email".to_string(),
            ..filled_form()
        };

        let outcome = page.submit_order(&form).await;

        let CheckoutOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure, got {outcome:?}");
        };
        assert_eq!(errors.get(Field::Email), Some(messages::EMAIL_FORMAT));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_on_empty_cart_sends_nothing() {
        let api = FakeApi::default();
        let mut page = CartPage::with_snapshot(&api, Some(Cart::default()));

        let outcome = page.submit_order(&filled_form()).await;

        assert!(matches!(outcome, CheckoutOutcome::EmptyCart));
        assert!(api.calls().is_empty());
        assert!(page.notices().has_errors());
    }

    #[tokio::test]
    async fn test_checkout_success_reloads_and_resets() {
        let api = api_with_lines(&[2]);
        let mut page = CartPage::with_snapshot(&api, Some(api.server_cart()));

        let outcome = page.submit_order(&filled_form()).await;

        let CheckoutOutcome::Placed(receipt) = &outcome else {
            panic!("expected order, got {outcome:?}");
        };
        assert_eq!(receipt.order_id, OrderId::new("order-1"));
        assert!(outcome.resets_form());
        assert_eq!(api.calls(), ["submit_order", "get_cart"]);
        assert!(page.cart().unwrap().is_empty());
        let notice = page.notices().iter().next().unwrap();
        assert!(!notice.is_error());
        assert!(notice.message.contains("order-1"));
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_form() {
        let api = api_with_lines(&[2]);
        api.fail("submit_order");
        let mut page = CartPage::with_snapshot(&api, Some(api.server_cart()));

        let outcome = page.submit_order(&filled_form()).await;

        assert!(matches!(outcome, CheckoutOutcome::Failed));
        assert!(!outcome.resets_form());
        assert_eq!(api.calls(), ["submit_order"]);
        assert_eq!(page.cart().unwrap().carts.len(), 1);
        assert_eq!(page.screen().state(), LoadingState::Idle);
    }

    #[test]
    fn test_receipt_message_falls_back() {
        let receipt = OrderReceipt {
            order_id: OrderId::new("o1"),
            total: Price::from(198),
            create_at: 0,
            message: String::new(),
        };
        assert_eq!(
            receipt_message(&receipt),
            "已建立訂單（訂單編號 o1，金額 NT$ 198）"
        );
    }
}
