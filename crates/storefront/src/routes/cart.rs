//! Cart route handlers.
//!
//! The cart page GET starts a new page lifetime: it reads the cart and
//! stores the result as the session snapshot. Each POST resumes from that
//! snapshot, runs one mutation followed by a reload, stores the new
//! snapshot and answers with the cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use shopfront_core::{CartItemId, Field, OrderForm, Price, ProductId, Quantity, ValidationErrors};
use tower_sessions::Session;
use tracing::instrument;

use super::HxRequest;
use crate::api::{Cart, CartItem, CommerceClient};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CspNonce;
use crate::middleware::session::{cart_snapshot, store_cart_snapshot};
use crate::pages::{CartPage, CheckoutOutcome, Notices};
use crate::state::AppState;

/// Shown when a quantity form posts a value below one.
pub const INVALID_QTY_MESSAGE: &str = "商品數量至少為 1";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub product_id: String,
    pub title: String,
    pub image_url: String,
    pub unit: String,
    pub qty: u32,
    /// `None` at the minimum quantity; the decrement button is disabled.
    pub decrement_to: Option<u32>,
    pub increment_to: u32,
    pub price: Price,
    pub total: Price,
    pub final_total: Price,
}

impl From<&CartItem> for CartLineView {
    fn from(line: &CartItem) -> Self {
        Self {
            id: line.id.to_string(),
            product_id: line.product_id.to_string(),
            title: line.product.title.clone(),
            image_url: line.product.image_url.clone(),
            unit: line.product.unit.clone(),
            qty: line.qty.get(),
            decrement_to: line.qty.decrement().map(Quantity::get),
            increment_to: line.qty.increment().get(),
            price: line.product.price,
            total: line.total,
            final_total: line.final_total,
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    /// Whether any read of the cart has succeeded in this page lifetime.
    pub loaded: bool,
    pub lines: Vec<CartLineView>,
    pub total: Price,
    pub final_total: Price,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn from_snapshot(cart: Option<&Cart>) -> Self {
        cart.map_or_else(
            || Self {
                loaded: false,
                lines: Vec::new(),
                total: Price::ZERO,
                final_total: Price::ZERO,
                item_count: 0,
            },
            |cart| Self {
                loaded: true,
                lines: cart.carts.iter().map(CartLineView::from).collect(),
                total: cart.total,
                final_total: cart.final_total,
                item_count: cart.item_count(),
            },
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether a coupon brought the total down.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.final_total.is_below(&self.total)
    }
}

/// One checkout input.
#[derive(Clone)]
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: &'static str,
    pub placeholder: &'static str,
    pub value: String,
    pub error: Option<&'static str>,
}

/// Checkout form display data.
#[derive(Clone)]
pub struct CheckoutFormView {
    pub fields: Vec<FieldView>,
    pub message: String,
}

impl CheckoutFormView {
    /// An empty form.
    #[must_use]
    pub fn blank() -> Self {
        Self::new(&OrderForm::default(), None)
    }

    /// The submitted values, with per-field messages if validation failed.
    #[must_use]
    pub fn new(form: &OrderForm, errors: Option<&ValidationErrors>) -> Self {
        let error = |field: Field| errors.and_then(|errors| errors.get(field));
        let input = |field: Field, label, input_type, placeholder, value: &str| FieldView {
            name: field.as_str(),
            label,
            input_type,
            placeholder,
            value: value.to_string(),
            error: error(field),
        };

        Self {
            fields: vec![
                input(Field::Email, "Email", "email", "請輸入 Email", &form.email),
                input(Field::Name, "收件人姓名", "text", "請輸入姓名", &form.name),
                input(Field::Tel, "收件人電話", "tel", "請輸入電話", &form.tel),
                input(Field::Address, "收件人地址", "text", "請輸入地址", &form.address),
            ],
            message: form.message.clone(),
        }
    }
}

/// Update quantity form data.
///
/// The whole line is posted back because the API replaces it on update.
#[derive(Debug, Deserialize)]
pub struct UpdateQtyForm {
    pub product_id: String,
    pub qty: u32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub form: CheckoutFormView,
    pub nonce: String,
    pub notices: Notices,
}

/// Cart panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "fragments/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    pub form: CheckoutFormView,
    pub notices: Notices,
}

/// Answer a cart POST from the page state after its operation ran.
async fn respond(
    session: &Session,
    page: CartPage<'_, CommerceClient>,
    form: CheckoutFormView,
    hx: bool,
    nonce: String,
) -> Result<Response> {
    let (cart, notices) = page.into_parts();
    store_cart_snapshot(session, cart.as_ref()).await?;
    let cart = CartView::from_snapshot(cart.as_ref());

    Ok(if hx {
        CartPanelTemplate {
            cart,
            form,
            notices,
        }
        .into_response()
    } else {
        CartShowTemplate {
            cart,
            form,
            nonce,
            notices,
        }
        .into_response()
    })
}

/// Display the cart page.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<CartShowTemplate> {
    let mut page = CartPage::new(state.api());
    page.load_cart().await;
    let (cart, notices) = page.into_parts();
    store_cart_snapshot(&session, cart.as_ref()).await?;

    Ok(CartShowTemplate {
        cart: CartView::from_snapshot(cart.as_ref()),
        form: CheckoutFormView::blank(),
        nonce,
        notices,
    })
}

/// Empty the cart (HTMX).
#[instrument(skip(state, session, nonce))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let mut page = CartPage::with_snapshot(state.api(), cart_snapshot(&session).await);
    if page.clear_cart().await {
        add_breadcrumb("cart", "Cleared cart", &[]);
    }
    respond(&session, page, CheckoutFormView::blank(), hx, nonce).await
}

/// Remove a line (HTMX).
#[instrument(skip(state, session, nonce), fields(item_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    HxRequest(hx): HxRequest,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let item_id = CartItemId::new(id);
    let mut page = CartPage::with_snapshot(state.api(), cart_snapshot(&session).await);
    if page.remove_item(&item_id).await {
        add_breadcrumb("cart", "Removed line", &[("item_id", item_id.as_str())]);
    }
    respond(&session, page, CheckoutFormView::blank(), hx, nonce).await
}

/// Set a line's quantity (HTMX).
///
/// A quantity below one is refused with a notice and nothing is sent.
#[instrument(skip(state, session, nonce, form), fields(item_id = %id, qty = form.qty))]
pub async fn update_qty(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    HxRequest(hx): HxRequest,
    CspNonce(nonce): CspNonce,
    Form(form): Form<UpdateQtyForm>,
) -> Result<Response> {
    if form.product_id.trim().is_empty() {
        return Err(AppError::BadRequest("missing product_id".to_string()));
    }

    let item_id = CartItemId::new(id);
    let mut page = CartPage::with_snapshot(state.api(), cart_snapshot(&session).await);

    match Quantity::new(form.qty) {
        Ok(qty) => {
            if page
                .update_item_qty(&item_id, ProductId::new(form.product_id), qty)
                .await
            {
                add_breadcrumb(
                    "cart",
                    "Changed quantity",
                    &[("item_id", item_id.as_str()), ("qty", &qty.to_string())],
                );
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "Refusing quantity update");
            page.notices_mut().error(INVALID_QTY_MESSAGE);
        }
    }

    respond(&session, page, CheckoutFormView::blank(), hx, nonce).await
}

/// Place the order (HTMX).
///
/// The submitted values come back in the form unless the order went
/// through.
#[instrument(skip(state, session, nonce, form))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    HxRequest(hx): HxRequest,
    CspNonce(nonce): CspNonce,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let mut page = CartPage::with_snapshot(state.api(), cart_snapshot(&session).await);

    let outcome = page.submit_order(&form).await;
    if let CheckoutOutcome::Placed(receipt) = &outcome {
        add_breadcrumb("order", "Placed order", &[("order_id", receipt.order_id.as_str())]);
    }

    let view = if outcome.resets_form() {
        CheckoutFormView::blank()
    } else if let CheckoutOutcome::Invalid(errors) = &outcome {
        CheckoutFormView::new(&form, Some(errors))
    } else {
        CheckoutFormView::new(&form, None)
    };

    respond(&session, page, view, hx, nonce).await
}
