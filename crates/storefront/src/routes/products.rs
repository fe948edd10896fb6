//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use shopfront_core::{Price, ProductId, Quantity};
use tracing::instrument;

use super::HxRequest;
use crate::api::{Pagination, Product};
use crate::error::add_breadcrumb;
use crate::middleware::CspNonce;
use crate::pages::{CatalogPage, Notices, ProductPage};
use crate::state::AppState;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub category: String,
    pub description: String,
    pub content: String,
    pub origin_price: Price,
    pub price: Price,
    pub unit: String,
    pub image_url: String,
    pub gallery: Vec<String>,
    pub is_discounted: bool,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            content: product.content.clone(),
            origin_price: product.origin_price,
            price: product.price,
            unit: product.unit.clone(),
            image_url: product.image_url.clone(),
            gallery: product.gallery().map(str::to_owned).collect(),
            is_discounted: product.is_discounted(),
        }
    }
}

/// Pagination links for the listing.
#[derive(Clone, Default)]
pub struct PaginationView {
    pub current_page: u32,
    pub total_pages: u32,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl PaginationView {
    fn new(pagination: &Pagination, category: Option<&str>) -> Self {
        let href = |page: u32| {
            let mut url = format!("/products?page={page}");
            if let Some(category) = category {
                url.push_str("&category=");
                url.extend(url::form_urlencoded::byte_serialize(category.as_bytes()));
            }
            url
        };

        Self {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            prev_href: pagination
                .has_pre
                .then(|| href(pagination.current_page.saturating_sub(1).max(1))),
            next_href: pagination
                .has_next
                .then(|| href(pagination.current_page.saturating_add(1))),
        }
    }
}

/// One entry of the quantity selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QtyOption {
    pub value: u32,
    pub selected: bool,
}

/// Add-to-cart control state.
#[derive(Clone)]
pub struct AddToCartView {
    pub product_id: String,
    pub options: Vec<QtyOption>,
}

impl AddToCartView {
    fn new(product_id: &ProductId, selected: Quantity) -> Self {
        Self {
            product_id: product_id.to_string(),
            options: Quantity::SELECTABLE
                .map(|value| QtyOption {
                    value,
                    selected: value == selected.get(),
                })
                .collect(),
        }
    }
}

/// Listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub page: Option<u32>,
    pub category: Option<String>,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub qty: Option<u32>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub category: Option<String>,
    pub pagination: PaginationView,
    pub nonce: String,
    pub notices: Notices,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub product: Option<ProductView>,
    pub cart_form: AddToCartView,
    pub nonce: String,
    pub notices: Notices,
}

/// Add-to-cart control fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "fragments/add_to_cart.html")]
pub struct AddToCartTemplate {
    pub cart_form: AddToCartView,
    pub notices: Notices,
}

/// Display the product listing.
#[instrument(skip(state, nonce))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
    CspNonce(nonce): CspNonce,
) -> ProductsIndexTemplate {
    let category = query.category.filter(|c| !c.trim().is_empty());

    let mut page = CatalogPage::new(state.api());
    page.load_products(query.page.unwrap_or(1), category.as_deref())
        .await;
    let (listing, notices) = page.into_parts();

    ProductsIndexTemplate {
        products: listing.products.iter().map(ProductView::from).collect(),
        pagination: PaginationView::new(&listing.pagination, category.as_deref()),
        category,
        nonce,
        notices,
    }
}

/// Display a product.
///
/// A product that cannot be read still renders the page, with a notice and
/// an empty product section.
#[instrument(skip(state, nonce), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    CspNonce(nonce): CspNonce,
) -> ProductShowTemplate {
    let id = ProductId::new(id);
    render_show(&state, &id, Quantity::ONE, Notices::new(), nonce).await
}

/// Add the product to the cart (HTMX).
///
/// Only the add-to-cart control is swapped; no cart view is reloaded.
#[instrument(skip(state, form, nonce), fields(product_id = %id))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<String>,
    HxRequest(hx): HxRequest,
    CspNonce(nonce): CspNonce,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let id = ProductId::new(id);
    let qty = Quantity::from_selector(form.qty.unwrap_or(Quantity::MIN));

    let mut page = ProductPage::new(state.api());
    if page.add_to_cart(id.clone(), qty).await {
        add_breadcrumb(
            "cart",
            "Added to cart",
            &[("product_id", id.as_str()), ("qty", &qty.to_string())],
        );
    }
    let (_, notices) = page.into_parts();

    if hx {
        AddToCartTemplate {
            cart_form: AddToCartView::new(&id, qty),
            notices,
        }
        .into_response()
    } else {
        render_show(&state, &id, qty, notices, nonce)
            .await
            .into_response()
    }
}

async fn render_show(
    state: &AppState,
    id: &ProductId,
    selected: Quantity,
    mut notices: Notices,
    nonce: String,
) -> ProductShowTemplate {
    let mut page = ProductPage::new(state.api());
    page.load_product(id).await;
    let (product, loaded_notices) = page.into_parts();
    notices.extend(loaded_notices);

    ProductShowTemplate {
        product: product.as_ref().map(ProductView::from),
        cart_form: AddToCartView::new(id, selected),
        nonce,
        notices,
    }
}
