//! Catalog commands.

use std::io::Write;

use shopfront_core::ProductId;
use shopfront_storefront::api::CommerceApi;
use shopfront_storefront::pages::{CatalogPage, Notices, ProductPage};

use super::CliError;
use crate::output;

/// `shopfront products`
pub async fn products<A: CommerceApi>(
    api: &A,
    page: u32,
    category: Option<&str>,
    out: &mut impl Write,
) -> Result<Notices, CliError> {
    let mut catalog = CatalogPage::new(api);
    catalog.load_products(page, category).await;
    let (listing, notices) = catalog.into_parts();

    output::listing(out, &listing)?;
    Ok(notices)
}

/// `shopfront product <id>`
pub async fn product<A: CommerceApi>(
    api: &A,
    id: &str,
    out: &mut impl Write,
) -> Result<Notices, CliError> {
    let mut page = ProductPage::new(api);
    page.load_product(&ProductId::new(id)).await;
    let (product, notices) = page.into_parts();

    if let Some(product) = &product {
        output::product(out, product)?;
    }
    Ok(notices)
}
