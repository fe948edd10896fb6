//! Cart commands.
//!
//! Mutations print the cart as reloaded after the change.

use std::io::Write;

use shopfront_core::{CartItemId, ProductId, Quantity};
use shopfront_storefront::api::CommerceApi;
use shopfront_storefront::pages::{CartPage, Notices, ProductPage};

use super::CliError;
use crate::output;

/// Shown when a quantity below one is requested.
const INVALID_QTY: &str = "商品數量至少為 1";

/// Shown when `cart add` asks for more than the product page offers.
const QTY_OVER_SELECTABLE: &str = "商品數量最多為 10";

/// Quantity for `cart add`, limited to what the product page selector offers.
fn selectable_qty(qty: u32) -> Result<Quantity, &'static str> {
    let qty = Quantity::new(qty).map_err(|_| INVALID_QTY)?;
    if Quantity::SELECTABLE.contains(&qty.get()) {
        Ok(qty)
    } else {
        Err(QTY_OVER_SELECTABLE)
    }
}

fn finish<A: CommerceApi>(page: CartPage<'_, A>, out: &mut impl Write) -> Result<Notices, CliError> {
    let (cart, notices) = page.into_parts();
    if let Some(cart) = &cart {
        output::cart(out, cart)?;
    }
    Ok(notices)
}

/// `shopfront cart show`
pub async fn show<A: CommerceApi>(api: &A, out: &mut impl Write) -> Result<Notices, CliError> {
    let mut page = CartPage::new(api);
    page.load_cart().await;
    finish(page, out)
}

/// `shopfront cart add <product-id> [--qty N]`
///
/// Like the product page, nothing is read back; the server's message is
/// the only output. A quantity outside 1-10 is refused and nothing is sent.
pub async fn add<A: CommerceApi>(api: &A, product_id: &str, qty: u32) -> Notices {
    let qty = match selectable_qty(qty) {
        Ok(qty) => qty,
        Err(message) => {
            let mut notices = Notices::new();
            notices.error(message);
            return notices;
        }
    };

    let mut page = ProductPage::new(api);
    page.add_to_cart(ProductId::new(product_id), qty).await;
    let (_, notices) = page.into_parts();
    notices
}

/// `shopfront cart qty <item-id> <product-id> <qty>`
pub async fn set_qty<A: CommerceApi>(
    api: &A,
    item_id: &str,
    product_id: &str,
    qty: u32,
    out: &mut impl Write,
) -> Result<Notices, CliError> {
    let mut page = CartPage::new(api);
    match Quantity::new(qty) {
        Ok(qty) => {
            page.update_item_qty(&CartItemId::new(item_id), ProductId::new(product_id), qty)
                .await;
        }
        Err(_) => page.notices_mut().error(INVALID_QTY),
    }
    finish(page, out)
}

/// `shopfront cart remove <item-id>`
pub async fn remove<A: CommerceApi>(
    api: &A,
    item_id: &str,
    out: &mut impl Write,
) -> Result<Notices, CliError> {
    let mut page = CartPage::new(api);
    page.remove_item(&CartItemId::new(item_id)).await;
    finish(page, out)
}

/// `shopfront cart clear`
pub async fn clear<A: CommerceApi>(api: &A, out: &mut impl Write) -> Result<Notices, CliError> {
    let mut page = CartPage::new(api);
    page.clear_cart().await;
    finish(page, out)
}
