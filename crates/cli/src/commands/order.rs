//! Checkout command.

use std::io::Write;

use shopfront_core::OrderForm;
use shopfront_storefront::api::CommerceApi;
use shopfront_storefront::pages::{CartPage, CheckoutOutcome, Notices};

use super::CliError;
use crate::output;

/// `shopfront order --email .. --name .. --tel .. --address .. [--message ..]`
///
/// The cart is read first so an empty cart is refused without submitting.
pub async fn place<A: CommerceApi>(
    api: &A,
    form: &OrderForm,
    out: &mut impl Write,
) -> Result<Notices, CliError> {
    let mut page = CartPage::new(api);
    page.load_cart().await;

    let outcome = page.submit_order(form).await;
    if let CheckoutOutcome::Invalid(errors) = &outcome {
        for (field, message) in errors.iter() {
            page.notices_mut().error(format!("{}: {message}", field.as_str()));
        }
    }

    let (cart, notices) = page.into_parts();
    if let (CheckoutOutcome::Placed(receipt), Some(cart)) = (&outcome, &cart) {
        output::receipt(out, receipt)?;
        output::cart(out, cart)?;
    }
    Ok(notices)
}
