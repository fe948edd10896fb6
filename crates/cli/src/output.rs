//! Plain-text rendering for the terminal.

use std::io::{self, Write};

use shopfront_storefront::api::{Cart, OrderReceipt, Product, ProductList};
use shopfront_storefront::pages::{NoticeLevel, Notices};

pub fn listing(out: &mut impl Write, listing: &ProductList) -> io::Result<()> {
    for product in &listing.products {
        let was = if product.is_discounted() {
            format!(" (原價 {})", product.origin_price)
        } else {
            String::new()
        };
        writeln!(
            out,
            "{}  [{}] {}  NT$ {}{was}",
            product.id, product.category, product.title, product.price
        )?;
    }

    let pagination = &listing.pagination;
    if pagination.total_pages > 1 {
        writeln!(
            out,
            "-- 第 {} / {} 頁 --",
            pagination.current_page, pagination.total_pages
        )?;
    }
    Ok(())
}

pub fn product(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "{} [{}]", product.title, product.category)?;
    if product.is_discounted() {
        writeln!(
            out,
            "NT$ {} / {} (原價 NT$ {})",
            product.price, product.unit, product.origin_price
        )?;
    } else {
        writeln!(out, "NT$ {} / {}", product.price, product.unit)?;
    }
    if !product.description.is_empty() {
        writeln!(out, "{}", product.description)?;
    }
    if !product.content.is_empty() {
        writeln!(out, "{}", product.content)?;
    }
    Ok(())
}

pub fn cart(out: &mut impl Write, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "購物車目前是空的");
    }

    for line in &cart.carts {
        writeln!(
            out,
            "{}  {} x{}  NT$ {}  (product {})",
            line.id, line.product.title, line.qty, line.final_total, line.product_id
        )?;
    }
    writeln!(out, "總計 NT$ {}", cart.total)?;
    if cart.final_total.is_below(&cart.total) {
        writeln!(out, "折扣後 NT$ {}", cart.final_total)?;
    }
    Ok(())
}

pub fn receipt(out: &mut impl Write, receipt: &OrderReceipt) -> io::Result<()> {
    match receipt.created_at() {
        Some(at) => writeln!(
            out,
            "訂單 {}  NT$ {}  {}",
            receipt.order_id,
            receipt.total,
            at.to_rfc3339()
        ),
        None => writeln!(out, "訂單 {}  NT$ {}", receipt.order_id, receipt.total),
    }
}

pub fn notices(out: &mut impl Write, notices: &Notices) -> io::Result<()> {
    for notice in notices.iter() {
        let tag = match notice.level {
            NoticeLevel::Info => "通知",
            NoticeLevel::Error => "錯誤",
        };
        writeln!(out, "{tag}：{}", notice.message)?;
    }
    Ok(())
}
