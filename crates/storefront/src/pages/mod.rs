//! Page orchestration.
//!
//! Each page type lives for one HTTP request. It holds the snapshot of the
//! last server response, its loading flags and a [`Notices`] channel, and
//! talks to the remote API only through [`CommerceApi`](crate::api::CommerceApi).
//! Failures never escape a page; they become notices.

pub mod cart;
pub mod catalog;
pub mod loading;
pub mod notice;
pub mod product;

#[cfg(test)]
pub(crate) mod testing;

pub use cart::{CartPage, CheckoutOutcome};
pub use catalog::CatalogPage;
pub use loading::{LoadingFlag, LoadingGuard, LoadingState};
pub use notice::{Notice, NoticeLevel, Notices};
pub use product::ProductPage;
