//! Product listing orchestration.

use tracing::instrument;

use super::notice::Notices;
use crate::api::{CommerceApi, ProductList};

/// State of the product listing page.
pub struct CatalogPage<'a, A> {
    api: &'a A,
    listing: ProductList,
    notices: Notices,
}

impl<'a, A: CommerceApi> CatalogPage<'a, A> {
    #[must_use]
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            listing: ProductList::default(),
            notices: Notices::new(),
        }
    }

    #[must_use]
    pub const fn listing(&self) -> &ProductList {
        &self.listing
    }

    #[must_use]
    pub fn into_parts(self) -> (ProductList, Notices) {
        (self.listing, self.notices)
    }

    /// Read one page of the listing. On failure the listing stays empty.
    #[instrument(skip(self))]
    pub async fn load_products(&mut self, page: u32, category: Option<&str>) -> bool {
        match self.api.list_products(page.max(1), category).await {
            Ok(listing) => {
                self.listing = listing;
                true
            }
            Err(e) => {
                self.notices.api_error(&e);
                false
            }
        }
    }
}
