//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::middleware::CspNonce;
use crate::pages::Notices;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nonce: String,
    pub notices: Notices,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn home(CspNonce(nonce): CspNonce) -> HomeTemplate {
    HomeTemplate {
        nonce,
        notices: Notices::new(),
    }
}
