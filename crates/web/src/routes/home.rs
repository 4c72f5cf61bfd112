//! Contact list page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::db::ContactRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Contact, CurrentUser};
use crate::state::AppState;

/// Contact list template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub current_user: Option<CurrentUser>,
    pub contacts: Vec<Contact>,
}

/// Display all contacts.
///
/// Open to everyone; logged-in users additionally see edit/delete links.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
) -> Result<IndexTemplate> {
    let contacts = ContactRepository::new(state.pool()).list().await?;

    Ok(IndexTemplate {
        current_user,
        contacts,
    })
}
