//! JSON API route handlers.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::ContactRepository;
use crate::error::Result;
use crate::models::Contact;
use crate::state::AppState;

/// Response body for the contact listing.
#[derive(Debug, Serialize)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

/// List all contacts as JSON.
///
/// GET /api/contacts
///
/// Coordinates are included so map views can plot entries directly.
pub async fn contacts(State(state): State<AppState>) -> Result<Json<ContactsResponse>> {
    let contacts = ContactRepository::new(state.pool()).list().await?;

    Ok(Json(ContactsResponse { contacts }))
}
