//! Contact CRUD route handlers.
//!
//! Create and detail pages are open to anonymous visitors; edit and delete
//! require a logged-in session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rolodex_core::types::ContactId;
use serde::Deserialize;

use crate::db::{ContactRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{Contact, CurrentUser, NewContact};
use crate::services::geocoder::GeocodeMatch;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Contact form data, shared by the create and edit pages.
///
/// Checkbox fields arrive as `Some("on")` when ticked and are absent
/// otherwise, so they are modeled as `Option<String>`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub contact_by_email: Option<String>,
    pub contact_by_phone: Option<String>,
    pub contact_by_mail: Option<String>,
}

impl ContactForm {
    /// Combine the typed fields with a geocoder match into a storable record.
    ///
    /// The stored address is the geocoder's formatted name, not the raw
    /// input, so every saved contact carries a normalized address alongside
    /// its coordinates.
    fn to_new_contact(&self, place: &GeocodeMatch) -> NewContact {
        NewContact {
            prefix: self.prefix.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            contact_by_email: self.contact_by_email.is_some(),
            contact_by_phone: self.contact_by_phone.is_some(),
            contact_by_mail: self.contact_by_mail.is_some(),
            address: place.formatted_address.clone(),
            lat: place.latitude,
            lng: place.longitude,
        }
    }

    /// Rebuild a form from a stored contact, for prefilling the edit page.
    fn from_contact(contact: &Contact) -> Self {
        let checkbox = |flag: bool| flag.then(|| "on".to_string());
        Self {
            prefix: contact.prefix.clone(),
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            address: contact.address.clone(),
            contact_by_email: checkbox(contact.contact_by_email),
            contact_by_phone: checkbox(contact.contact_by_phone),
            contact_by_mail: checkbox(contact.contact_by_mail),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

#[derive(Template, WebTemplate)]
#[template(path = "contacts/create.html")]
pub struct CreateTemplate {
    pub current_user: Option<CurrentUser>,
    pub error: Option<String>,
    pub form: ContactForm,
}

#[derive(Template, WebTemplate)]
#[template(path = "contacts/detail.html")]
pub struct DetailTemplate {
    pub current_user: Option<CurrentUser>,
    pub contact: Contact,
}

#[derive(Template, WebTemplate)]
#[template(path = "contacts/edit.html")]
pub struct EditTemplate {
    pub current_user: Option<CurrentUser>,
    pub contact_id: ContactId,
    pub error: Option<String>,
    pub form: ContactForm,
}

#[derive(Template, WebTemplate)]
#[template(path = "contacts/delete.html")]
pub struct DeleteTemplate {
    pub current_user: Option<CurrentUser>,
    pub contact: Contact,
}

// =============================================================================
// Helpers
// =============================================================================

/// Parse a path segment into a contact id, treating garbage as a missing
/// record rather than a bad request.
fn parse_contact_id(raw: &str) -> Result<ContactId> {
    raw.parse::<i64>()
        .map(ContactId::new)
        .map_err(|_| AppError::NotFound(format!("contact {raw}")))
}

const GEOCODE_MISS_MESSAGE: &str =
    "Could not find that address. Check the address and try again.";

// =============================================================================
// Create Routes
// =============================================================================

/// Display the create-contact page.
pub async fn create_page(OptionalAuth(current_user): OptionalAuth) -> CreateTemplate {
    CreateTemplate {
        current_user,
        error: None,
        form: ContactForm::default(),
    }
}

/// Handle create-contact form submission.
///
/// Geocoding failures of any kind re-render the form with the typed values
/// intact so the visitor can correct the address without retyping.
pub async fn create(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let place = match state.geocoder().lookup(&form.address).await {
        Ok(places) => match places.into_iter().next() {
            Some(place) => place,
            None => {
                return Ok(CreateTemplate {
                    current_user,
                    error: Some(GEOCODE_MISS_MESSAGE.to_string()),
                    form,
                }
                .into_response());
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "geocoder lookup failed");
            return Ok(CreateTemplate {
                current_user,
                error: Some("Address lookup failed. Try again in a moment.".to_string()),
                form,
            }
            .into_response());
        }
    };

    let contacts = ContactRepository::new(state.pool());
    let id = contacts.create(&form.to_new_contact(&place)).await?;
    tracing::info!(contact_id = %id, "contact created");

    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Detail Route
// =============================================================================

/// Display a single contact.
pub async fn detail(
    State(state): State<AppState>,
    OptionalAuth(current_user): OptionalAuth,
    Path(raw_id): Path<String>,
) -> Result<DetailTemplate> {
    let id = parse_contact_id(&raw_id)?;
    let contacts = ContactRepository::new(state.pool());

    let contact = contacts
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("contact {id}")))?;

    Ok(DetailTemplate {
        current_user,
        contact,
    })
}

// =============================================================================
// Edit Routes
// =============================================================================

/// Display the edit page, prefilled from the stored contact.
pub async fn edit_page(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(raw_id): Path<String>,
) -> Result<EditTemplate> {
    let id = parse_contact_id(&raw_id)?;
    let contacts = ContactRepository::new(state.pool());

    let contact = contacts
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("contact {id}")))?;

    Ok(EditTemplate {
        current_user: Some(current_user),
        contact_id: id,
        error: None,
        form: ContactForm::from_contact(&contact),
    })
}

/// Handle edit form submission.
///
/// A geocode miss re-renders the form; a geocoder outage is surfaced as a
/// gateway error rather than silently keeping the old coordinates.
pub async fn edit(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(raw_id): Path<String>,
    Form(form): Form<ContactForm>,
) -> Result<Response> {
    let id = parse_contact_id(&raw_id)?;

    let place = match state.geocoder().lookup(&form.address).await {
        Ok(places) => match places.into_iter().next() {
            Some(place) => place,
            None => {
                return Ok(EditTemplate {
                    current_user: Some(current_user),
                    contact_id: id,
                    error: Some(GEOCODE_MISS_MESSAGE.to_string()),
                    form,
                }
                .into_response());
            }
        },
        Err(e) => return Err(AppError::Geocoder(e)),
    };

    let contacts = ContactRepository::new(state.pool());
    match contacts.update(id, &form.to_new_contact(&place)).await {
        Ok(()) => {
            tracing::info!(contact_id = %id, user_id = %current_user.id, "contact updated");
            Ok(Redirect::to("/").into_response())
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("contact {id}"))),
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Delete Routes
// =============================================================================

/// Display the delete confirmation page.
pub async fn delete_page(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(raw_id): Path<String>,
) -> Result<DeleteTemplate> {
    let id = parse_contact_id(&raw_id)?;
    let contacts = ContactRepository::new(state.pool());

    let contact = contacts
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("contact {id}")))?;

    Ok(DeleteTemplate {
        current_user: Some(current_user),
        contact,
    })
}

/// Handle delete confirmation.
///
/// Deleting an already-deleted contact is a no-op, so a double submit still
/// lands back on the index.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Path(raw_id): Path<String>,
) -> Result<Response> {
    let id = parse_contact_id(&raw_id)?;
    let contacts = ContactRepository::new(state.pool());

    contacts.delete(id).await?;
    tracing::info!(contact_id = %id, user_id = %current_user.id, "contact deleted");

    Ok(Redirect::to("/").into_response())
}
