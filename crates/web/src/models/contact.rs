//! Contact domain types.

use serde::Serialize;

use rolodex_core::ContactId;

/// A contact book entry.
///
/// `address`, `lat` and `lng` are always written together from a single
/// geocoder resolution - never set independently.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique contact ID, assigned by the store, immutable after creation.
    pub id: ContactId,
    /// Title, e.g. "Dr." (may be empty).
    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    /// Free-text phone number.
    pub phone: String,
    pub email: String,
    /// Contact preference flags.
    pub contact_by_email: bool,
    pub contact_by_phone: bool,
    pub contact_by_mail: bool,
    /// Geocoder-normalized address text.
    pub address: String,
    /// Latitude of the geocoded address.
    pub lat: f64,
    /// Longitude of the geocoded address.
    pub lng: f64,
}

/// The eleven mutable contact fields, used for create and full-record update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub prefix: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub contact_by_email: bool,
    pub contact_by_phone: bool,
    pub contact_by_mail: bool,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_serializes_camel_case() {
        let contact = Contact {
            id: ContactId::new(1),
            prefix: "Ms.".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "5550142".to_string(),
            email: "ada@example.com".to_string(),
            contact_by_email: true,
            contact_by_phone: false,
            contact_by_mail: false,
            address: "221B Baker Street".to_string(),
            lat: 51.5,
            lng: -0.15,
        };

        let json = serde_json::to_value(&contact).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["contactByEmail"], true);
        assert_eq!(json["lat"], 51.5);
        // The password-free contact record has exactly twelve keys
        assert_eq!(json.as_object().unwrap().len(), 12);
    }
}
