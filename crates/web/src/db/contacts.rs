//! Contact repository for database operations.

use sqlx::SqlitePool;

use rolodex_core::ContactId;

use super::RepositoryError;
use crate::models::contact::{Contact, NewContact};

/// Repository for contact database operations.
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all contacts in insertion order.
    ///
    /// Returns an empty list, never an error, when the table is empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Contact>, RepositoryError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r"
            SELECT id, prefix, first_name, last_name, phone, email,
                   contact_by_email, contact_by_phone, contact_by_mail,
                   address, lat, lng
            FROM contacts
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    /// Get a contact by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(
            r"
            SELECT id, prefix, first_name, last_name, phone, email,
                   contact_by_email, contact_by_phone, contact_by_mail,
                   address, lat, lng
            FROM contacts
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }

    /// Insert a new contact and return its assigned ID.
    ///
    /// All eleven fields are written exactly as given; the caller has already
    /// resolved the address to its geocoded triple.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, contact: &NewContact) -> Result<ContactId, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO contacts
                (prefix, first_name, last_name, phone, email,
                 contact_by_email, contact_by_phone, contact_by_mail,
                 address, lat, lng)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&contact.prefix)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(contact.contact_by_email)
        .bind(contact.contact_by_phone)
        .bind(contact.contact_by_mail)
        .bind(&contact.address)
        .bind(contact.lat)
        .bind(contact.lng)
        .execute(self.pool)
        .await?;

        Ok(ContactId::new(result.last_insert_rowid()))
    }

    /// Replace every mutable field of a contact (full-record update).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(&self, id: ContactId, contact: &NewContact) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE contacts
            SET prefix = ?, first_name = ?, last_name = ?, phone = ?, email = ?,
                contact_by_email = ?, contact_by_phone = ?, contact_by_mail = ?,
                address = ?, lat = ?, lng = ?
            WHERE id = ?
            ",
        )
        .bind(&contact.prefix)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(contact.contact_by_email)
        .bind(contact.contact_by_phone)
        .bind(contact.contact_by_mail)
        .bind(&contact.address)
        .bind(contact.lat)
        .bind(contact.lng)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a contact by ID.
    ///
    /// Deleting a non-existent id is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ContactId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn sample_contact() -> NewContact {
        NewContact {
            prefix: "Dr.".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            phone: "3125550142".to_string(),
            email: "ada@example.com".to_string(),
            contact_by_email: true,
            contact_by_phone: false,
            contact_by_mail: true,
            address: "221B Baker Street, London, England".to_string(),
            lat: 51.523_77,
            lng: -0.158_56,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips_every_field() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let new = sample_contact();
        let id = repo.create(&new).await.unwrap();

        let contact = repo.get(id).await.unwrap().unwrap();
        assert_eq!(contact.id, id);
        assert_eq!(contact.prefix, new.prefix);
        assert_eq!(contact.first_name, new.first_name);
        assert_eq!(contact.last_name, new.last_name);
        assert_eq!(contact.phone, new.phone);
        assert_eq!(contact.email, new.email);
        assert_eq!(contact.contact_by_email, new.contact_by_email);
        assert_eq!(contact.contact_by_phone, new.contact_by_phone);
        assert_eq!(contact.contact_by_mail, new.contact_by_mail);
        assert_eq!(contact.address, new.address);
        assert!((contact.lat - new.lat).abs() < f64::EPSILON);
        assert!((contact.lng - new.lng).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let mut first = sample_contact();
        first.first_name = "First".to_string();
        let mut second = sample_contact();
        second.first_name = "Second".to_string();

        repo.create(&first).await.unwrap();
        repo.create(&second).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].first_name, "First");
        assert_eq!(all[1].first_name, "Second");
    }

    #[tokio::test]
    async fn test_list_empty_table_is_not_an_error() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        assert!(repo.get(ContactId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_all_fields() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let id = repo.create(&sample_contact()).await.unwrap();

        let replacement = NewContact {
            prefix: String::new(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            phone: String::new(),
            email: "grace@example.com".to_string(),
            contact_by_email: false,
            contact_by_phone: true,
            contact_by_mail: false,
            address: "1 Navy Yard, Arlington, Virginia".to_string(),
            lat: 38.880_6,
            lng: -77.070_2,
        };
        repo.update(id, &replacement).await.unwrap();

        let contact = repo.get(id).await.unwrap().unwrap();
        assert_eq!(contact.prefix, "");
        assert_eq!(contact.first_name, "Grace");
        assert_eq!(contact.last_name, "Hopper");
        assert_eq!(contact.phone, "");
        assert!(!contact.contact_by_email);
        assert!(contact.contact_by_phone);
        assert_eq!(contact.address, "1 Navy Yard, Arlington, Virginia");
    }

    #[tokio::test]
    async fn test_update_missing_contact_is_not_found() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let result = repo.update(ContactId::new(42), &sample_contact()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let id = repo.create(&sample_contact()).await.unwrap();
        repo.delete(id).await.unwrap();
        assert!(repo.get(id).await.unwrap().is_none());

        // Second delete of the same id is a no-op
        repo.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_after_delete() {
        let pool = test_support::pool().await;
        let repo = ContactRepository::new(&pool);

        let first = repo.create(&sample_contact()).await.unwrap();
        repo.delete(first).await.unwrap();
        let second = repo.create(&sample_contact()).await.unwrap();

        assert!(second.as_i64() > first.as_i64());
    }
}
