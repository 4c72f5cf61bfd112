//! User repository for database operations.

use sqlx::SqlitePool;

use rolodex_core::{UserId, Username};

use super::RepositoryError;
use crate::models::user::{NewUser, User};

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, first_name, last_name, username, password_hash
            FROM users
            WHERE username = ?
            ",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their ID.
    ///
    /// The returned record includes the password hash; callers must not render
    /// it to clients.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, first_name, last_name, username, password_hash
            FROM users
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Check whether a username is already taken.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        let row = sqlx::query("SELECT 1 FROM users WHERE username = ? LIMIT 1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Create a new user with an already-hashed password.
    ///
    /// Uniqueness is enforced by the `UNIQUE` constraint on `username`, so
    /// concurrent creates of the same name resolve atomically: exactly one
    /// insert wins and the rest surface as `Conflict`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user: &NewUser,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO users (first_name, last_name, username, password_hash)
            VALUES (?, ?, ?, ?)
            ",
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(password_hash)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(User {
            id: UserId::new(result.last_insert_rowid()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            password_hash: password_hash.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::test_support;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            username: Username::parse(username).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_username_exists_false_before_true_after() {
        let pool = test_support::pool().await;
        let repo = UserRepository::new(&pool);
        let name = Username::parse("alice").unwrap();

        assert!(!repo.username_exists(&name).await.unwrap());
        repo.create(&new_user("alice"), "phc-hash").await.unwrap();
        assert!(repo.username_exists(&name).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_username_none_before_some_after() {
        let pool = test_support::pool().await;
        let repo = UserRepository::new(&pool);
        let name = Username::parse("bob").unwrap();

        assert!(repo.get_by_username(&name).await.unwrap().is_none());

        let created = repo.create(&new_user("bob"), "phc-hash").await.unwrap();
        let found = repo.get_by_username(&name).await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.username, name);
        assert_eq!(found.password_hash, "phc-hash");
    }

    #[tokio::test]
    async fn test_get_by_id_round_trips() {
        let pool = test_support::pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo.create(&new_user("carol"), "phc-hash").await.unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.first_name, "Test");
        assert_eq!(found.last_name, "User");
        assert_eq!(found.username.as_str(), "carol");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_support::pool().await;
        let repo = UserRepository::new(&pool);

        repo.create(&new_user("dave"), "hash-one").await.unwrap();
        let result = repo.create(&new_user("dave"), "hash-two").await;
        assert!(matches!(result, Err(RepositoryError::Conflict(_))));
    }
}
