//! User repository.
//!
//! Users are keyed by their LINE identity. Creation happens on first auth
//! sync or first order; when a direct insert is rejected by the row-level
//! permission policy, creation falls back to the `create_user_from_api`
//! stored function, which runs with definer rights.

use sqlx::PgPool;

use malai_core::LineUserId;

use super::RepositoryError;
use crate::models::User;

/// Profile fields delivered by the LINE client SDK.
#[derive(Debug, Clone, Default)]
pub struct LineProfile {
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
    pub email: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a user by LINE ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_line_id(
        &self,
        line_id: &LineUserId,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, line_id, display_name, picture_url, email, created_at, updated_at
            FROM users
            WHERE line_id = $1
            ",
        )
        .bind(line_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create a user, falling back to the stored function when the direct
    /// insert is rejected for lack of privilege.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the LINE ID already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        line_id: &LineUserId,
        profile: &LineProfile,
    ) -> Result<User, RepositoryError> {
        match self.insert(line_id, profile).await {
            Ok(user) => Ok(user),
            Err(err) if err.is_permission_denied() => {
                tracing::warn!(
                    line_id = %line_id,
                    "direct user insert rejected, falling back to create_user_from_api"
                );
                self.create_via_function(line_id, profile).await
            }
            Err(err) => Err(err),
        }
    }

    async fn insert(
        &self,
        line_id: &LineUserId,
        profile: &LineProfile,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (line_id, display_name, picture_url, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, line_id, display_name, picture_url, email, created_at, updated_at
            ",
        )
        .bind(line_id)
        .bind(&profile.display_name)
        .bind(&profile.picture_url)
        .bind(&profile.email)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("line_id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(user)
    }

    /// Create a user through the `create_user_from_api` stored function.
    ///
    /// This exists only for the restricted-credential edge case where the
    /// direct insert is denied; it is not a retry.
    async fn create_via_function(
        &self,
        line_id: &LineUserId,
        profile: &LineProfile,
    ) -> Result<User, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            r"
            SELECT id, line_id, display_name, picture_url, email, created_at, updated_at
            FROM create_user_from_api($1, $2, $3, $4)
            ",
        )
        .bind(line_id)
        .bind(&profile.display_name)
        .bind(&profile.picture_url)
        .bind(&profile.email)
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    /// Resolve a user by LINE ID, creating one if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if lookup or creation fails.
    pub async fn get_or_create(
        &self,
        line_id: &LineUserId,
        profile: &LineProfile,
    ) -> Result<User, RepositoryError> {
        if let Some(user) = self.get_by_line_id(line_id).await? {
            return Ok(user);
        }
        self.create(line_id, profile).await
    }

    /// Upsert a user from an auth sync: create when absent, otherwise update
    /// profile fields with last-write-wins semantics (an absent incoming field
    /// keeps the stored value).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn sync_profile(
        &self,
        line_id: &LineUserId,
        profile: &LineProfile,
    ) -> Result<User, RepositoryError> {
        let Some(existing) = self.get_by_line_id(line_id).await? else {
            return self.create(line_id, profile).await;
        };

        let updated = sqlx::query_as::<_, User>(
            r"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                picture_url  = COALESCE($3, picture_url),
                email        = COALESCE($4, email),
                updated_at   = NOW()
            WHERE line_id = $1
            RETURNING id, line_id, display_name, picture_url, email, created_at, updated_at
            ",
        )
        .bind(line_id)
        .bind(&profile.display_name)
        .bind(&profile.picture_url)
        .bind(&profile.email)
        .fetch_optional(self.pool)
        .await?;

        // The row can only vanish if something deletes it mid-sync; fall back
        // to what we just read.
        Ok(updated.unwrap_or(existing))
    }
}
