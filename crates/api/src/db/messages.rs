//! Assistant exchange log.
//!
//! Every answered chat message is recorded with the user's question and the
//! assistant's reply. Logging failures never block the reply path.

use sqlx::PgPool;

use malai_core::LineUserId;

use super::RepositoryError;

/// Repository for the `line_messages` log table.
pub struct MessageLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MessageLogRepository<'a> {
    /// Create a new message log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Record one question/answer exchange.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn record(
        &self,
        line_id: &LineUserId,
        message: &str,
        ai_reply: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO line_messages (user_id, message, ai_reply)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(line_id)
        .bind(message)
        .bind(ai_reply)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
