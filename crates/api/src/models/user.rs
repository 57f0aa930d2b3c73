//! User domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use malai_core::{LineUserId, UserId};

/// A storefront user, keyed by LINE identity.
///
/// Created on first auth sync or first order; profile fields update with
/// last-write-wins semantics on each sync. There is no deletion path.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// LINE platform user ID (external identity).
    pub line_id: LineUserId,
    /// Display name from the LINE profile.
    pub display_name: Option<String>,
    /// Avatar URL from the LINE profile.
    pub picture_url: Option<String>,
    /// Email, when the LINE profile shares one.
    pub email: Option<String>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
