//! LINE profile sync.
//!
//! The web client calls this after LIFF login with the current profile.
//! Upserts the user row; profile fields are last-write-wins.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use malai_core::LineUserId;

use crate::db::UserRepository;
use crate::db::users::LineProfile;
use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub line_id: Option<LineUserId>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Upsert a user from the LINE profile.
#[instrument(skip(state, request))]
pub async fn sync(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> Result<Json<Value>> {
    let line_id = request
        .line_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Line ID required".to_owned()))?;

    let users = UserRepository::new(state.pool());
    let user = users
        .sync_profile(
            &line_id,
            &LineProfile {
                display_name: request.display_name,
                picture_url: request.picture_url,
                email: request.email,
            },
        )
        .await
        .map_err(|e| AppError::database("Failed to sync user", e))?;

    tracing::debug!(user_id = %user.id, "profile synced");

    Ok(Json(json!({ "user": user })))
}
