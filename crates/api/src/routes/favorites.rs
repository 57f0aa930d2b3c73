//! Favorites listing and toggling.
//!
//! The client identifies the user by LINE ID; the internal row id is resolved
//! here. Listing for an unknown user is an empty list, toggling for an
//! unknown user creates the user row first.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use malai_core::{LineUserId, ProductId};

use crate::db::users::LineProfile;
use crate::db::{FavoriteRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::FavoriteEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(default)]
    pub user_id: Option<LineUserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleRequest {
    #[serde(default)]
    pub user_id: Option<LineUserId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
}

/// A user's favorites with the joined product data.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<FavoriteEntry>>> {
    let line_id = params
        .user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("User ID required".to_owned()))?;

    let users = UserRepository::new(state.pool());
    let Some(user) = users
        .get_by_line_id(&line_id)
        .await
        .map_err(|e| AppError::database("Failed to fetch favorites", e))?
    else {
        return Ok(Json(Vec::new()));
    };

    let favorites = FavoriteRepository::new(state.pool());
    let entries = favorites
        .list_for_user(user.id)
        .await
        .map_err(|e| AppError::database("Failed to fetch favorites", e))?;

    Ok(Json(entries))
}

/// Toggle a (user, product) favorite pair.
#[instrument(skip(state, request))]
pub async fn toggle(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<Value>> {
    let (line_id, product_id) = match (
        request.user_id.filter(|id| !id.is_empty()),
        request.product_id,
    ) {
        (Some(line_id), Some(product_id)) => (line_id, product_id),
        _ => {
            return Err(AppError::BadRequest(
                "User ID and Product ID required".to_owned(),
            ));
        }
    };

    let users = UserRepository::new(state.pool());
    let user = users
        .get_or_create(&line_id, &LineProfile::default())
        .await
        .map_err(|e| AppError::database("Failed to update favorite", e))?;

    let favorites = FavoriteRepository::new(state.pool());
    let favorited = favorites
        .toggle(user.id, product_id)
        .await
        .map_err(|e| AppError::database("Failed to update favorite", e))?;

    tracing::debug!(user_id = %user.id, %product_id, favorited, "favorite toggled");

    Ok(Json(json!({ "favorited": favorited })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_request_decodes_camel_case() {
        let request: ToggleRequest = serde_json::from_value(serde_json::json!({
            "userId": "U_customer",
            "productId": 7
        }))
        .expect("decode");
        assert_eq!(request.user_id.map(|id| id.as_str().to_owned()), Some("U_customer".to_owned()));
        assert_eq!(request.product_id, Some(ProductId::new(7)));
    }

    #[test]
    fn toggle_request_tolerates_missing_fields() {
        let request: ToggleRequest = serde_json::from_str("{}").expect("decode");
        assert!(request.user_id.is_none());
        assert!(request.product_id.is_none());
    }
}
