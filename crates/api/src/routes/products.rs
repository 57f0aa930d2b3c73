//! Catalog listing and categories.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::db::ProductRepository;
use crate::db::products::ProductFilter;
use crate::error::{AppError, Result};
use crate::models::Category;
use crate::state::AppState;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Query parameters for the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Category `name_en`; absent or `All` means no filter.
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListParams {
    fn into_filter(self) -> ProductFilter {
        let category = self
            .category
            .filter(|c| !c.is_empty() && c != "All");
        let search = self.search.filter(|s| !s.trim().is_empty());

        ProductFilter {
            category,
            search,
            page: self.page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: self
                .limit
                .unwrap_or(DEFAULT_LIMIT)
                .clamp(1, MAX_LIMIT),
        }
    }
}

/// Active products, newest first, with pagination metadata.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>> {
    let filter = params.into_filter();
    let page = filter.page;
    let limit = filter.limit;

    let products = ProductRepository::new(state.pool());
    let result = products
        .list(&filter)
        .await
        .map_err(|e| AppError::database("Failed to fetch products", e))?;

    let pages = if result.total == 0 {
        0
    } else {
        result.total.cast_unsigned().div_ceil(limit.cast_unsigned())
    };

    Ok(Json(json!({
        "products": result.products,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": result.total,
            "pages": pages,
        },
    })))
}

/// Active categories in display order.
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let products = ProductRepository::new(state.pool());
    let categories = products
        .list_categories()
        .await
        .map_err(|e| AppError::database("Failed to fetch categories", e))?;

    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_absent() {
        let filter = ListParams::default().into_filter();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 20);
        assert!(filter.category.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn all_category_means_no_filter() {
        let filter = ListParams {
            category: Some("All".to_owned()),
            ..ListParams::default()
        }
        .into_filter();
        assert!(filter.category.is_none());
    }

    #[test]
    fn named_category_is_kept() {
        let filter = ListParams {
            category: Some("dresses".to_owned()),
            ..ListParams::default()
        }
        .into_filter();
        assert_eq!(filter.category.as_deref(), Some("dresses"));
    }

    #[test]
    fn page_and_limit_are_clamped() {
        let filter = ListParams {
            page: Some(0),
            limit: Some(10_000),
            ..ListParams::default()
        }
        .into_filter();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, MAX_LIMIT);
    }

    #[test]
    fn blank_search_is_dropped() {
        let filter = ListParams {
            search: Some("   ".to_owned()),
            ..ListParams::default()
        }
        .into_filter();
        assert!(filter.search.is_none());
    }
}
