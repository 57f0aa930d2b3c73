//! Catalog domain types.
//!
//! Products are read-only from this service's perspective; the catalog is
//! maintained out-of-band. Joined category/brand data serializes under the
//! `categories` / `brands` keys the web client expects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use malai_core::{Baht, BrandId, CategoryId, FavoriteId, ProductId, UserId};

/// A product category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: CategoryId,
    /// Thai display name.
    pub name: String,
    /// English name, used as the catalog filter key.
    pub name_en: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Joined category fields embedded in a product.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: CategoryId,
    pub name: String,
    pub name_en: String,
}

/// Joined brand fields embedded in a product.
#[derive(Debug, Clone, Serialize)]
pub struct BrandRef {
    pub id: BrandId,
    pub name: String,
}

/// A catalog product with its joined category/brand and review aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Baht,
    pub original_price: Option<Baht>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub stock: i32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub categories: Option<CategoryRef>,
    pub brands: Option<BrandRef>,
    /// Number of reviews (aggregate, computed in the list query).
    pub reviews_count: i64,
    /// Number of users who favorited this product.
    pub favorites_count: i64,
    /// Average review rating, rounded to one decimal place.
    pub avg_rating: f64,
}

/// A favorites list entry: the (user, product) pair with the joined product.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteEntry {
    pub id: FavoriteId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub created_at: DateTime<Utc>,
    pub products: Product,
}
