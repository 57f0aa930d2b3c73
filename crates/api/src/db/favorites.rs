//! Favorites repository.
//!
//! A favorite is the existence of a (user, product) row; toggling inserts or
//! deletes the pair. No soft-delete, no history.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use malai_core::{Baht, BrandId, CategoryId, FavoriteId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{BrandRef, CategoryRef, FavoriteEntry, Product};

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id: FavoriteId,
    user_id: UserId,
    product_id: ProductId,
    created_at: DateTime<Utc>,
    name: String,
    description: Option<String>,
    price: Baht,
    original_price: Option<Baht>,
    sku: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    stock: i32,
    sizes: Vec<String>,
    colors: Vec<String>,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    category_name_en: Option<String>,
    brand_id: Option<BrandId>,
    brand_name: Option<String>,
}

impl FavoriteRow {
    fn into_entry(self) -> FavoriteEntry {
        let categories = match (self.category_id, self.category_name, self.category_name_en) {
            (Some(id), Some(name), Some(name_en)) => Some(CategoryRef { id, name, name_en }),
            _ => None,
        };
        let brands = match (self.brand_id, self.brand_name) {
            (Some(id), Some(name)) => Some(BrandRef { id, name }),
            _ => None,
        };

        FavoriteEntry {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            created_at: self.created_at,
            products: Product {
                id: self.product_id,
                name: self.name,
                description: self.description,
                price: self.price,
                original_price: self.original_price,
                sku: self.sku,
                image_url: self.image_url,
                is_active: self.is_active,
                stock: self.stock,
                sizes: self.sizes,
                colors: self.colors,
                created_at: self.product_created_at,
                updated_at: self.product_updated_at,
                categories,
                brands,
                reviews_count: 0,
                favorites_count: 0,
                avg_rating: 0.0,
            },
        }
    }
}

/// Repository for favorite pairs.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    /// Create a new favorite repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's favorites with the joined product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<FavoriteEntry>, RepositoryError> {
        let rows = sqlx::query_as::<_, FavoriteRow>(
            r"
            SELECT f.id, f.user_id, f.product_id, f.created_at,
                   p.name, p.description, p.price, p.original_price, p.sku,
                   p.image_url, p.is_active, p.stock, p.sizes, p.colors,
                   p.created_at AS product_created_at,
                   p.updated_at AS product_updated_at,
                   c.id AS category_id, c.name AS category_name, c.name_en AS category_name_en,
                   b.id AS brand_id, b.name AS brand_name
            FROM user_favorites f
            JOIN products p ON p.id = f.product_id
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FavoriteRow::into_entry).collect())
    }

    /// Toggle a (user, product) favorite pair.
    ///
    /// Returns `true` when the pair now exists (favorited), `false` when it
    /// was removed. Toggling an even number of times is a no-op overall.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn toggle(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let deleted = sqlx::query(
            r"
            DELETE FROM user_favorites
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            r"
            INSERT INTO user_favorites (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(true)
    }
}
