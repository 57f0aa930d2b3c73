//! Product and category repository.
//!
//! The catalog is read-only here. The product list computes review and
//! favorite aggregates in the same statement as the page of products (grouped
//! LEFT JOINs plus a window count), so a page costs one round trip.

use sqlx::{FromRow, PgPool};

use chrono::{DateTime, Utc};
use malai_core::{Baht, BrandId, CategoryId, ProductId};

use super::RepositoryError;
use crate::models::{BrandRef, Category, CategoryRef, Product};

/// Catalog list filters and pagination.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Filter by category `name_en`; `None` means all categories.
    pub category: Option<String>,
    /// Case-insensitive substring match on product or brand name.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
}

/// One page of products plus the unpaginated match count.
#[derive(Debug)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: i64,
}

/// Minimal product line used by the assistant prompt.
#[derive(Debug, Clone, FromRow)]
pub struct ProductDigest {
    pub name: String,
    pub price: Baht,
    pub brand_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct ProductListRow {
    id: ProductId,
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
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_id: Option<CategoryId>,
    category_name: Option<String>,
    category_name_en: Option<String>,
    brand_id: Option<BrandId>,
    brand_name: Option<String>,
    reviews_count: i64,
    favorites_count: i64,
    avg_rating: f64,
    total_count: i64,
}

impl ProductListRow {
    fn into_product(self) -> Product {
        let categories = match (self.category_id, self.category_name, self.category_name_en) {
            (Some(id), Some(name), Some(name_en)) => Some(CategoryRef { id, name, name_en }),
            _ => None,
        };
        let brands = match (self.brand_id, self.brand_name) {
            (Some(id), Some(name)) => Some(BrandRef { id, name }),
            _ => None,
        };

        Product {
            id: self.id,
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
            created_at: self.created_at,
            updated_at: self.updated_at,
            categories,
            brands,
            reviews_count: self.reviews_count,
            favorites_count: self.favorites_count,
            avg_rating: self.avg_rating,
        }
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products, newest first, with category/search filtering,
    /// pagination, and per-product review/favorite aggregates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<ProductPage, RepositoryError> {
        let offset = (filter.page.max(1) - 1) * filter.limit;

        let rows = sqlx::query_as::<_, ProductListRow>(
            r"
            SELECT p.id, p.name, p.description, p.price, p.original_price, p.sku,
                   p.image_url, p.is_active, p.stock, p.sizes, p.colors,
                   p.created_at, p.updated_at,
                   c.id AS category_id, c.name AS category_name, c.name_en AS category_name_en,
                   b.id AS brand_id, b.name AS brand_name,
                   COALESCE(r.reviews_count, 0) AS reviews_count,
                   COALESCE(f.favorites_count, 0) AS favorites_count,
                   COALESCE(ROUND(r.avg_rating, 1), 0)::float8 AS avg_rating,
                   COUNT(*) OVER () AS total_count
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN brands b ON b.id = p.brand_id
            LEFT JOIN (
                SELECT product_id, COUNT(*) AS reviews_count, AVG(rating) AS avg_rating
                FROM reviews
                GROUP BY product_id
            ) r ON r.product_id = p.id
            LEFT JOIN (
                SELECT product_id, COUNT(*) AS favorites_count
                FROM user_favorites
                GROUP BY product_id
            ) f ON f.product_id = p.id
            WHERE p.is_active
              AND ($1::text IS NULL OR c.name_en = $1)
              AND ($2::text IS NULL
                   OR p.name ILIKE '%' || $2 || '%'
                   OR b.name ILIKE '%' || $2 || '%')
            ORDER BY p.created_at DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(&filter.category)
        .bind(&filter.search)
        .bind(filter.limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        // A page past the last result has no rows to carry the window count;
        // fall back to counting so the pagination metadata stays truthful.
        let total = match rows.first() {
            Some(row) => row.total_count,
            None if filter.page > 1 => self.count(filter).await?,
            None => 0,
        };
        let products = rows.into_iter().map(ProductListRow::into_product).collect();

        Ok(ProductPage { products, total })
    }

    /// Count the products matching a filter, ignoring pagination.
    async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let total = sqlx::query_scalar::<_, i64>(
            r"
            SELECT COUNT(*)
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE p.is_active
              AND ($1::text IS NULL OR c.name_en = $1)
              AND ($2::text IS NULL
                   OR p.name ILIKE '%' || $2 || '%'
                   OR b.name ILIKE '%' || $2 || '%')
            ",
        )
        .bind(&filter.category)
        .bind(&filter.search)
        .fetch_one(self.pool)
        .await?;

        Ok(total)
    }

    /// List active categories in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            r"
            SELECT id, name, name_en, description, image_url, is_active,
                   created_at, updated_at
            FROM categories
            WHERE is_active
            ORDER BY sort_order ASC, name ASC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Fetch the stock snapshot the assistant prompt is built from
    /// (name, price, brand), capped at `limit` products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn digest(&self, limit: i64) -> Result<Vec<ProductDigest>, RepositoryError> {
        let products = sqlx::query_as::<_, ProductDigest>(
            r"
            SELECT p.name, p.price, b.name AS brand_name
            FROM products p
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE p.is_active
            ORDER BY p.created_at DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
