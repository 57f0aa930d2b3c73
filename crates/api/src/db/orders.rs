//! Order repository.
//!
//! Orders and their line items are written once at checkout. The order insert
//! and the batch item insert are two statements with no surrounding
//! transaction; a crash between them leaves an itemless order, an accepted
//! inconsistency at this scale.

use sqlx::{PgPool, QueryBuilder};

use malai_core::{Baht, OrderId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItemDetail, OrderWithItems};

/// A line item to insert at checkout.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Baht,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Fields for a new order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: UserId,
    pub total_amount: Baht,
    pub shipping_fee: Baht,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order row with status `PENDING`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new_order: &NewOrder) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders
                (order_number, user_id, status, total_amount, shipping_fee,
                 shipping_name, shipping_phone, shipping_address, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, order_number, user_id, status, total_amount, shipping_fee,
                      shipping_name, shipping_phone, shipping_address, notes,
                      created_at, updated_at
            ",
        )
        .bind(&new_order.order_number)
        .bind(new_order.user_id)
        .bind(OrderStatus::Pending)
        .bind(new_order.total_amount)
        .bind(new_order.shipping_fee)
        .bind(&new_order.shipping_name)
        .bind(&new_order.shipping_phone)
        .bind(&new_order.shipping_address)
        .bind(&new_order.notes)
        .fetch_one(self.pool)
        .await?;

        Ok(order)
    }

    /// Batch-insert the line items for an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_items(
        &self,
        order_id: OrderId,
        items: &[NewOrderItem],
    ) -> Result<(), RepositoryError> {
        if items.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO order_items (order_id, product_id, quantity, price, size, color) ",
        );
        builder.push_values(items, |mut row, item| {
            row.push_bind(order_id)
                .push_bind(item.product_id)
                .push_bind(item.quantity)
                .push_bind(item.price)
                .push_bind(&item.size)
                .push_bind(&item.color);
        });
        builder.build().execute(self.pool).await?;

        Ok(())
    }

    /// Look up an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, order_number, user_id, status, total_amount, shipping_fee,
                   shipping_name, shipping_phone, shipping_address, notes,
                   created_at, updated_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Look up an order with its items joined to product and brand data,
    /// as the message templates consume it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        order_id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let Some(order) = self.get(order_id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemDetail>(
            r"
            SELECT i.id, i.product_id, i.quantity, i.price, i.size, i.color,
                   p.name AS product_name, b.name AS brand_name, p.image_url
            FROM order_items i
            JOIN products p ON p.id = i.product_id
            LEFT JOIN brands b ON b.id = p.brand_id
            WHERE i.order_id = $1
            ORDER BY i.id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems { order, items }))
    }

    /// Set an order's status, refreshing `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such order exists.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            UPDATE orders
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, order_number, user_id, status, total_amount, shipping_fee,
                      shipping_name, shipping_phone, shipping_address, notes,
                      created_at, updated_at
            ",
        )
        .bind(order_id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }
}
