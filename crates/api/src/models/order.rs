//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use malai_core::{Baht, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order row.
///
/// Created once at checkout; only `status` and `updated_at` change afterwards,
/// driven by webhook actions.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    /// Generated order number (`ORD{unix_millis}`).
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Items subtotal plus the flat shipping fee.
    pub total_amount: Baht,
    pub shipping_fee: Baht,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line item joined with its product and brand, as the message
/// templates and the order page consume it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItemDetail {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at checkout time.
    pub price: Baht,
    pub size: Option<String>,
    pub color: Option<String>,
    pub product_name: String,
    pub brand_name: Option<String>,
    pub image_url: Option<String>,
}

impl OrderItemDetail {
    /// Line total: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Baht {
        self.price.times(self.quantity)
    }
}

/// An order with its line items, used by the templates and the order lookup.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}
