//! Order intake and lookup.
//!
//! Checkout persists the order and its items, then pushes the new-order
//! notification in a spawned task. Persistence success is what the response
//! reports; a failed notification is logged and never fails the checkout.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use malai_core::{Baht, LineUserId, OrderId, ProductId, SHIPPING_FEE};

use crate::db::orders::{NewOrder, NewOrderItem};
use crate::db::users::LineProfile;
use crate::db::{OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::line::templates::{self, NotificationKind};
use crate::models::OrderWithItems;
use crate::state::AppState;

/// Checkout submission, as the cart page posts it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// LINE user ID of the purchasing customer.
    pub user_id: LineUserId,
    pub customer_info: CustomerInfo,
    pub items: Vec<CheckoutItem>,
    /// Items subtotal computed by the client.
    pub total: Baht,
    /// Informational; the item rows are what get persisted.
    #[serde(default)]
    pub item_count: Option<i32>,
}

/// Shipping contact fields.
#[derive(Debug, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One cart line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutItem {
    pub product_id: ProductId,
    pub quantity: i32,
    /// Unit price at the time the cart was built.
    pub price: Baht,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CheckoutRequest {
    /// Reject submissions missing the external id, contact info, or items.
    fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.user_id.is_empty() {
            return Err("missing user id");
        }
        if self.customer_info.name.trim().is_empty()
            || self.customer_info.phone.trim().is_empty()
            || self.customer_info.address.trim().is_empty()
        {
            return Err("missing contact info");
        }
        if self.items.is_empty() {
            return Err("empty item list");
        }
        if self.total.is_negative() {
            return Err("negative total");
        }
        if self
            .items
            .iter()
            .any(|item| item.quantity < 1 || item.price.is_negative())
        {
            return Err("invalid item");
        }
        Ok(())
    }
}

/// Order intake: persist the order and its items, then notify operations.
#[instrument(skip(state, request), fields(user_id = %request.user_id))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<Value>> {
    if let Err(reason) = request.validate() {
        tracing::debug!(reason, "rejecting checkout submission");
        return Err(AppError::BadRequest("ข้อมูลไม่ครบถ้วน".to_owned()));
    }

    let users = UserRepository::new(state.pool());
    let user = users
        .get_or_create(
            &request.user_id,
            &LineProfile {
                display_name: Some(request.customer_info.name.clone()),
                ..LineProfile::default()
            },
        )
        .await
        .map_err(|e| AppError::database("ไม่สามารถสร้างผู้ใช้ได้", e))?;

    let order_number = format!("ORD{}", Utc::now().timestamp_millis());
    let total_amount = request.total + SHIPPING_FEE;

    let orders = OrderRepository::new(state.pool());
    let order = orders
        .create(&NewOrder {
            order_number,
            user_id: user.id,
            total_amount,
            shipping_fee: SHIPPING_FEE,
            shipping_name: request.customer_info.name.clone(),
            shipping_phone: request.customer_info.phone.clone(),
            shipping_address: request.customer_info.address.clone(),
            notes: request.customer_info.notes.clone(),
        })
        .await
        .map_err(|e| AppError::database("ไม่สามารถสร้างคำสั่งซื้อได้", e))?;

    let items: Vec<NewOrderItem> = request
        .items
        .iter()
        .map(|item| NewOrderItem {
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
            size: item.size.clone(),
            color: item.color.clone(),
        })
        .collect();

    orders
        .insert_items(order.id, &items)
        .await
        .map_err(|e| AppError::database("ไม่สามารถสร้างรายการสินค้าได้", e))?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        total = %order.total_amount,
        "order created"
    );

    // Best-effort notification; the order is already persisted.
    tokio::spawn(notify_new_order(
        state.clone(),
        order.id,
        request.user_id.clone(),
    ));

    Ok(Json(json!({
        "success": true,
        "order": {
            "id": order.id,
            "orderNumber": order.order_number,
            "total": order.total_amount,
        },
    })))
}

/// Push the new-order flex message to the operations account, or to the
/// customer when no operations target is configured. Failures are logged
/// only.
async fn notify_new_order(state: AppState, order_id: OrderId, customer: LineUserId) {
    let orders = OrderRepository::new(state.pool());
    let order = match orders.get_with_items(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            tracing::warn!(%order_id, "order vanished before notification");
            return;
        }
        Err(error) => {
            tracing::error!(%order_id, %error, "failed to load order for notification");
            return;
        }
    };

    let target = state
        .config()
        .line
        .notify_target
        .clone()
        .unwrap_or(customer);
    let message = templates::order_message(NotificationKind::NewOrder, &order);

    if let Err(error) = state.line().push(&target, &[message]).await {
        tracing::error!(%order_id, %error, "failed to push new-order notification");
    }
}

/// Order lookup for the order status page.
pub async fn show(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get_with_items(order_id)
        .await
        .map_err(|e| AppError::database("Failed to fetch order", e))?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(order))
}
