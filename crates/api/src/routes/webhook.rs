//! Inbound LINE webhook.
//!
//! The platform posts event batches here. Postbacks drive the order workflow
//! (confirm, cancel, contact, shipping info); text messages go to the product
//! assistant when one is configured. A body that does not decode as a known
//! event batch is a 400; individual event failures after decode are logged
//! and never fail the request, since the platform retries on non-2xx and the
//! events are not idempotent.

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::instrument;

use malai_core::{LineUserId, OrderId, OrderStatus};

use crate::db::{MessageLogRepository, OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::line::OutgoingMessage;
use crate::line::assistant::{self, FALLBACK_REPLY};
use crate::line::events::{
    IncomingMessage, MessageEvent, PostbackAction, PostbackEvent, WebhookEvent, WebhookPayload,
};
use crate::line::templates::{self, NotificationKind};
use crate::state::AppState;

/// Webhook entry point: decode the event batch and handle each event.
#[instrument(skip_all)]
pub async fn inbound(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>> {
    let payload: WebhookPayload = serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("invalid webhook payload: {e}")))?;

    tracing::debug!(events = payload.events.len(), "webhook batch received");

    for event in payload.events {
        match event {
            WebhookEvent::Postback(event) => handle_postback(&state, event).await?,
            WebhookEvent::Message(event) => handle_message(&state, event).await,
            WebhookEvent::Follow(event) => {
                tracing::info!(user_id = ?event.source.user_id, "bot followed");
            }
            WebhookEvent::Unfollow(event) => {
                tracing::info!(user_id = ?event.source.user_id, "bot unfollowed");
            }
        }
    }

    Ok(Json(json!({ "message": "OK" })))
}

/// Dispatch one postback action.
///
/// A `data` string that does not decode is a 400; it can only come from a
/// template we did not emit.
async fn handle_postback(state: &AppState, event: PostbackEvent) -> Result<()> {
    let action = PostbackAction::parse(&event.postback.data)
        .map_err(|e| AppError::BadRequest(format!("invalid postback data: {e}")))?;

    tracing::info!(?action, "postback received");

    match action {
        PostbackAction::ConfirmOrder { order_id } => {
            transition_order(
                state,
                &event.reply_token,
                order_id,
                OrderStatus::Confirmed,
                NotificationKind::Confirmed,
            )
            .await;
        }
        PostbackAction::CancelOrder { order_id } => {
            transition_order(
                state,
                &event.reply_token,
                order_id,
                OrderStatus::Cancelled,
                NotificationKind::Cancelled,
            )
            .await;
        }
        PostbackAction::ContactCustomer { phone } => {
            send_reply(
                state,
                &event.reply_token,
                OutgoingMessage::text(templates::contact_customer_text(&phone)),
            )
            .await;
        }
        PostbackAction::UpdateShipping { order_id } => {
            send_shipping_info(state, &event.reply_token, order_id).await;
        }
    }

    Ok(())
}

/// Move an order to `status` and reply with the matching notification.
///
/// An order that cannot be loaded or updated gets the fetch-failed text
/// instead; the reply token must be consumed either way.
async fn transition_order(
    state: &AppState,
    reply_token: &str,
    order_id: OrderId,
    status: OrderStatus,
    kind: NotificationKind,
) {
    let orders = OrderRepository::new(state.pool());

    let mut order = match orders.get_with_items(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            tracing::warn!(%order_id, "postback for unknown order");
            send_reply(
                state,
                reply_token,
                OutgoingMessage::text(templates::order_fetch_failed_text()),
            )
            .await;
            return;
        }
        Err(error) => {
            tracing::error!(%order_id, %error, "failed to load order for postback");
            send_reply(
                state,
                reply_token,
                OutgoingMessage::text(templates::order_fetch_failed_text()),
            )
            .await;
            return;
        }
    };

    match orders.update_status(order_id, status).await {
        Ok(updated) => {
            tracing::info!(%order_id, %status, "order status updated");
            order.order = updated;
        }
        Err(error) => {
            tracing::error!(%order_id, %status, %error, "failed to update order status");
            send_reply(
                state,
                reply_token,
                OutgoingMessage::text(templates::order_fetch_failed_text()),
            )
            .await;
            return;
        }
    }

    send_reply(state, reply_token, templates::order_message(kind, &order)).await;
}

/// Reply with the read-only shipping summary for an order.
async fn send_shipping_info(state: &AppState, reply_token: &str, order_id: OrderId) {
    let orders = OrderRepository::new(state.pool());

    let text = match orders.get(order_id).await {
        Ok(Some(order)) => templates::shipping_info_text(&order),
        Ok(None) => {
            tracing::warn!(%order_id, "shipping info requested for unknown order");
            templates::order_fetch_failed_text()
        }
        Err(error) => {
            tracing::error!(%order_id, %error, "failed to load order for shipping info");
            templates::order_fetch_failed_text()
        }
    };

    send_reply(state, reply_token, OutgoingMessage::text(text)).await;
}

/// Answer a chat message through the product assistant.
///
/// Non-text messages and messages without a sender are skipped. Assistant
/// failures fall back to the canned apology so the customer always gets a
/// reply.
async fn handle_message(state: &AppState, event: MessageEvent) {
    let IncomingMessage::Text { text } = &event.message else {
        tracing::debug!("skipping non-text message");
        return;
    };

    let Some(assistant) = state.assistant() else {
        tracing::debug!("no assistant configured, skipping message");
        return;
    };

    let sender = event
        .source
        .user_id
        .clone()
        .unwrap_or_else(|| LineUserId::new(""));

    let products = ProductRepository::new(state.pool());
    let reply = match products.digest(100).await {
        Ok(digest) => match assistant.answer(text, &digest).await {
            Ok(answer) => assistant::truncate_reply(&answer),
            Err(error) => {
                tracing::error!(%error, "assistant failed to answer");
                FALLBACK_REPLY.to_owned()
            }
        },
        Err(error) => {
            tracing::error!(%error, "failed to load product digest");
            FALLBACK_REPLY.to_owned()
        }
    };

    send_reply(state, &event.reply_token, OutgoingMessage::text(&reply)).await;

    if !sender.is_empty() {
        let log = MessageLogRepository::new(state.pool());
        if let Err(error) = log.record(&sender, text, &reply).await {
            tracing::error!(%error, "failed to record chat exchange");
        }
    }
}

/// Send a reply, logging failure. Reply tokens are single-use so there is
/// nothing to do on error but log it.
async fn send_reply(state: &AppState, reply_token: &str, message: OutgoingMessage) {
    if let Err(error) = state.line().reply(reply_token, &[message]).await {
        tracing::error!(%error, "failed to send LINE reply");
    }
}
