//! Typed decoding of inbound LINE webhook events.
//!
//! The webhook body is decoded into tagged variants instead of being walked
//! as loose JSON: a malformed body or an event type we do not model fails the
//! request with a parse error rather than being skipped silently. Postback
//! `data` strings are URL-encoded key/value pairs and decode into
//! [`PostbackAction`].

use serde::Deserialize;
use thiserror::Error;

use malai_core::{LineUserId, OrderId};

/// The webhook request body: a batch of events.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
    /// Bot user ID the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
}

/// One inbound event. Unknown `type` values fail deserialization.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    Postback(PostbackEvent),
    Follow(FollowEvent),
    Unfollow(UnfollowEvent),
}

/// The sender of an event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<LineUserId>,
}

/// A chat message event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    pub source: EventSource,
    pub message: IncomingMessage,
}

/// A button-press postback event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    pub reply_token: String,
    pub source: EventSource,
    pub postback: Postback,
}

/// The user added the bot as a friend.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEvent {
    pub reply_token: String,
    pub source: EventSource,
}

/// The user blocked the bot. Carries no reply token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfollowEvent {
    pub source: EventSource,
}

/// The message content of a message event.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum IncomingMessage {
    Text { text: String },
    Image {},
    Sticker {},
}

/// The postback payload.
#[derive(Debug, Deserialize)]
pub struct Postback {
    /// URL-encoded action string, e.g. `action=confirm_order&order_id=42`.
    pub data: String,
}

/// Errors decoding a postback action string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("postback data has no action parameter")]
    MissingAction,
    #[error("unknown postback action: {0}")]
    UnknownAction(String),
    #[error("postback action missing parameter: {0}")]
    MissingParam(&'static str),
    #[error("invalid order_id in postback data: {0}")]
    InvalidOrderId(String),
}

/// A decoded postback action.
///
/// These mirror the buttons the message templates emit; `data()` is the
/// inverse of `parse()` and is what the templates encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostbackAction {
    /// Operator confirmed a new order.
    ConfirmOrder { order_id: OrderId },
    /// Operator cancelled a new order.
    CancelOrder { order_id: OrderId },
    /// Operator asked for the customer's phone number.
    ContactCustomer { phone: String },
    /// Operator asked for the shipping details of a confirmed order.
    UpdateShipping { order_id: OrderId },
}

impl PostbackAction {
    /// Decode an action string from postback `data`.
    ///
    /// # Errors
    ///
    /// Returns `ActionParseError` when the action is absent, unknown, or
    /// missing its required parameter.
    pub fn parse(data: &str) -> Result<Self, ActionParseError> {
        let mut action = None;
        let mut order_id = None;
        let mut phone = None;

        for (key, value) in url::form_urlencoded::parse(data.as_bytes()) {
            match key.as_ref() {
                "action" => action = Some(value.into_owned()),
                "order_id" => order_id = Some(value.into_owned()),
                "phone" => phone = Some(value.into_owned()),
                _ => {}
            }
        }

        let action = action.ok_or(ActionParseError::MissingAction)?;

        let parse_order_id = |raw: Option<String>| {
            let raw = raw.ok_or(ActionParseError::MissingParam("order_id"))?;
            raw.parse::<OrderId>()
                .map_err(|_| ActionParseError::InvalidOrderId(raw))
        };

        match action.as_str() {
            "confirm_order" => Ok(Self::ConfirmOrder {
                order_id: parse_order_id(order_id)?,
            }),
            "cancel_order" => Ok(Self::CancelOrder {
                order_id: parse_order_id(order_id)?,
            }),
            "contact_customer" => Ok(Self::ContactCustomer {
                phone: phone.ok_or(ActionParseError::MissingParam("phone"))?,
            }),
            "update_shipping" => Ok(Self::UpdateShipping {
                order_id: parse_order_id(order_id)?,
            }),
            other => Err(ActionParseError::UnknownAction(other.to_owned())),
        }
    }

    /// Encode as a postback `data` string for a template button.
    #[must_use]
    pub fn data(&self) -> String {
        match self {
            Self::ConfirmOrder { order_id } => format!("action=confirm_order&order_id={order_id}"),
            Self::CancelOrder { order_id } => format!("action=cancel_order&order_id={order_id}"),
            Self::ContactCustomer { phone } => {
                let mut encoded = url::form_urlencoded::Serializer::new(String::new());
                encoded.append_pair("action", "contact_customer");
                encoded.append_pair("phone", phone);
                encoded.finish()
            }
            Self::UpdateShipping { order_id } => {
                format!("action=update_shipping&order_id={order_id}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_postback_event_batch() {
        let body = json!({
            "destination": "U_bot",
            "events": [{
                "type": "postback",
                "replyToken": "rt-1",
                "source": { "userId": "U_operator", "type": "user" },
                "postback": { "data": "action=confirm_order&order_id=42" }
            }]
        });

        let payload: WebhookPayload = serde_json::from_value(body).expect("decode");
        assert_eq!(payload.events.len(), 1);
        let Some(WebhookEvent::Postback(event)) = payload.events.first() else {
            panic!("expected postback event");
        };
        assert_eq!(event.reply_token, "rt-1");
        assert_eq!(
            PostbackAction::parse(&event.postback.data),
            Ok(PostbackAction::ConfirmOrder {
                order_id: OrderId::new(42)
            })
        );
    }

    #[test]
    fn decodes_text_message_event() {
        let body = json!({
            "events": [{
                "type": "message",
                "replyToken": "rt-2",
                "source": { "userId": "U_customer" },
                "message": { "type": "text", "id": "555", "text": "มีเสื้อยืดไหม" }
            }]
        });

        let payload: WebhookPayload = serde_json::from_value(body).expect("decode");
        let Some(WebhookEvent::Message(event)) = payload.events.first() else {
            panic!("expected message event");
        };
        let IncomingMessage::Text { text } = &event.message else {
            panic!("expected text message");
        };
        assert_eq!(text, "มีเสื้อยืดไหม");
    }

    #[test]
    fn rejects_unrecognized_event_type() {
        let body = json!({
            "events": [{ "type": "beacon", "replyToken": "rt-3" }]
        });
        assert!(serde_json::from_value::<WebhookPayload>(body).is_err());
    }

    #[test]
    fn rejects_malformed_postback() {
        let body = json!({
            "events": [{ "type": "postback", "replyToken": "rt-4" }]
        });
        assert!(serde_json::from_value::<WebhookPayload>(body).is_err());
    }

    #[test]
    fn empty_body_decodes_to_no_events() {
        let payload: WebhookPayload = serde_json::from_str("{}").expect("decode");
        assert!(payload.events.is_empty());
    }

    #[test]
    fn action_parse_round_trips() {
        for action in [
            PostbackAction::ConfirmOrder {
                order_id: OrderId::new(42),
            },
            PostbackAction::CancelOrder {
                order_id: OrderId::new(7),
            },
            PostbackAction::ContactCustomer {
                phone: "081-234-5678".to_owned(),
            },
            PostbackAction::UpdateShipping {
                order_id: OrderId::new(9),
            },
        ] {
            assert_eq!(PostbackAction::parse(&action.data()), Ok(action));
        }
    }

    #[test]
    fn unknown_action_is_an_error() {
        assert_eq!(
            PostbackAction::parse("action=refund_order&order_id=1"),
            Err(ActionParseError::UnknownAction("refund_order".to_owned()))
        );
    }

    #[test]
    fn missing_parameters_are_errors() {
        assert_eq!(
            PostbackAction::parse("order_id=1"),
            Err(ActionParseError::MissingAction)
        );
        assert_eq!(
            PostbackAction::parse("action=confirm_order"),
            Err(ActionParseError::MissingParam("order_id"))
        );
        assert_eq!(
            PostbackAction::parse("action=confirm_order&order_id=abc"),
            Err(ActionParseError::InvalidOrderId("abc".to_owned()))
        );
        assert_eq!(
            PostbackAction::parse("action=contact_customer"),
            Err(ActionParseError::MissingParam("phone"))
        );
    }
}
