//! LINE Messaging API integration.
//!
//! - [`LineClient`] - outbound reply/push calls
//! - [`events`] - typed decoding of inbound webhook events
//! - [`flex`] - the flex message block structure
//! - [`templates`] - order notification message builders
//! - [`assistant`] - product Q&A bot answering chat messages

pub mod assistant;
pub mod events;
pub mod flex;
pub mod templates;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;

use malai_core::LineUserId;

use crate::config::LineConfig;
use flex::FlexContainer;

/// LINE Messaging API base URL.
const BASE_URL: &str = "https://api.line.me/v2/bot";

/// Errors from the LINE Messaging API client.
#[derive(Debug, Error)]
pub enum LineError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("LINE API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The configured channel token is not a valid header value.
    #[error("invalid channel access token: {0}")]
    InvalidToken(String),
}

/// An outgoing LINE message: plain text or a flex bubble.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    Text {
        text: String,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: FlexContainer,
    },
}

impl OutgoingMessage {
    /// A plain text message.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A flex message with the given notification-tray alt text.
    #[must_use]
    pub fn flex(alt_text: impl Into<String>, contents: FlexContainer) -> Self {
        Self::Flex {
            alt_text: alt_text.into(),
            contents,
        }
    }
}

#[derive(Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: &'a [OutgoingMessage],
}

#[derive(Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: &'a [OutgoingMessage],
}

/// Client for the LINE Messaging API reply and push endpoints.
///
/// No retries anywhere: a failed send is the caller's to log and move on
/// from. Reply tokens are single-use and expire, so retrying a reply would
/// not help anyway.
#[derive(Clone)]
pub struct LineClient {
    client: reqwest::Client,
}

impl LineClient {
    /// Create a new LINE API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the token is not
    /// a valid header value.
    pub fn new(config: &LineConfig) -> Result<Self, LineError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.channel_access_token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| LineError::InvalidToken(e.to_string()))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { client })
    }

    /// Reply to an inbound event using its single-use reply token.
    ///
    /// # Errors
    ///
    /// Returns `LineError::Api` on a non-success response.
    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[OutgoingMessage],
    ) -> Result<(), LineError> {
        self.send(
            &format!("{BASE_URL}/message/reply"),
            &ReplyRequest {
                reply_token,
                messages,
            },
        )
        .await
    }

    /// Push messages to a user by LINE ID.
    ///
    /// # Errors
    ///
    /// Returns `LineError::Api` on a non-success response.
    pub async fn push(
        &self,
        to: &LineUserId,
        messages: &[OutgoingMessage],
    ) -> Result<(), LineError> {
        self.send(
            &format!("{BASE_URL}/message/push"),
            &PushRequest {
                to: to.as_str(),
                messages,
            },
        )
        .await
    }

    async fn send<T: Serialize>(&self, url: &str, body: &T) -> Result<(), LineError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LineError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flex::{Bubble, FlexBox};

    #[test]
    fn text_message_serializes_with_type_tag() {
        let msg = OutgoingMessage::text("สวัสดีค่ะ");
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "สวัสดีค่ะ");
    }

    #[test]
    fn flex_message_serializes_alt_text_camel_case() {
        let bubble = FlexContainer::bubble(Bubble::kilo().body(FlexBox::vertical(vec![])));
        let msg = OutgoingMessage::flex("คำสั่งซื้อใหม่ #ORD1", bubble);
        let json = serde_json::to_value(&msg).expect("serialize");
        assert_eq!(json["type"], "flex");
        assert_eq!(json["altText"], "คำสั่งซื้อใหม่ #ORD1");
        assert_eq!(json["contents"]["type"], "bubble");
    }

    #[test]
    fn reply_request_shape() {
        let messages = vec![OutgoingMessage::text("ok")];
        let request = ReplyRequest {
            reply_token: "token-1",
            messages: &messages,
        };
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["replyToken"], "token-1");
        assert_eq!(json["messages"][0]["type"], "text");
    }
}
