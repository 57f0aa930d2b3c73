//! Product Q&A assistant.
//!
//! Chat messages to the bot are answered by a chat-completion endpoint primed
//! with a snapshot of the stock list. The assistant is optional; when no
//! endpoint is configured, message events are logged and skipped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AssistantConfig;
use crate::db::products::ProductDigest;

/// Fallback reply when the assistant fails or returns nothing usable.
pub const FALLBACK_REPLY: &str = "ขออภัย เกิดข้อผิดพลาดในการประมวลผลคำตอบ";

/// LINE text messages cap at 500 characters.
const REPLY_LIMIT: usize = 500;

/// Errors from the assistant endpoint.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint returned a non-success status.
    #[error("assistant error: {status}")]
    Api { status: u16 },

    /// Response body had no message content.
    #[error("assistant returned an empty reply")]
    EmptyReply,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatResponseMessage>,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Client for the chat-completion endpoint.
#[derive(Clone)]
pub struct AssistantClient {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl AssistantClient {
    /// Create a new assistant client.
    #[must_use]
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            model: config.model.clone(),
        }
    }

    /// Answer a customer question against the given stock snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AssistantError` if the request fails or the reply is empty.
    pub async fn answer(
        &self,
        question: &str,
        products: &[ProductDigest],
    ) -> Result<String, AssistantError> {
        let system_prompt = build_system_prompt(products);

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: question,
                },
            ],
            stream: false,
        };

        let response = self.client.post(&self.url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssistantError::Api {
                status: status.as_u16(),
            });
        }

        let body: ChatResponse = response.json().await?;
        let reply = body
            .message
            .and_then(|m| m.content)
            .map(|content| content.trim().to_owned())
            .filter(|content| !content.is_empty())
            .ok_or(AssistantError::EmptyReply)?;

        Ok(reply)
    }
}

/// The Thai system prompt: answer only from the stock list.
fn build_system_prompt(products: &[ProductDigest]) -> String {
    let product_info = products
        .iter()
        .map(|p| {
            format!(
                "• {} ({}) - {}",
                p.name,
                p.brand_name.as_deref().unwrap_or("ไม่ทราบแบรนด์"),
                p.price.display(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "คุณคือตัวช่วยขายของออนไลน์ที่ตอบคำถามลูกค้าโดยอ้างอิงจากรายการสินค้าในสต็อกเท่านั้น\n\
         ถ้าหาไม่เจอ ให้บอกว่า \"ขออภัย สินค้าที่คุณถามไม่มีในระบบตอนนี้\"\n\n\
         นี่คือรายการสินค้า:\n{product_info}"
    )
}

/// Truncate a reply to the LINE text limit, ellipsizing on a char boundary.
#[must_use]
pub fn truncate_reply(reply: &str) -> String {
    if reply.chars().count() <= REPLY_LIMIT {
        return reply.to_owned();
    }
    let truncated: String = reply.chars().take(REPLY_LIMIT - 3).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use malai_core::Baht;

    #[test]
    fn system_prompt_lists_products_with_prices() {
        let products = vec![
            ProductDigest {
                name: "เสื้อยืดลายดอก".to_owned(),
                price: Baht::from_whole(500),
                brand_name: Some("Malai".to_owned()),
            },
            ProductDigest {
                name: "กางเกงขาสั้น".to_owned(),
                price: Baht::from_whole(1290),
                brand_name: None,
            },
        ];

        let prompt = build_system_prompt(&products);
        assert!(prompt.contains("• เสื้อยืดลายดอก (Malai) - ฿500"));
        assert!(prompt.contains("• กางเกงขาสั้น (ไม่ทราบแบรนด์) - ฿1,290"));
    }

    #[test]
    fn short_replies_pass_through() {
        assert_eq!(truncate_reply("สวัสดีค่ะ"), "สวัสดีค่ะ");
    }

    #[test]
    fn long_replies_are_ellipsized_at_the_limit() {
        let long: String = std::iter::repeat_n('ก', 600).collect();
        let truncated = truncate_reply(&long);
        assert_eq!(truncated.chars().count(), 500);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn limit_length_reply_is_not_truncated() {
        let exact: String = std::iter::repeat_n('a', 500).collect();
        assert_eq!(truncate_reply(&exact), exact);
    }
}
