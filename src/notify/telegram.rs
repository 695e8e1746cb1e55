//! Telegram Bot API delivery.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Credentials;
use crate::submission::NotificationMessage;

/// Delivery failure, surfaced to the handler as one typed error.
///
/// The two variants keep network-level and application-level failures
/// distinguishable in logs; neither reaches the client verbatim.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The messaging service could not be reached (includes timeouts).
    #[error("messaging service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The messaging service answered with a non-success status.
    #[error("messaging service rejected the message (status {status}): {detail}")]
    Rejected { status: u16, detail: String },
}

/// Successful delivery acknowledgement.
#[derive(Debug, Clone)]
pub struct DeliveryAck {
    /// Message id assigned by the messaging service, when reported.
    pub message_id: Option<i64>,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    description: Option<String>,
}

/// Delivers formatted notifications to the Telegram Bot API.
///
/// Holds a pre-built `sendMessage` URL so the token is interpolated
/// exactly once, at startup.
pub struct Notifier {
    http: reqwest::Client,
    send_url: String,
    chat_id: String,
}

impl Notifier {
    /// Build a notifier from validated credentials.
    ///
    /// `timeout` bounds each delivery attempt end to end; a slow
    /// messaging service surfaces as a transport error, not a hung
    /// request.
    pub fn new(
        credentials: Credentials,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let send_url = format!(
            "{}/bot{}/sendMessage",
            api_base.trim_end_matches('/'),
            credentials.bot_token
        );
        Ok(Self {
            http,
            send_url,
            chat_id: credentials.chat_id,
        })
    }

    /// Target chat for lead notifications.
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Deliver one message. Exactly one attempt; the caller decides
    /// what a failure means.
    pub async fn deliver(&self, message: &NotificationMessage) -> Result<DeliveryAck, DeliveryError> {
        let body = SendMessageRequest {
            chat_id: &message.chat_id,
            text: &message.text,
            parse_mode: None,
        };

        let response = self.http.post(&self.send_url).json(&body).send().await?;
        let status = response.status();

        if status.is_success() {
            let message_id = response
                .json::<SendMessageResponse>()
                .await
                .ok()
                .and_then(|r| r.result)
                .map(|m| m.message_id);
            return Ok(DeliveryAck { message_id });
        }

        let detail = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(|b| b.description)
            .unwrap_or_else(|| "no error description provided".to_string());

        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}
