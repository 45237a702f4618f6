//! Message-passing helpers around the fetch primitive.
//!
//! A message looks like `{"type": "fetchText", "payload": {"url": "..."}}` and
//! gets a [`MessageReply`] of `{success, data}` or `{success: false, error}`.
//! Nothing here touches the icon cache.

use favcache_core::Error;
use serde::{Deserialize, Serialize};

use crate::fetch::{FetchResponse, Fetcher, decode_text};

/// Payload shared by every message kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct UrlPayload {
    pub url: String,
}

/// A request routed to one of the fetch helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Message {
    /// Fetch and decode the body, transcoding legacy charsets.
    FetchText(UrlPayload),
    /// Fetch and return the Content-Type header.
    FetchContentType(UrlPayload),
    /// Fetch and return the body as UTF-8 without charset handling.
    FetchRawText(UrlPayload),
}

impl Message {
    pub fn url(&self) -> &str {
        match self {
            Message::FetchText(p) | Message::FetchContentType(p) | Message::FetchRawText(p) => &p.url,
        }
    }
}

/// Reply to a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct MessageReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageReply {
    pub fn ok(data: impl Into<String>) -> Self {
        Self { success: true, data: Some(data.into()), error: None }
    }

    pub fn err(error: impl ToString) -> Self {
        Self { success: false, data: None, error: Some(error.to_string()) }
    }
}

/// Run `message` against `fetcher`.
pub async fn dispatch(fetcher: &dyn Fetcher, message: Message) -> MessageReply {
    let url = message.url().to_string();
    match handle(fetcher, message).await {
        Ok(data) => MessageReply::ok(data),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "message handler failed");
            MessageReply::err(e)
        }
    }
}

async fn handle(fetcher: &dyn Fetcher, message: Message) -> Result<String, Error> {
    if message.url().trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()));
    }

    let response = checked(fetcher.fetch(message.url()).await?)?;

    let data = match message {
        Message::FetchText(_) => decode_text(&response.bytes, response.content_type.as_deref()),
        Message::FetchContentType(_) => response.content_type.unwrap_or_default(),
        Message::FetchRawText(_) => String::from_utf8_lossy(&response.bytes).into_owned(),
    };

    Ok(data)
}

fn checked(response: FetchResponse) -> Result<FetchResponse, Error> {
    if response.status.is_success() {
        Ok(response)
    } else {
        Err(Error::UpstreamStatus { status: response.status.as_u16() })
    }
}
