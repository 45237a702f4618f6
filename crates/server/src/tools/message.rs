//! message tool implementation.
//!
//! Routes a `fetchText`, `fetchContentType` or `fetchRawText` message to the
//! fetch helpers. Failures come back inside the reply, not as tool errors.

use favcache_client::{Fetcher, Message, dispatch};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Input parameters for message tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageParams {
    /// Message of the form `{"type": "fetchText", "payload": {"url": "..."}}`.
    pub message: Message,
}

/// Implementation of the message tool.
pub async fn message_impl(fetcher: &dyn Fetcher, params: MessageParams) -> Result<CallToolResult, McpError> {
    let reply = dispatch(fetcher, params.message).await;
    json_result(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{PngOrigin, result_json};

    #[tokio::test]
    async fn test_message_content_type() {
        let params: MessageParams = serde_json::from_str(
            r#"{"message":{"type":"fetchContentType","payload":{"url":"https://example.com/i.png"}}}"#,
        )
        .unwrap();

        let json = result_json(&message_impl(&PngOrigin, params).await.unwrap());
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], "image/png");
    }

    #[tokio::test]
    async fn test_message_failure_is_a_reply() {
        let params: MessageParams =
            serde_json::from_str(r#"{"message":{"type":"fetchText","payload":{"url":""}}}"#).unwrap();

        let json = result_json(&message_impl(&PngOrigin, params).await.unwrap());
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        let parsed = serde_json::from_str::<MessageParams>(
            r#"{"message":{"type":"fetchJson","payload":{"url":"https://example.com"}}}"#,
        );
        assert!(parsed.is_err());
    }
}
