//! icon_fetch tool implementation.
//!
//! Runs a single URL through the icon cache and reports where the answer
//! came from.

use favcache_client::{IconResponse, IconService, IconSource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::json_result;

/// Input parameters for icon_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconFetchParams {
    /// The icon URL to fetch.
    pub url: String,
}

/// Output structure for icon_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconFetchOutput {
    /// URL the payload belongs to (cache key or final URL).
    pub url: String,
    /// HTTP status, as served to the caller.
    pub status: u16,
    /// Content-Type of the payload.
    pub content_type: Option<String>,
    /// Where the payload came from.
    pub source: IconSource,
    /// Payload size in bytes.
    pub size: usize,
    /// Payload bytes, hex encoded.
    pub body_hex: String,
}

impl From<IconResponse> for IconFetchOutput {
    fn from(response: IconResponse) -> Self {
        Self {
            content_type: response.content_type().map(str::to_string),
            size: response.body.len(),
            body_hex: hex::encode(&response.body),
            url: response.url,
            status: response.status,
            source: response.source,
        }
    }
}

/// Implementation of the icon_fetch tool.
pub async fn icon_fetch_impl(service: &IconService, params: IconFetchParams) -> Result<CallToolResult, McpError> {
    let url = params.url.trim();
    if url.is_empty() {
        return Err(ToolError::InvalidInput("url cannot be empty".into()).into());
    }

    let output = IconFetchOutput::from(service.handle(url).await);
    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{PngOrigin, result_json};
    use favcache_core::{AppConfig, CacheDb};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_icon_fetch_empty_url() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let service = IconService::new(&db, &AppConfig::default(), Arc::new(PngOrigin));

        let result = icon_fetch_impl(&service, IconFetchParams { url: " ".into() }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_icon_fetch_then_cached() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.allow("https://example.com/favicon.png").await.unwrap();
        let service = IconService::new(&db, &AppConfig::default(), Arc::new(PngOrigin));
        let params = IconFetchParams { url: "https://example.com/favicon.png".into() };

        let first = result_json(&icon_fetch_impl(&service, params.clone()).await.unwrap());
        assert_eq!(first["source"], "network");
        assert_eq!(first["body_hex"], "89504e47");

        let second = result_json(&icon_fetch_impl(&service, params).await.unwrap());
        assert_eq!(second["source"], "cache");
        assert_eq!(second["content_type"], "image/png");
    }
}
