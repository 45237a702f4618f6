//! cache_list tool implementation.
//!
//! Lists cached icon keys and the recorded redirect mappings.

use favcache_client::IconService;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Include the redirect map (default: true).
    #[serde(default = "default_true")]
    pub include_redirects: bool,
}

fn default_true() -> bool {
    true
}

/// One recorded redirect.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RedirectMapping {
    pub original: String,
    pub target: String,
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub namespace: String,
    /// Cached icon keys, ordered.
    pub keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<RedirectMapping>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(service: &IconService, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let store = service.store();
    let keys = store.list_keys().await?;

    let redirects = if params.include_redirects {
        service
            .resolver()
            .mappings()
            .await?
            .into_iter()
            .map(|(original, target)| RedirectMapping { original, target })
            .collect()
    } else {
        Vec::new()
    };

    json_result(&CacheListOutput { namespace: store.namespace().to_string(), keys, redirects })
}
