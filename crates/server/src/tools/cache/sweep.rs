//! cache_sweep tool implementation.
//!
//! Deletes expired entries from the active icon namespace, the same pass
//! that runs on activation.

use chrono::Utc;
use favcache_client::{IconService, icons::sweep_expired};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Output from the cache_sweep tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSweepOutput {
    /// Namespace that was swept.
    pub namespace: String,
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_sweep tool.
pub async fn sweep_impl(service: &IconService) -> Result<CallToolResult, McpError> {
    let store = service.store();
    let deleted = sweep_expired(store, Utc::now()).await?;

    json_result(&CacheSweepOutput { namespace: store.namespace().to_string(), deleted })
}
