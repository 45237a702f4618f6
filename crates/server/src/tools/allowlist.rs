//! allowlist_add / allowlist_remove tool implementations.
//!
//! The allow-list decides which icon URLs go through the cache. Entries are
//! matched by exact string.

use favcache_core::CacheDb;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::json_result;

/// Parameters shared by the allow-list tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AllowlistParams {
    /// Exact icon URLs to add or remove.
    pub urls: Vec<String>,
}

/// Output from the allow-list tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AllowlistOutput {
    /// Number of URLs added or removed by this call.
    pub changed: u64,
    /// Allow-list size after the call.
    pub total: usize,
}

fn validate(params: &AllowlistParams) -> Result<(), ToolError> {
    if params.urls.is_empty() {
        return Err(ToolError::InvalidInput("urls cannot be empty".into()));
    }
    if params.urls.iter().any(|u| u.trim().is_empty()) {
        return Err(ToolError::InvalidInput("urls cannot contain empty entries".into()));
    }
    Ok(())
}

/// Implementation of the allowlist_add tool.
pub async fn add_impl(db: &CacheDb, params: AllowlistParams) -> Result<CallToolResult, McpError> {
    validate(&params)?;

    let before = db.allowed_urls().await?.len();
    for url in &params.urls {
        db.allow(url).await?;
    }
    let total = db.allowed_urls().await?.len();

    tracing::info!(added = total - before, total, "allow-list updated");
    json_result(&AllowlistOutput { changed: (total - before) as u64, total })
}

/// Implementation of the allowlist_remove tool.
pub async fn remove_impl(db: &CacheDb, params: AllowlistParams) -> Result<CallToolResult, McpError> {
    validate(&params)?;

    let mut removed = 0u64;
    for url in &params.urls {
        if db.disallow(url).await? {
            removed += 1;
        }
    }
    let total = db.allowed_urls().await?.len();

    tracing::info!(removed, total, "allow-list updated");
    json_result(&AllowlistOutput { changed: removed, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::result_json;

    fn params(urls: &[&str]) -> AllowlistParams {
        AllowlistParams { urls: urls.iter().map(|u| u.to_string()).collect() }
    }

    #[tokio::test]
    async fn test_add_counts_new_urls_only() {
        let db = CacheDb::open_in_memory().await.unwrap();
        add_impl(&db, params(&["https://a.test/favicon.ico"])).await.unwrap();

        let result = add_impl(&db, params(&["https://a.test/favicon.ico", "https://b.test/favicon.ico"]))
            .await
            .unwrap();
        let json = result_json(&result);

        assert_eq!(json["changed"], 1);
        assert_eq!(json["total"], 2);
    }

    #[tokio::test]
    async fn test_remove() {
        let db = CacheDb::open_in_memory().await.unwrap();
        add_impl(&db, params(&["https://a.test/favicon.ico"])).await.unwrap();

        let json = result_json(
            &remove_impl(&db, params(&["https://a.test/favicon.ico", "https://missing.test/"]))
                .await
                .unwrap(),
        );

        assert_eq!(json["changed"], 1);
        assert_eq!(json["total"], 0);
        assert!(db.allowed_urls().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(add_impl(&db, params(&[])).await.is_err());
        assert!(remove_impl(&db, params(&["  "])).await.is_err());
    }
}
