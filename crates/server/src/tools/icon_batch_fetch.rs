//! icon_batch_fetch tool implementation.
//!
//! Runs several URLs through the icon cache in parallel with bounded concurrency.

use favcache_client::{IconService, IconSource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::ToolError;
use crate::tools::icon_fetch::IconFetchOutput;
use crate::tools::json_result;

const MAX_CONCURRENCY: u8 = 16;

/// Input parameters for icon_batch_fetch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IconBatchFetchParams {
    /// Icon URLs to fetch.
    pub urls: Vec<String>,

    /// Maximum number of concurrent requests (default: 4, max: 16).
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: Option<u8>,
}

fn default_max_concurrency() -> Option<u8> {
    Some(4)
}

/// Batch summary statistics, counted by [`IconSource`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct BatchSummary {
    pub total: u32,
    pub cached: u32,
    pub network: u32,
    pub stale: u32,
    /// Placeholder, pass-through and bad gateway answers.
    pub uncached: u32,
}

impl BatchSummary {
    fn count(&mut self, source: IconSource) {
        self.total += 1;
        match source {
            IconSource::Cache => self.cached += 1,
            IconSource::Network => self.network += 1,
            IconSource::Stale => self.stale += 1,
            IconSource::Passthrough | IconSource::Placeholder | IconSource::BadGateway => self.uncached += 1,
        }
    }
}

/// Output structure for icon_batch_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IconBatchFetchOutput {
    /// Individual results for each URL (in input order).
    pub results: Vec<IconFetchOutput>,
    pub summary: BatchSummary,
}

/// Implementation of the icon_batch_fetch tool.
pub async fn batch_fetch_impl(
    service: &IconService, params: IconBatchFetchParams,
) -> Result<CallToolResult, McpError> {
    if params.urls.is_empty() {
        return Err(ToolError::InvalidInput("urls cannot be empty".into()).into());
    }
    if params.urls.iter().any(|u| u.trim().is_empty()) {
        return Err(ToolError::InvalidInput("urls cannot contain empty entries".into()).into());
    }

    let max_concurrency = params.max_concurrency.unwrap_or(4).min(MAX_CONCURRENCY) as usize;
    if max_concurrency == 0 {
        return Err(ToolError::InvalidInput("max_concurrency must be at least 1".into()).into());
    }

    let semaphore = Arc::new(Semaphore::new(max_concurrency));
    let mut join_set = JoinSet::new();

    for (index, url) in params.urls.into_iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| McpError::internal_error(e.to_string(), None))?;
        let service = service.clone();

        join_set.spawn(async move {
            // NOTE: Hold permit for task duration to enforce concurrency limit
            let _permit = permit;
            let response = service.handle(url.trim()).await;
            (index, IconFetchOutput::from(response))
        });
    }

    let mut indexed = Vec::with_capacity(join_set.len());
    while let Some(joined) = join_set.join_next().await {
        indexed.push(joined.map_err(|e| McpError::internal_error(e.to_string(), None))?);
    }
    indexed.sort_by_key(|(index, _)| *index);

    let mut summary = BatchSummary::default();
    let results: Vec<IconFetchOutput> = indexed
        .into_iter()
        .map(|(_, output)| {
            summary.count(output.source);
            output
        })
        .collect();

    json_result(&IconBatchFetchOutput { results, summary })
}
