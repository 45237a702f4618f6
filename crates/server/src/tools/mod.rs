//! MCP tool implementations.
//!
//! This module contains all tools exposed by the favcache server.

pub mod allowlist;
pub mod cache;
pub mod icon_batch_fetch;
pub mod icon_fetch;
pub mod message;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use crate::error::ToolError;

/// Wrap a serializable tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(ToolError::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
