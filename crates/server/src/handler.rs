//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use favcache_client::{Fetcher, IconService};
use favcache_core::CacheDb;

use crate::tools::allowlist::{AllowlistParams, add_impl, remove_impl};
use crate::tools::cache::{CacheListParams, list_impl, sweep_impl};
use crate::tools::icon_batch_fetch::{IconBatchFetchParams, batch_fetch_impl};
use crate::tools::icon_fetch::{IconFetchParams, icon_fetch_impl};
use crate::tools::message::{MessageParams, message_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for favcache.
#[derive(Clone)]
pub struct FavcacheServer {
    tool_router: ToolRouter<Self>,
    icons: IconService,
    db: CacheDb,
    fetcher: Arc<dyn Fetcher>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl FavcacheServer {
    /// Create a new server handler.
    pub fn new(icons: IconService, db: CacheDb, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { tool_router: Self::tool_router(), icons, db, fetcher }
    }

    /// Fetch an icon through the cache.
    ///
    /// Allow-listed URLs are served from cache while fresh. Others go straight to the network.
    #[tool(
        description = "Fetch an icon through the cache. Returns status, content type, source (cache, network, passthrough, stale, placeholder, bad_gateway) and hex-encoded bytes."
    )]
    async fn icon_fetch(&self, params: Parameters<IconFetchParams>) -> Result<CallToolResult, McpError> {
        icon_fetch_impl(&self.icons, params.0).await
    }

    #[tool(description = "Fetch several icons through the cache in parallel. Results keep input order.")]
    async fn icon_batch_fetch(&self, params: Parameters<IconBatchFetchParams>) -> Result<CallToolResult, McpError> {
        batch_fetch_impl(&self.icons, params.0).await
    }

    /// Run a fetch message. Bypasses the icon cache entirely.
    #[tool(
        description = "Handle a fetch message: fetchText (charset-aware text), fetchContentType, or fetchRawText. Replies with {success, data} or {success: false, error}."
    )]
    async fn message(&self, params: Parameters<MessageParams>) -> Result<CallToolResult, McpError> {
        message_impl(self.fetcher.as_ref(), params.0).await
    }

    #[tool(description = "Add exact icon URLs to the cache allow-list.")]
    async fn allowlist_add(&self, params: Parameters<AllowlistParams>) -> Result<CallToolResult, McpError> {
        add_impl(&self.db, params.0).await
    }

    #[tool(description = "Remove icon URLs from the cache allow-list. Cached entries stay until they expire.")]
    async fn allowlist_remove(&self, params: Parameters<AllowlistParams>) -> Result<CallToolResult, McpError> {
        remove_impl(&self.db, params.0).await
    }

    #[tool(description = "Delete expired icons from the active cache namespace.")]
    async fn cache_sweep(&self) -> Result<CallToolResult, McpError> {
        sweep_impl(&self.icons).await
    }

    #[tool(description = "List cached icon keys and recorded redirect mappings.")]
    async fn cache_list(&self, params: Parameters<CacheListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.icons, params.0).await
    }
}

impl ServerHandler for FavcacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "favcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
