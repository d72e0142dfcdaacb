//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tool registry.
//!
//! `list_tools` and `call_tool` are implemented by hand rather than through
//! rmcp's tool router: tool failures must come back as ordinary results
//! carrying an `{"error": ...}` payload, and unknown tools as an
//! `isError: true` result, never as JSON-RPC errors.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{ToolRegistry, definitions::SeoulApiClient};

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp. Cloning is
/// cheap; clones share the same registry.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Catalog and dispatcher for all tools.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let client = SeoulApiClient::new(&config.seoul_api)?;

        Ok(Self {
            config: Arc::new(config),
            registry: Arc::new(ToolRegistry::new(client)),
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Instructions sent to clients on initialization.
    pub fn instructions() -> &'static str {
        "This server exposes Seoul Open Data Plaza datasets: subway ridership per station \
         (KoreaSeoulSubwayStatus) and cultural event listings (CulturalEventInfo). \
         Tool failures are returned as a JSON object with an `error` field."
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON (for HTTP transport).
    pub fn tool_catalog(&self) -> Vec<serde_json::Value> {
        self.registry
            .get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    pub async fn invoke_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        self.registry.call_tool(name, arguments).await
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(Self::instructions().to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.get_all_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .registry
            .call_tool(&request.name, request.arguments)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    #[test]
    fn test_server_info_advertises_tools_only() {
        let server = McpServer::new(Config::default()).unwrap();
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "seoul-data-mcp-server");
    }

    #[test]
    fn test_tool_catalog_json() {
        let server = McpServer::new(Config::default()).unwrap();
        let catalog = server.tool_catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0]["name"], "KoreaSeoulSubwayStatus");
        assert_eq!(catalog[1]["name"], "CulturalEventInfo");
        assert_eq!(catalog[1]["inputSchema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let server = McpServer::new(Config::default()).unwrap();
        let mut args = JsonObject::new();
        args.insert("startIndex".into(), serde_json::json!(1));
        let result = server.invoke_tool("Weather", Some(args)).await;
        assert_eq!(result.is_error, Some(true));
        match &result.content[0].raw {
            RawContent::Text(text) => assert_eq!(text.text, "Unknown tool: Weather"),
            other => panic!("expected text content, got {:?}", other),
        }
    }
}
