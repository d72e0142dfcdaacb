//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - The ordered catalog of tools advertised by `tools/list`
//! - Dispatch of `tools/call` requests to the matching [`ToolHandler`]
//! - Conversion of every outcome into a response envelope
//!
//! Both the STDIO server handler and the HTTP transport go through
//! [`ToolRegistry::call_tool`], so the envelope conventions are identical
//! on every transport.

use std::sync::Arc;

use rmcp::model::{CallToolResult, JsonObject, Tool};
use tracing::info;

use super::definitions::{CulturalEventTool, SeoulApiClient, SubwayStatusTool};
use super::handlers::{
    ToolHandler, error_payload_result, success_result, unknown_tool_result,
};
use super::ToolError;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create the registry with every Seoul tool, sharing one API client.
    pub fn new(client: SeoulApiClient) -> Self {
        Self::empty()
            .register(SubwayStatusTool::new(client.clone()))
            .register(CulturalEventTool::new(client))
    }

    /// Create a registry with no tools.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool to the catalog. Names must be unique.
    pub fn register(mut self, tool: impl ToolHandler + 'static) -> Self {
        debug_assert!(
            self.find(tool.name()).is_none(),
            "duplicate tool name: {}",
            tool.name()
        );
        self.tools.push(Arc::new(tool));
        self
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    pub fn get_all_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.to_tool()).collect()
    }

    /// Look up a tool by exact name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Dispatch a tool call and wrap the outcome into a response envelope.
    ///
    /// - absent or empty `arguments`: `{"error": "No arguments provided"}`
    ///   payload, checked before the name is looked up
    /// - unknown `name`: `isError: true` with `Unknown tool: <name>`
    /// - handler failure: `{"error": "<message>"}` payload, not flagged as
    ///   an error
    /// - handler success: the handler's text
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        info!("Received tool call: {}", name);

        let arguments = match arguments {
            Some(args) if !args.is_empty() => args,
            _ => return error_payload_result(&ToolError::MissingArguments),
        };

        let Some(tool) = self.find(name) else {
            return unknown_tool_result(name);
        };

        match tool.execute(arguments).await {
            Ok(text) => success_result(text),
            Err(e) => error_payload_result(&e),
        }
    }
}
