//! Tool handler abstraction and response envelopes.
//!
//! Every tool implements [`ToolHandler`]; the registry only ever talks to
//! this trait. The envelope helpers build the three response shapes a
//! client can receive from `tools/call`.

use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::ToolError;

/// Trait implemented by every tool exposed by the server.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the name of this tool, as matched against `tools/call` requests.
    fn name(&self) -> &'static str;

    /// Get the descriptor advertised by `tools/list`.
    fn to_tool(&self) -> Tool;

    /// Execute the tool with the given arguments.
    ///
    /// On success, returns the text placed in the response content.
    async fn execute(&self, arguments: JsonObject) -> Result<String, ToolError>;
}

/// Deserialize a tool's arguments object into its parameter type.
pub fn parse_arguments<T: DeserializeOwned>(arguments: JsonObject) -> Result<T, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Wrap successful tool output into a single-element text envelope.
pub fn success_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Report a tool failure as data: a non-error envelope whose text is
/// `{"error": "<message>"}`.
pub fn error_payload_result(error: &ToolError) -> CallToolResult {
    warn!("Error executing tool: {}", error);
    let payload = serde_json::json!({ "error": error.to_string() });
    CallToolResult::success(vec![Content::text(payload.to_string())])
}

/// Protocol-level failure for a tool name outside the catalog.
pub fn unknown_tool_result(name: &str) -> CallToolResult {
    warn!("Unknown tool requested: {}", name);
    CallToolResult::error(vec![Content::text(
        ToolError::UnknownTool(name.to_string()).to_string(),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Page {
        #[serde(rename = "startIndex")]
        start_index: Option<u64>,
    }

    fn text_of(result: &CallToolResult) -> String {
        match &result.content[0].raw {
            RawContent::Text(text) => text.text.clone(),
            other => panic!("expected text content, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_arguments_accepts_missing_fields() {
        let page: Page = parse_arguments(JsonObject::new()).unwrap();
        assert_eq!(page.start_index, None);
    }

    #[test]
    fn test_parse_arguments_rejects_wrong_type() {
        let mut args = JsonObject::new();
        args.insert("startIndex".into(), serde_json::json!("first"));
        let err = parse_arguments::<Page>(args).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn test_error_payload_is_not_flagged_as_error() {
        let result = error_payload_result(&ToolError::Http { status: 503 });
        assert_ne!(result.is_error, Some(true));
        let payload: serde_json::Value = serde_json::from_str(&text_of(&result)).unwrap();
        assert_eq!(payload["error"], "HTTP error! status: 503");
    }

    #[test]
    fn test_unknown_tool_is_flagged_as_error() {
        let result = unknown_tool_result("Nope");
        assert_eq!(result.is_error, Some(true));
        assert_eq!(text_of(&result), "Unknown tool: Nope");
    }
}
