//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool operations.
///
/// The `Display` text of each variant is what clients see in the
/// `{"error": ...}` payload, so messages are kept short and stable.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The invocation carried no arguments object (or an empty one).
    #[error("No arguments provided")]
    MissingArguments,

    /// The requested tool is not in the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The arguments could not be read into the tool's parameters.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream API answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// The upstream body lacks an expected field.
    #[error("Invalid response format: {0} is undefined")]
    Format(String),

    /// The upstream result code is not the success code.
    #[error("API error: {code} - {message}")]
    Api { code: String, message: String },

    /// The upstream call exceeded the configured timeout.
    #[error("Tool execution timed out")]
    Timeout,

    /// Network failure or an undecodable body. The request URL, which
    /// embeds the access key, is stripped.
    #[error("Request failed: {0}")]
    Request(reqwest::Error),
}

impl ToolError {
    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "invalid response format" error for a missing field.
    pub fn format(field: impl Into<String>) -> Self {
        Self::Format(field.into())
    }

    /// Create a new upstream API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err.without_url())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_format() {
        assert_eq!(ToolError::MissingArguments.to_string(), "No arguments provided");
        assert_eq!(
            ToolError::UnknownTool("Foo".into()).to_string(),
            "Unknown tool: Foo"
        );
        assert_eq!(
            ToolError::Http { status: 500 }.to_string(),
            "HTTP error! status: 500"
        );
        assert_eq!(
            ToolError::format("CardSubwayStatsNew").to_string(),
            "Invalid response format: CardSubwayStatsNew is undefined"
        );
        assert_eq!(
            ToolError::api("ERROR-500", "서버 오류입니다.").to_string(),
            "API error: ERROR-500 - 서버 오류입니다."
        );
    }
}
