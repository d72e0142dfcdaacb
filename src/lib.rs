//! Seoul Open Data MCP Server Library
//!
//! This crate exposes two datasets of the Seoul Open Data Plaza
//! (`data.seoul.go.kr`) as Model Context Protocol tools:
//!
//! - **KoreaSeoulSubwayStatus**: boarding and alighting counts per subway
//!   line and station for a given day
//! - **CulturalEventInfo**: cultural event listings from the Seoul Culture
//!   Portal
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the rmcp server handler and
//!   transports
//! - **domains::tools**: tool definitions, the shared Seoul API client and
//!   the registry that dispatches `tools/call`
//!
//! # Example
//!
//! ```rust,no_run
//! use seoul_data_mcp_server::{core::Config, core::McpServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use crate::core::{Config, Error, McpServer, Result};
