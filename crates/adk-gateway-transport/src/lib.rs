//! Tool surface for the ADK agent gateway.
//!
//! Provides:
//! - Tool parameters and the HTTP envelope (`ToolRequest` / `ToolResponse`)
//! - `Gateway` - dispatch of each tool to the core, rendered as text
//! - MCP server on stdio (feature: mcp)
//! - HTTP transport (feature: http)

pub mod gateway;
pub mod protocol;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "http")]
pub mod http;

pub use gateway::Gateway;
pub use protocol::{ChatAction, ToolCall, ToolRequest, ToolResponse};
