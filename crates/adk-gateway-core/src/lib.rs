//! Core abstractions for the ADK agent gateway.
//!
//! This crate provides the shared building blocks:
//! - `AgentTarget` - Server URL + agent name addressed by a call
//! - `RegistryEntry` / `RegistryDocument` - Persisted server registry model
//! - `GatewayError` - Error taxonomy shared by every component
//! - `GatewayConfig` - TOML + environment configuration
//! - Conversation storage and agent server traits

pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod traits;

pub use config::{ConfigError, GatewayConfig};
pub use context::AgentTarget;
pub use error::GatewayError;
pub use registry::{RegistryDocument, RegistryEntry};
pub use traits::{AgentServer, Conversation, ConversationId, ConversationStore};

/// User id sent on every outbound call to an ADK server.
pub const USER_ID: &str = "gemini-cli";

/// Returned by buffered delivery when no event carried text.
pub const NO_FINAL_TEXT: &str = "No final text response found.";
