//! Core traits for conversation storage and remote agent servers.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AgentTarget, GatewayError};

/// Local conversation handle, the only id exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    /// Mint a fresh time-derived id (`conv_<uuid v7>`).
    #[must_use]
    pub fn mint() -> Self {
        Self(format!("conv_{}", Uuid::now_v7()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ConversationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ConversationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A conversation bound to a remote session.
#[derive(Debug, Clone)]
pub struct Conversation {
    /// Local handle.
    pub id: ConversationId,
    /// Session id issued by the remote server. Never leaves the session manager.
    pub remote_session_id: String,
}

impl Conversation {
    /// Bind a freshly minted id to a remote session.
    #[must_use]
    pub fn new(remote_session_id: String) -> Self {
        Self {
            id: ConversationId::mint(),
            remote_session_id,
        }
    }
}

/// Trait for conversation table backends.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Store a conversation.
    async fn insert(&self, conversation: Conversation) -> Result<(), GatewayError>;

    /// Remote session id for a conversation, if present.
    async fn remote_session_id(&self, id: &ConversationId) -> Result<Option<String>, GatewayError>;

    /// Remove a conversation. Returns whether it was present.
    async fn remove(&self, id: &ConversationId) -> Result<bool, GatewayError>;

    /// Number of open conversations.
    async fn len(&self) -> Result<usize, GatewayError>;
}

/// Trait for remote ADK servers.
#[async_trait]
pub trait AgentServer: Send + Sync {
    /// Create a remote session and return its id.
    async fn open_session(&self, target: &AgentTarget) -> Result<String, GatewayError>;

    /// Deliver a message in buffered mode and return the final text.
    async fn deliver(
        &self,
        target: &AgentTarget,
        session_id: &str,
        message: &str,
    ) -> Result<String, GatewayError>;
}
