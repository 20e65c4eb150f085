//! In-memory conversation storage.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use adk_gateway_core::{Conversation, ConversationId, ConversationStore, GatewayError};
use async_trait::async_trait;

/// In-memory conversation table.
///
/// Owned by one `SessionManager`; contents are lost on restart.
pub struct MemoryStore {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for MemoryStore {
    async fn insert(&self, conversation: Conversation) -> Result<(), GatewayError> {
        self.conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(conversation.id.clone(), conversation);
        Ok(())
    }

    async fn remote_session_id(&self, id: &ConversationId) -> Result<Option<String>, GatewayError> {
        Ok(self
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|c| c.remote_session_id.clone()))
    }

    async fn remove(&self, id: &ConversationId) -> Result<bool, GatewayError> {
        Ok(self
            .conversations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some())
    }

    async fn len(&self) -> Result<usize, GatewayError> {
        Ok(self
            .conversations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len())
    }
}
