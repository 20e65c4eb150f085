//! Session manager for conversations with ADK agents.

use adk_gateway_core::{
    AgentServer, AgentTarget, Conversation, ConversationId, ConversationStore, GatewayError,
};

/// Session manager for conversations with ADK agents.
///
/// Maps local conversation ids to remote session ids. A conversation does not
/// remember which server or agent it was started against: callers pass the
/// same [`AgentTarget`] to [`send`](Self::send) that they passed to
/// [`start`](Self::start).
pub struct SessionManager<S, A>
where
    S: ConversationStore,
    A: AgentServer,
{
    store: S,
    server: A,
}

impl<S, A> SessionManager<S, A>
where
    S: ConversationStore,
    A: AgentServer,
{
    /// Create a new session manager.
    #[must_use]
    pub const fn new(store: S, server: A) -> Self {
        Self { store, server }
    }

    /// Open a remote session and bind it to a fresh conversation id.
    ///
    /// # Errors
    /// Returns error if the remote session cannot be created.
    pub async fn start(&self, target: &AgentTarget) -> Result<ConversationId, GatewayError> {
        let remote_session_id = self.server.open_session(target).await?;
        let conversation = Conversation::new(remote_session_id);
        let id = conversation.id.clone();
        self.store.insert(conversation).await?;

        tracing::info!(conversation = %id, agent = %target.agent_name, "Conversation started");
        Ok(id)
    }

    /// Send a message within a conversation and return the agent's final text.
    ///
    /// # Errors
    /// Returns `InvalidHandle` if the conversation is unknown, or the remote
    /// error if delivery fails.
    pub async fn send(
        &self,
        id: &ConversationId,
        target: &AgentTarget,
        message: &str,
    ) -> Result<String, GatewayError> {
        let remote_session_id = self
            .store
            .remote_session_id(id)
            .await?
            .ok_or_else(|| GatewayError::InvalidHandle(id.to_string()))?;

        tracing::debug!(conversation = %id, agent = %target.agent_name, "Sending message");
        self.server
            .deliver(target, &remote_session_id, message)
            .await
    }

    /// Whether a conversation is open.
    ///
    /// # Errors
    /// Returns error only if the store fails.
    pub async fn is_open(&self, id: &ConversationId) -> Result<bool, GatewayError> {
        Ok(self.store.remote_session_id(id).await?.is_some())
    }

    /// End a conversation. Ending an unknown conversation is not an error.
    ///
    /// Returns whether the conversation was open.
    ///
    /// # Errors
    /// Returns error only if the store fails.
    pub async fn end(&self, id: &ConversationId) -> Result<bool, GatewayError> {
        let removed = self.store.remove(id).await?;
        if removed {
            tracing::info!(conversation = %id, "Conversation ended");
        }
        Ok(removed)
    }

    /// Number of open conversations.
    ///
    /// # Errors
    /// Returns error only if the store fails.
    pub async fn open_conversations(&self) -> Result<usize, GatewayError> {
        self.store.len().await
    }
}
