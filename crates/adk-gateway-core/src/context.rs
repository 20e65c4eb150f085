//! Addressing for calls against a remote ADK server.

use serde::{Deserialize, Serialize};

/// Server URL and agent (app) name for one outbound call.
///
/// Conversations do not remember their target, so callers build one of
/// these for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTarget {
    /// Base URL of the ADK server, without a trailing slash.
    pub server_url: String,

    /// Agent (app) name on that server.
    pub agent_name: String,
}

impl AgentTarget {
    /// Create a target, trimming any trailing slash from the server URL.
    #[must_use]
    pub fn new(server_url: impl Into<String>, agent_name: impl Into<String>) -> Self {
        let server_url = server_url.into();
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            agent_name: agent_name.into(),
        }
    }

    /// Join a path onto the server URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    /// Session-creation endpoint for this agent and the given user.
    #[must_use]
    pub fn sessions_endpoint(&self, user_id: &str) -> String {
        self.endpoint(&format!(
            "/apps/{}/users/{user_id}/sessions",
            self.agent_name
        ))
    }
}
