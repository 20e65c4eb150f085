//! Tool parameters and the request envelope.
//!
//! Each tool's parameters are one struct. The MCP server advertises their
//! JSON schemas; the HTTP surface accepts them flattened next to a `tool` tag.

use std::path::PathBuf;

use adk_gateway_inspect::DeployTarget;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ServerUrlInput {
    /// The URL of the ADK server.
    pub adk_server_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentInput {
    /// The URL of the ADK server.
    pub adk_server_url: String,
    /// The name of the agent.
    pub agent_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MessageInput {
    /// The URL of the ADK server.
    pub adk_server_url: String,
    /// The name of the agent.
    pub agent_name: String,
    /// The session ID to use.
    pub session_id: String,
    /// The user's message to the agent.
    pub message: String,
}

/// Conversation action for `manage_chat_session`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Start,
    Message,
    End,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatInput {
    pub action: ChatAction,
    /// Required for `message` and `end`.
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Required for `start` and `message`.
    #[serde(default)]
    pub adk_server_url: Option<String>,
    /// Required for `start` and `message`.
    #[serde(default)]
    pub agent_name: Option<String>,
    /// Required for `message`.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddServerInput {
    pub name: String,
    /// Absolute http(s) URL.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RemoveServerInput {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AgentPathInput {
    /// Directory containing the agent's `agent.py`.
    pub agent_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateAgentInput {
    pub agent_name: String,
    /// Parent directory of the new project.
    pub directory_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeployInput {
    pub agent_path: PathBuf,
    pub target: DeployTarget,
    pub project_id: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateInput {
    pub agent_path: PathBuf,
    pub eval_set_path: PathBuf,
}

/// One tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCall {
    /// List servers in the registry.
    #[serde(alias = "list_adks")]
    ListAdkServers,
    /// List agents served by an ADK server.
    ListAdkAgents(ServerUrlInput),
    /// Create a raw remote session.
    CreateSession(AgentInput),
    /// Send a message and return the final text.
    SendMessageToAgent(MessageInput),
    /// Send a message and return all streamed text.
    StreamMessageToAgent(MessageInput),
    /// Start, message, or end a conversation.
    ManageChatSession(ChatInput),
    /// Register a server.
    AddAdkServer(AddServerInput),
    /// Unregister every server with this name.
    RemoveAdkServer(RemoveServerInput),
    /// Declared tools of an agent directory.
    ListAgentTools(AgentPathInput),
    /// Mermaid diagram of an agent's sub-agents.
    VisualizeAgentSystem(AgentPathInput),
    /// Heuristic safety scan of an agent directory.
    ScanAgentSafety(AgentPathInput),
    /// Scaffold a new agent project.
    CreateAgent(CreateAgentInput),
    /// Render the deploy command for an agent.
    DeployAgent(DeployInput),
    /// Render the eval command for an agent.
    EvaluateAgent(EvaluateInput),
}

impl ToolCall {
    /// Tool name as it appears on the wire.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListAdkServers => "list_adk_servers",
            Self::ListAdkAgents(_) => "list_adk_agents",
            Self::CreateSession(_) => "create_session",
            Self::SendMessageToAgent(_) => "send_message_to_agent",
            Self::StreamMessageToAgent(_) => "stream_message_to_agent",
            Self::ManageChatSession(_) => "manage_chat_session",
            Self::AddAdkServer(_) => "add_adk_server",
            Self::RemoveAdkServer(_) => "remove_adk_server",
            Self::ListAgentTools(_) => "list_agent_tools",
            Self::VisualizeAgentSystem(_) => "visualize_agent_system",
            Self::ScanAgentSafety(_) => "scan_agent_safety",
            Self::CreateAgent(_) => "create_agent",
            Self::DeployAgent(_) => "deploy_agent",
            Self::EvaluateAgent(_) => "evaluate_agent",
        }
    }
}

/// Request envelope with an optional correlation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub call: ToolCall,
}

/// Single text payload returned for every request.
///
/// Failures are reported in `text`, starting with `Error:` or `Failed to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub text: String,
}

impl ToolResponse {
    #[must_use]
    pub fn new(id: Option<Value>, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_parameters() {
        let req: ToolRequest = serde_json::from_str(
            r#"{"id": 7, "tool": "add_adk_server", "name": "local", "url": "http://localhost:8000"}"#,
        )
        .unwrap();
        assert_eq!(req.id, Some(serde_json::json!(7)));
        let ToolCall::AddAdkServer(input) = req.call else {
            panic!("Wrong tool");
        };
        assert_eq!(input.name, "local");
        assert_eq!(input.url, "http://localhost:8000");
    }

    #[test]
    fn test_unit_tool_and_alias() {
        let req: ToolRequest = serde_json::from_str(r#"{"tool": "list_adks"}"#).unwrap();
        assert!(matches!(req.call, ToolCall::ListAdkServers));
        assert_eq!(req.call.name(), "list_adk_servers");
        assert!(req.id.is_none());
    }

    #[test]
    fn test_manage_chat_session_optional_fields() {
        let req: ToolRequest = serde_json::from_str(
            r#"{"tool": "manage_chat_session", "action": "end", "conversation_id": "conv_1"}"#,
        )
        .unwrap();
        let ToolCall::ManageChatSession(input) = req.call else {
            panic!("Wrong tool");
        };
        assert_eq!(input.action, ChatAction::End);
        assert_eq!(input.conversation_id.as_deref(), Some("conv_1"));
        assert!(input.adk_server_url.is_none());
    }

    #[test]
    fn test_deploy_target_names() {
        let input: DeployInput = serde_json::from_str(
            r#"{"agent_path": "a", "target": "cloud-run", "project_id": "p", "location": "l"}"#,
        )
        .unwrap();
        assert_eq!(input.target, DeployTarget::CloudRun);
    }

    #[test]
    fn test_schema_lists_required_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(MessageInput)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert_eq!(
            schema["properties"]["session_id"]["description"],
            "The session ID to use."
        );

        let schema = serde_json::to_value(schemars::schema_for!(ChatInput)).unwrap();
        assert_eq!(schema["required"], serde_json::json!(["action"]));
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert!(serde_json::from_str::<ToolRequest>(r#"{"tool": "format_disk"}"#).is_err());
    }

    #[test]
    fn test_response_omits_missing_id() {
        let json = serde_json::to_string(&ToolResponse::new(None, "ok")).unwrap();
        assert_eq!(json, r#"{"text":"ok"}"#);
    }
}
