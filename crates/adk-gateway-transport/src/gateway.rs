//! Tool dispatch.
//!
//! Every tool returns a single text payload. Errors never propagate out of
//! [`Gateway::call`]; they are rendered as text starting with `Error:` or
//! `Failed to`.

use std::path::Path;

use adk_gateway_client::AdkClient;
use adk_gateway_core::{AgentTarget, ConversationId, GatewayConfig, GatewayError};
use adk_gateway_inspect as inspect;
use adk_gateway_registry::{JsonFileRegistry, Listing};
use adk_gateway_session::{SessionManager, storage::MemoryStore};
use serde::Serialize;

use crate::protocol::{
    AddServerInput, AgentInput, AgentPathInput, ChatAction, ChatInput, CreateAgentInput,
    DeployInput, EvaluateInput, MessageInput, RemoveServerInput, ServerUrlInput, ToolCall,
};

/// Owns the registry, the HTTP client, and the conversation table.
pub struct Gateway {
    registry: JsonFileRegistry,
    client: AdkClient,
    sessions: SessionManager<MemoryStore, AdkClient>,
}

impl Gateway {
    /// Build a gateway from config, resolving a relative registry path
    /// against `cwd`.
    #[must_use]
    pub fn new(config: &GatewayConfig, cwd: &Path) -> Self {
        Self::with_parts(
            JsonFileRegistry::new(config.registry_path_in(cwd)),
            AdkClient::from_config(config),
        )
    }

    #[must_use]
    pub fn with_parts(registry: JsonFileRegistry, client: AdkClient) -> Self {
        Self {
            registry,
            sessions: SessionManager::new(MemoryStore::new(), client.clone()),
            client,
        }
    }

    /// Run one tool and render its result.
    pub async fn call(&self, call: ToolCall) -> String {
        let tool = call.name();
        tracing::debug!(tool, "Tool call");

        let text = match call {
            ToolCall::ListAdkServers => self.list_servers().await,
            ToolCall::ListAdkAgents(ServerUrlInput { adk_server_url }) => self
                .client
                .list_apps(&adk_server_url)
                .await
                .and_then(|apps| pretty(&apps))
                .unwrap_or_else(|e| format!("Failed to list agents: {e}")),
            ToolCall::CreateSession(AgentInput {
                adk_server_url,
                agent_name,
            }) => self
                .client
                .create_session(&AgentTarget::new(adk_server_url, agent_name))
                .await
                .map(|session| session.to_string())
                .unwrap_or_else(|e| format!("Failed to create session: {e}")),
            ToolCall::SendMessageToAgent(input) => self
                .client
                .send_message(&target_of(&input), &input.session_id, &input.message)
                .await
                .unwrap_or_else(|e| format!("Failed to send message: {e}")),
            ToolCall::StreamMessageToAgent(input) => self
                .client
                .stream_message(&target_of(&input), &input.session_id, &input.message)
                .await
                .unwrap_or_else(error_text),
            ToolCall::ManageChatSession(ChatInput {
                action,
                conversation_id,
                adk_server_url,
                agent_name,
                message,
            }) => {
                let target = adk_server_url
                    .zip(agent_name)
                    .map(|(url, agent)| AgentTarget::new(url, agent));
                let id = conversation_id.map(ConversationId::from);
                self.manage_chat(action, id, target, message).await
            }
            ToolCall::AddAdkServer(AddServerInput { name, url }) => {
                match self.registry.add(&name, &url).await {
                    Ok(()) => format!("Server '{name}' added successfully."),
                    Err(e) => error_text(e),
                }
            }
            ToolCall::RemoveAdkServer(RemoveServerInput { name }) => {
                match self.registry.remove(&name).await {
                    Ok(_) => format!("Server '{name}' removed successfully."),
                    Err(GatewayError::NotFound(_)) => {
                        "Error: Configuration file not found.".to_string()
                    }
                    Err(e) => error_text(e),
                }
            }
            ToolCall::ListAgentTools(AgentPathInput { agent_path }) => {
                match inspect::list_agent_tools(&agent_path) {
                    Ok(tools) if tools.is_empty() => "No tools found for this agent.".to_string(),
                    Ok(tools) => pretty(&tools).unwrap_or_else(error_text),
                    Err(e) => error_text(e),
                }
            }
            ToolCall::VisualizeAgentSystem(AgentPathInput { agent_path }) => {
                inspect::build_graph(&agent_path).unwrap_or_else(error_text)
            }
            ToolCall::ScanAgentSafety(AgentPathInput { agent_path }) => {
                inspect::scan_agent_safety(&agent_path)
                    .and_then(|findings| pretty(&findings))
                    .unwrap_or_else(error_text)
            }
            ToolCall::CreateAgent(CreateAgentInput {
                agent_name,
                directory_path,
            }) => match inspect::scaffold_agent(&agent_name, &directory_path) {
                Ok(dir) => format!("Agent '{agent_name}' created at {}", dir.display()),
                Err(e) => error_text(e),
            },
            ToolCall::DeployAgent(DeployInput {
                agent_path,
                target,
                project_id,
                location,
            }) => format!(
                "Would run command: {}",
                inspect::deploy_command(&agent_path, target, &project_id, &location)
            ),
            ToolCall::EvaluateAgent(EvaluateInput {
                agent_path,
                eval_set_path,
            }) => format!(
                "Would run command: {}",
                inspect::eval_command(&agent_path, &eval_set_path)
            ),
        };

        tracing::debug!(tool, bytes = text.len(), "Tool finished");
        text
    }

    async fn list_servers(&self) -> String {
        let file = self.registry_file_name();
        match self.registry.list().await {
            Ok(Listing::Entries(entries)) => pretty(&entries).unwrap_or_else(error_text),
            Ok(Listing::Empty) => format!("Error: No ADK servers found in {file}."),
            Err(GatewayError::Malformed(_)) => format!(
                "Error: Invalid format for {file}. It should have an \"agents\" array."
            ),
            Err(e) => format!("Error reading or parsing {file}: {e}"),
        }
    }

    async fn manage_chat(
        &self,
        action: ChatAction,
        id: Option<ConversationId>,
        target: Option<AgentTarget>,
        message: Option<String>,
    ) -> String {
        match action {
            ChatAction::Start => {
                let Some(target) = target else {
                    return "Error: adk_server_url and agent_name are required to start a session."
                        .to_string();
                };
                match self.sessions.start(&target).await {
                    Ok(id) => format!("Session started with ID: {id}"),
                    Err(e) => format!("Failed to create session: {e}"),
                }
            }
            ChatAction::Message => {
                let (Some(id), Some(message)) = (id, message) else {
                    return "Error: conversation_id and message are required to send a message."
                        .to_string();
                };
                match self.sessions.is_open(&id).await {
                    Ok(true) => {}
                    Ok(false) => return "Error: Invalid conversation_id.".to_string(),
                    Err(e) => return error_text(e),
                }
                let Some(target) = target else {
                    return "Error: adk_server_url and agent_name are required to send a message."
                        .to_string();
                };
                match self.sessions.send(&id, &target, &message).await {
                    Ok(text) => text,
                    Err(GatewayError::InvalidHandle(_)) => {
                        "Error: Invalid conversation_id.".to_string()
                    }
                    Err(e) => format!("Failed to send message: {e}"),
                }
            }
            ChatAction::End => {
                let Some(id) = id else {
                    return "Error: conversation_id is required to end a session.".to_string();
                };
                match self.sessions.end(&id).await {
                    Ok(_) => "Session ended.".to_string(),
                    Err(e) => error_text(e),
                }
            }
        }
    }

    fn registry_file_name(&self) -> String {
        let path = self.registry.path();
        path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

fn target_of(input: &MessageInput) -> AgentTarget {
    AgentTarget::new(input.adk_server_url.clone(), input.agent_name.clone())
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, GatewayError> {
    serde_json::to_string_pretty(value).map_err(|e| GatewayError::ProtocolError(e.to_string()))
}

#[allow(clippy::needless_pass_by_value)]
fn error_text(e: GatewayError) -> String {
    format!("Error: {e}")
}
