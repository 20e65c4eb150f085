//! MCP server exposing the gateway tools.
//!
//! Every tool delegates to [`Gateway::call`] and answers with one text content
//! item. Failures are reported in that text, never as protocol errors.

use std::{io, sync::Arc};

use rmcp::{
    ErrorData as McpError, ServiceExt,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, ToolsCapability,
    },
    tool, tool_handler, tool_router,
};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    gateway::Gateway,
    protocol::{
        AddServerInput, AgentInput, AgentPathInput, ChatInput, CreateAgentInput, DeployInput,
        EvaluateInput, MessageInput, RemoveServerInput, ServerUrlInput, ToolCall,
    },
};

/// MCP tool server backed by one [`Gateway`].
#[derive(Clone)]
pub struct GatewayMcpServer {
    gateway: Arc<Gateway>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GatewayMcpServer {
    #[must_use]
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            tool_router: Self::tool_router(),
        }
    }

    async fn run(&self, call: ToolCall) -> Result<CallToolResult, McpError> {
        let text = self.gateway.call(call).await;
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    #[tool(description = "Fetches the list of available ADK servers from adk_agent_list.json.")]
    async fn list_adks(&self) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ListAdkServers).await
    }

    #[tool(description = "Fetches the list of available ADK servers from adk_agent_list.json.")]
    async fn list_adk_servers(&self) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ListAdkServers).await
    }

    #[tool(description = "Fetches a list of available agents from a specific ADK server.")]
    async fn list_adk_agents(
        &self,
        Parameters(input): Parameters<ServerUrlInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ListAdkAgents(input)).await
    }

    #[tool(description = "Creates a new session for a specified agent on a specific ADK server.")]
    async fn create_session(
        &self,
        Parameters(input): Parameters<AgentInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::CreateSession(input)).await
    }

    #[tool(description = "Sends a message to an agent session and gets the result.")]
    async fn send_message_to_agent(
        &self,
        Parameters(input): Parameters<MessageInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::SendMessageToAgent(input)).await
    }

    #[tool(description = "Sends a message to an agent and streams the response.")]
    async fn stream_message_to_agent(
        &self,
        Parameters(input): Parameters<MessageInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::StreamMessageToAgent(input)).await
    }

    #[tool(
        description = "Manages an interactive chat session. Actions: start (requires adk_server_url, agent_name), message (requires conversation_id, message, adk_server_url, agent_name), end (requires conversation_id)."
    )]
    async fn manage_chat_session(
        &self,
        Parameters(input): Parameters<ChatInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ManageChatSession(input)).await
    }

    #[tool(description = "Adds a new ADK server to the configuration.")]
    async fn add_adk_server(
        &self,
        Parameters(input): Parameters<AddServerInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::AddAdkServer(input)).await
    }

    #[tool(description = "Removes an ADK server from the configuration.")]
    async fn remove_adk_server(
        &self,
        Parameters(input): Parameters<RemoveServerInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::RemoveAdkServer(input)).await
    }

    #[tool(description = "Lists the tools available to a specific agent.")]
    async fn list_agent_tools(
        &self,
        Parameters(input): Parameters<AgentPathInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ListAgentTools(input)).await
    }

    #[tool(description = "Generates a Mermaid diagram of a multi-agent system.")]
    async fn visualize_agent_system(
        &self,
        Parameters(input): Parameters<AgentPathInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::VisualizeAgentSystem(input)).await
    }

    #[tool(description = "Scans an agent for potential security vulnerabilities.")]
    async fn scan_agent_safety(
        &self,
        Parameters(input): Parameters<AgentPathInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::ScanAgentSafety(input)).await
    }

    #[tool(description = "Creates a new ADK agent project.")]
    async fn create_agent(
        &self,
        Parameters(input): Parameters<CreateAgentInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::CreateAgent(input)).await
    }

    #[tool(description = "Deploys an ADK agent. Returns the command to run; nothing is executed.")]
    async fn deploy_agent(
        &self,
        Parameters(input): Parameters<DeployInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::DeployAgent(input)).await
    }

    #[tool(
        description = "Runs `adk eval` on a specified agent. Returns the command to run; nothing is executed."
    )]
    async fn evaluate_agent(
        &self,
        Parameters(input): Parameters<EvaluateInput>,
    ) -> Result<CallToolResult, McpError> {
        self.run(ToolCall::EvaluateAgent(input)).await
    }
}

#[tool_handler]
impl rmcp::handler::server::ServerHandler for GatewayMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "adk-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Gateway to ADK agent servers. Use list_adk_servers to find registered \
                servers, then manage_chat_session to talk to an agent."
                    .to_string(),
            ),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

/// Serve MCP on `reader`/`writer` until the client disconnects.
///
/// # Errors
/// Returns error if the initialization handshake fails or the service task
/// aborts.
pub async fn serve<R, W>(gateway: Arc<Gateway>, reader: R, writer: W) -> io::Result<()>
where
    R: AsyncRead + Send + Unpin + 'static,
    W: AsyncWrite + Send + Unpin + 'static,
{
    let service = GatewayMcpServer::new(gateway)
        .serve((reader, writer))
        .await
        .map_err(io::Error::other)?;
    tracing::info!("MCP client initialized");

    let reason = service.waiting().await.map_err(io::Error::other)?;
    tracing::info!(?reason, "MCP client disconnected");
    Ok(())
}

/// Serve MCP on the process's stdin and stdout.
///
/// # Errors
/// Returns error if the handshake fails or the service task aborts.
pub async fn serve_stdio(gateway: Arc<Gateway>) -> io::Result<()> {
    tracing::info!("Serving MCP on stdio");
    let (stdin, stdout) = rmcp::transport::io::stdio();
    serve(gateway, stdin, stdout).await
}
