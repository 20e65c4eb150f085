//! Declared list extraction from agent source text.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use adk_gateway_core::GatewayError;

/// Agent definition file inside an agent directory.
pub const AGENT_FILE: &str = "agent.py";

/// Path of the agent definition file for an agent directory.
#[must_use]
pub fn agent_file(agent_dir: &Path) -> PathBuf {
    agent_dir.join(AGENT_FILE)
}

/// Read `<agent_dir>/agent.py`.
///
/// # Errors
/// Returns `NotFound` if the file is absent, `Io` for other read failures.
pub fn read_agent_source(agent_dir: &Path) -> Result<String, GatewayError> {
    let path = agent_file(agent_dir);
    std::fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GatewayError::NotFound(path.display().to_string()),
        _ => GatewayError::Io(e),
    })
}

/// Items of the first `<key>=[...]` list in `source`.
///
/// The list ends at the first `]` after the opening bracket, so nested
/// brackets are not balanced. Items are trimmed; empty items are dropped.
#[must_use]
pub fn declared_list(source: &str, key: &str) -> Vec<String> {
    let opener = format!("{key}=[");
    let Some(start) = source.find(&opener).map(|i| i + opener.len()) else {
        return Vec::new();
    };
    let Some(len) = source[start..].find(']') else {
        return Vec::new();
    };

    source[start..start + len]
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Declared tools (`tools=[...]`).
#[must_use]
pub fn list_tools(source: &str) -> Vec<String> {
    declared_list(source, "tools")
}

/// Declared sub-agents (`sub_agents=[...]`).
#[must_use]
pub fn list_sub_agents(source: &str) -> Vec<String> {
    declared_list(source, "sub_agents")
}

/// Declared tools of the agent in `agent_dir`.
///
/// # Errors
/// Returns error if `agent.py` cannot be read.
pub fn list_agent_tools(agent_dir: &Path) -> Result<Vec<String>, GatewayError> {
    read_agent_source(agent_dir).map(|source| list_tools(&source))
}
