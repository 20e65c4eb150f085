//! Mermaid rendering of an agent's sub-agent topology.

use std::{fmt::Write as _, path::Path};

use adk_gateway_core::GatewayError;

use crate::source::{agent_file, list_sub_agents};

/// Render the agent in `root_path` and its direct sub-agents as a Mermaid
/// `graph TD` diagram.
///
/// The root node is named after the directory. Sub-agents are leaves; their
/// own sources are not followed. Returns an empty string when the directory
/// has no `agent.py`.
///
/// # Errors
/// Returns `Io` if `agent.py` exists but cannot be read.
pub fn build_graph(root_path: &Path) -> Result<String, GatewayError> {
    let path = agent_file(root_path);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No agent source, empty graph");
        return Ok(String::new());
    }
    let source = std::fs::read_to_string(&path)?;
    Ok(render(&root_name(root_path), &list_sub_agents(&source)))
}

fn root_name(root_path: &Path) -> String {
    root_path.file_name().map_or_else(
        || root_path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Render one root node with an edge to each child.
#[must_use]
pub fn render(root: &str, children: &[String]) -> String {
    let mut out = format!("graph TD;\n  {root}({root});\n");
    for child in children {
        let _ = writeln!(out, "  {root} --> {child};");
    }
    out
}
