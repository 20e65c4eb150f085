//! Static inspection of ADK agent sources.
//!
//! Provides:
//! - Declared tool and sub-agent extraction from `agent.py`
//! - Mermaid rendering of an agent's direct sub-agents
//! - Heuristic safety scanning
//! - Agent project scaffolding and deploy/eval command rendering

pub mod graph;
pub mod safety;
pub mod scaffold;
pub mod source;

pub use graph::build_graph;
pub use safety::{Finding, scan_agent_safety, scan_safety};
pub use scaffold::{DeployTarget, deploy_command, eval_command, scaffold_agent};
pub use source::{list_agent_tools, list_sub_agents, list_tools, read_agent_source};
