//! Agent project scaffolding and command rendering.
//!
//! Deploy and eval commands are rendered for the caller to run; nothing is
//! executed here.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use adk_gateway_core::GatewayError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::source::AGENT_FILE;

/// Create `<directory>/<name>/` with a minimal `agent.py` and `__init__.py`.
///
/// Returns the agent directory.
///
/// # Errors
/// Returns `InvalidArgument` for an empty or path-like name, `Io` if the
/// files cannot be written.
pub fn scaffold_agent(name: &str, directory: &Path) -> Result<PathBuf, GatewayError> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name == ".." {
        return Err(GatewayError::InvalidArgument(format!(
            "invalid agent name '{name}'"
        )));
    }

    let agent_dir = directory.join(name);
    std::fs::create_dir_all(&agent_dir)?;
    std::fs::write(agent_dir.join(AGENT_FILE), agent_template(name))?;
    std::fs::write(agent_dir.join("__init__.py"), "from . import agent\n")?;

    tracing::info!(agent = name, path = %agent_dir.display(), "Scaffolded agent");
    Ok(agent_dir)
}

fn agent_template(name: &str) -> String {
    format!(
        "from google.adk.agents import Agent\n\
         from google.adk.tools import google_search\n\
         \n\
         root_agent = Agent(\n    \
             name=\"{name}\",\n    \
             model=\"gemini-1.5-flash\",\n    \
             instruction=\"You are a helpful assistant.\",\n    \
             tools=[google_search]\n\
         )\n"
    )
}

/// Deployment platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DeployTarget {
    CloudRun,
    Gke,
}

impl fmt::Display for DeployTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CloudRun => "cloud-run",
            Self::Gke => "gke",
        })
    }
}

impl FromStr for DeployTarget {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cloud-run" => Ok(Self::CloudRun),
            "gke" => Ok(Self::Gke),
            other => Err(GatewayError::InvalidArgument(format!(
                "unknown deploy target '{other}', expected cloud-run or gke"
            ))),
        }
    }
}

/// Shell command that would deploy the agent at `agent_path`.
#[must_use]
pub fn deploy_command(
    agent_path: &Path,
    target: DeployTarget,
    project_id: &str,
    location: &str,
) -> String {
    match target {
        DeployTarget::CloudRun => {
            let service = agent_path
                .file_name()
                .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
            format!(
                "gcloud run deploy {service} --source {} --project {project_id} --region {location} --allow-unauthenticated",
                agent_path.display()
            )
        }
        // TODO: render a kubectl/gcloud container workflow once a GKE manifest layout is chosen.
        DeployTarget::Gke => "echo \"GKE deployment not yet implemented\"".to_string(),
    }
}

/// Shell command that would evaluate the agent against an eval set.
#[must_use]
pub fn eval_command(agent_path: &Path, eval_set_path: &Path) -> String {
    format!(
        "adk eval {} {}",
        agent_path.display(),
        eval_set_path.display()
    )
}
