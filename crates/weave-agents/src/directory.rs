//! Primary-agent discovery
//!
//! Resolution order mirrors the host's own rules:
//! 1. scan the user config and project-local agent directories for `*.md`
//!    files whose front matter declares `mode: primary` or `mode: all`;
//! 2. prepend the built-in agents unless a file of the same name
//!    overrides them;
//! 3. drop agents disabled in the host config JSON at either level.
//!
//! Missing directories and unreadable files are skipped silently; they
//! are expected in most checkouts.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::frontmatter;

/// Agent used when a request does not name one
pub const DEFAULT_AGENT: &str = "build";

/// Agents that exist without any definition file
pub const BUILT_IN_AGENTS: [(&str, &str); 2] = [
    (
        "build",
        "General-purpose implementation agent for building features and fixing bugs",
    ),
    (
        "plan",
        "Strategic planning agent for architecture and design decisions",
    ),
];

/// An enabled primary agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentInfo {
    pub name: String,
    pub description: Option<String>,
}

/// User-level config base: `$XDG_CONFIG_HOME/weave` or the platform default
pub fn config_base() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("weave");
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weave")
}

/// Discover enabled primary agents for a project
pub fn discover(project_dir: &Path) -> Vec<AgentInfo> {
    discover_in(&config_base(), project_dir)
}

/// Discovery with an explicit config base, for callers that manage paths
/// themselves (and for tests).
pub fn discover_in(config_base: &Path, project_dir: &Path) -> Vec<AgentInfo> {
    let agent_dirs = [config_base.join("agent"), project_dir.join(".weave/agent")];
    let config_paths = [
        config_base.join("weave.json"),
        project_dir.join(".weave/weave.json"),
    ];

    let mut agents = Vec::new();
    for dir in &agent_dirs {
        scan_agent_dir(dir, &mut agents);
    }

    for (name, description) in BUILT_IN_AGENTS {
        if !agents.iter().any(|a| a.name == name) {
            agents.insert(
                0,
                AgentInfo {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                },
            );
        }
    }

    let disabled = disabled_agents(&config_paths);
    agents.retain(|a| !disabled.contains(&a.name));
    agents
}

/// Collect primary agents defined in one directory. Earlier directories
/// win on name conflicts.
fn scan_agent_dir(dir: &Path, agents: &mut Vec<AgentInfo>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        let Some(fm) = frontmatter::parse(&content) else {
            debug!(path = %path.display(), "skipping agent file with malformed front matter");
            continue;
        };
        if !fm.is_primary() {
            continue;
        }

        if !agents.iter().any(|a| a.name == name) {
            agents.push(AgentInfo {
                name: name.to_string(),
                description: fm.description,
            });
        }
    }
}

/// Names disabled via `{ "agent": { "<name>": { "disable": true } } }` in
/// any of the host config files.
fn disabled_agents(config_paths: &[PathBuf]) -> HashSet<String> {
    let mut disabled = HashSet::new();

    for path in config_paths {
        let Ok(content) = fs::read_to_string(path) else {
            continue;
        };
        let Ok(config) = serde_json::from_str::<serde_json::Value>(&content) else {
            debug!(path = %path.display(), "skipping unparseable host config");
            continue;
        };
        let Some(agent_table) = config.get("agent").and_then(|v| v.as_object()) else {
            continue;
        };

        for (name, entry) in agent_table {
            if entry
                .get("disable")
                .and_then(|v| v.as_bool())
                .unwrap_or(false)
            {
                disabled.insert(name.clone());
            }
        }
    }

    disabled
}
