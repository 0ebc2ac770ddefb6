//! Front-matter parsing for agent definition files
//!
//! Agent files open with a `---` fenced YAML block; the markdown body
//! below it is the agent's prompt and is not interpreted here.

use serde::Deserialize;

/// Front-matter fields this crate cares about. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AgentFrontMatter {
    /// Where the agent is selectable: `primary`, `subagent`, or `all`
    pub mode: Option<String>,
    /// Human-readable description shown in rosters
    pub description: Option<String>,
}

impl AgentFrontMatter {
    /// Whether this file declares a primary agent
    pub fn is_primary(&self) -> bool {
        matches!(self.mode.as_deref(), Some("primary") | Some("all"))
    }
}

/// Split a `---` fenced front-matter block off the top of `content`.
///
/// Returns `(yaml, body)`. A file without a fence, or with an
/// unterminated one, has no front matter and the whole content is body.
pub fn extract(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    let after_open = after_open.strip_prefix('\n').unwrap_or(after_open);

    match after_open.find("\n---") {
        Some(end) => {
            let yaml = &after_open[..end];
            let body = &after_open[end + 4..];
            (Some(yaml), body.strip_prefix('\n').unwrap_or(body))
        }
        None => (None, content),
    }
}

/// Parse the front matter of an agent file.
///
/// `None` means the YAML block exists but is malformed; callers skip the
/// file. A file without a block parses to empty front matter.
pub fn parse(content: &str) -> Option<AgentFrontMatter> {
    match extract(content).0 {
        Some(yaml) => serde_yaml::from_str(yaml).ok(),
        None => Some(AgentFrontMatter::default()),
    }
}
