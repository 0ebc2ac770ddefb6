//! weave-agents: discovery of enabled primary agents
//!
//! Agents are markdown files with YAML front matter living in the user
//! config directory and in the project tree. This crate resolves the set
//! of enabled primary agents from those files plus the host's disable
//! overrides. Pure function of directory contents; no state.

pub mod directory;
pub mod frontmatter;

pub use directory::{AgentInfo, BUILT_IN_AGENTS, DEFAULT_AGENT, config_base, discover, discover_in};
pub use frontmatter::AgentFrontMatter;
