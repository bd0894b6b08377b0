//! Agent and skill detection.
//!
//! Skills are directories containing a `SKILL.md` file with YAML frontmatter
//! and markdown instructions. Each known agent tool keeps them in a global
//! directory under the home folder and in a per-project directory; this crate
//! finds which agents are present and which skills are installed where.

pub mod agents;
pub mod aggregate;
pub mod detect;
pub mod parse;
pub mod projects;
pub mod scanner;
pub mod scope;
pub mod types;
#[cfg(feature = "file-watcher")]
pub mod watcher;

pub use {
    agents::{AGENTS, AgentDefinition, find_agent},
    scanner::{Scan, Scanner},
    types::{
        AgentGlobalInfo, AgentInfo, AgentProjectInfo, DetectionReport, ScopeFilter, SkillRecord,
        SkillScope,
    },
};

/// File name every skill directory must contain.
pub const SKILL_MANIFEST: &str = "SKILL.md";
