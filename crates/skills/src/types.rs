use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::SKILL_MANIFEST;

// ── Detection report ─────────────────────────────────────────────────────────

/// Global-scope skills directory of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentGlobalInfo {
    pub path: PathBuf,
    pub skills: Vec<String>,
}

/// Project-scope skills directory of one agent under one project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProjectInfo {
    /// The skills directory itself.
    pub path: PathBuf,
    pub project_root: PathBuf,
    pub skills: Vec<String>,
}

/// Everything known about one agent after a scan.
///
/// `detected` only says whether the tool is installed; an undetected agent
/// still carries its (possibly empty) global entry so every agent can be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: String,
    pub display_name: String,
    pub detected: bool,
    pub global: AgentGlobalInfo,
    pub projects: Vec<AgentProjectInfo>,
}

impl AgentInfo {
    /// Total number of skill entries across global and project scope.
    pub fn skill_count(&self) -> usize {
        self.global.skills.len() + self.projects.iter().map(|p| p.skills.len()).sum::<usize>()
    }
}

/// One entry per known agent, in agent table order. Rebuilt on every scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionReport {
    pub agents: Vec<AgentInfo>,
}

impl DetectionReport {
    pub fn agent(&self, id: &str) -> Option<&AgentInfo> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Agents whose tool was found on this machine.
    pub fn detected(&self) -> impl Iterator<Item = &AgentInfo> {
        self.agents.iter().filter(|a| a.detected)
    }

    /// Detected agents first, then by display name.
    pub fn display_order(&self) -> Vec<&AgentInfo> {
        let mut agents: Vec<&AgentInfo> = self.agents.iter().collect();
        agents.sort_by(|a, b| {
            b.detected
                .cmp(&a.detected)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        agents
    }

    /// Every distinct project root that appears anywhere in the report.
    pub fn project_roots(&self) -> Vec<&Path> {
        let mut roots: Vec<&Path> = Vec::new();
        for project in self.agents.iter().flat_map(|a| &a.projects) {
            if !roots.contains(&project.project_root.as_path()) {
                roots.push(&project.project_root);
            }
        }
        roots
    }

    /// Skills directories that currently exist on disk, without duplicates.
    pub fn existing_skill_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        let candidates = self.agents.iter().flat_map(|a| {
            std::iter::once(&a.global.path).chain(a.projects.iter().map(|p| &p.path))
        });
        for dir in candidates {
            if dir.is_dir() && !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        dirs
    }

    /// All global skills directories, one per agent.
    pub fn global_dirs(&self) -> impl Iterator<Item = &Path> {
        self.agents.iter().map(|a| a.global.path.as_path())
    }

    /// True when no agent has a single skill installed anywhere.
    pub fn is_empty_of_skills(&self) -> bool {
        self.agents.iter().all(|a| a.skill_count() == 0)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

// ── Skill records ────────────────────────────────────────────────────────────

/// Whether a skill is installed machine-wide or inside one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillScope {
    Global,
    Project,
}

impl std::fmt::Display for SkillScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Global => "global",
            Self::Project => "project",
        })
    }
}

/// Which skills a listing should include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeFilter {
    #[default]
    All,
    Global,
    Project,
}

impl ScopeFilter {
    pub fn matches(self, scope: SkillScope) -> bool {
        match self {
            Self::All => true,
            Self::Global => scope == SkillScope::Global,
            Self::Project => scope == SkillScope::Project,
        }
    }
}

impl std::str::FromStr for ScopeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "global" => Ok(Self::Global),
            "project" => Ok(Self::Project),
            other => anyhow::bail!("unknown scope '{other}': expected all, global or project"),
        }
    }
}

/// One installed skill, possibly shared by several agents.
///
/// `install_path` is the skill directory and is unique within a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
    pub install_path: PathBuf,
    pub scope: SkillScope,
    pub agents: Vec<String>,
    #[serde(default)]
    pub has_update: bool,
    #[serde(default)]
    pub body: String,
}

impl SkillRecord {
    pub fn manifest_path(&self) -> PathBuf {
        self.install_path.join(SKILL_MANIFEST)
    }
}
