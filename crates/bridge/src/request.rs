use std::path::PathBuf;

use {serde::Serialize, skilldash_skills::parse::validate_name};

use crate::error::{Error, Result};

/// What the tool is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolVerb {
    Add,
    Remove,
    CheckUpdates,
    Update,
    UpdateOne,
    Init,
}

impl ToolVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::CheckUpdates => "check",
            Self::Update | Self::UpdateOne => "update",
            Self::Init => "init",
        }
    }

    /// Whether the verb changes what is installed on disk.
    pub fn mutates(self) -> bool {
        !matches!(self, Self::CheckUpdates)
    }
}

impl std::fmt::Display for ToolVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One invocation of the external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolRequest {
    pub verb: ToolVerb,
    /// Package source for `add` (`owner/repo`, URL, local path).
    pub source: Option<String>,
    /// Target agent ids (`-a`).
    pub agents: Vec<String>,
    /// Skill names: `-s` filters for `add`, positional for the others.
    pub skills: Vec<String>,
    pub global: bool,
    pub list_only: bool,
    pub all: bool,
    pub working_dir: Option<PathBuf>,
}

impl ToolRequest {
    fn new(verb: ToolVerb) -> Self {
        Self {
            verb,
            source: None,
            agents: Vec::new(),
            skills: Vec::new(),
            global: false,
            list_only: false,
            all: false,
            working_dir: None,
        }
    }

    /// Install from `source`. Project installs run inside `project`.
    pub fn add(source: impl Into<String>, global: bool, project: Option<PathBuf>) -> Self {
        Self {
            source: Some(source.into()),
            global,
            working_dir: if global { None } else { project },
            ..Self::new(ToolVerb::Add)
        }
    }

    /// Uninstall `skills`. Project removals run inside `project`.
    pub fn remove(skills: Vec<String>, global: bool, project: Option<PathBuf>) -> Self {
        Self {
            skills,
            global,
            working_dir: if global { None } else { project },
            ..Self::new(ToolVerb::Remove)
        }
    }

    pub fn check_updates() -> Self {
        Self::new(ToolVerb::CheckUpdates)
    }

    pub fn update_all() -> Self {
        Self::new(ToolVerb::Update)
    }

    pub fn update_one(skill: impl Into<String>) -> Self {
        Self {
            skills: vec![skill.into()],
            ..Self::new(ToolVerb::UpdateOne)
        }
    }

    /// Scaffold a new skill called `name` inside `dir`.
    pub fn init(name: impl Into<String>, dir: PathBuf) -> Self {
        Self {
            skills: vec![name.into()],
            working_dir: Some(dir),
            ..Self::new(ToolVerb::Init)
        }
    }

    #[must_use]
    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = agents;
        self
    }

    #[must_use]
    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    #[must_use]
    pub fn list_only(mut self, list_only: bool) -> Self {
        self.list_only = list_only;
        self
    }

    #[must_use]
    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    /// Reject requests the tool could only fail on.
    pub fn validate(&self) -> Result<()> {
        match self.verb {
            ToolVerb::Add => {
                if self.source.as_deref().is_none_or(|s| s.trim().is_empty()) {
                    return Err(Error::invalid("add requires a source"));
                }
            },
            ToolVerb::Remove => {
                if self.skills.is_empty() {
                    return Err(Error::invalid("remove requires at least one skill name"));
                }
            },
            ToolVerb::UpdateOne => {
                if self.skills.len() != 1 {
                    return Err(Error::invalid("update-one requires exactly one skill name"));
                }
            },
            ToolVerb::Init => {
                let name = self.skills.first().map(String::as_str).unwrap_or_default();
                if !validate_name(name) {
                    return Err(Error::invalid(format!(
                        "invalid skill name '{name}': must be 1-64 lowercase alphanumeric/hyphen chars"
                    )));
                }
                if self.working_dir.is_none() {
                    return Err(Error::invalid("init requires a target directory"));
                }
            },
            ToolVerb::CheckUpdates | ToolVerb::Update => {},
        }
        Ok(())
    }

    /// Arguments passed after the package name.
    ///
    /// `-y` is appended when `non_interactive` is set, except for `init`
    /// which never prompts.
    pub fn args(&self, non_interactive: bool) -> Vec<String> {
        let mut args = vec![self.verb.as_str().to_string()];
        match self.verb {
            ToolVerb::Add => {
                args.extend(self.source.clone());
                for agent in &self.agents {
                    args.push("-a".into());
                    args.push(agent.clone());
                }
                for skill in &self.skills {
                    args.push("-s".into());
                    args.push(skill.clone());
                }
                if self.global {
                    args.push("-g".into());
                }
                if self.list_only {
                    args.push("--list".into());
                }
                if self.all {
                    args.push("--all".into());
                }
            },
            ToolVerb::Remove => {
                args.extend(self.skills.iter().cloned());
                for agent in &self.agents {
                    args.push("-a".into());
                    args.push(agent.clone());
                }
                if self.global {
                    args.push("-g".into());
                }
            },
            ToolVerb::UpdateOne | ToolVerb::Init => args.extend(self.skills.iter().cloned()),
            ToolVerb::CheckUpdates | ToolVerb::Update => {},
        }
        if non_interactive && self.verb != ToolVerb::Init {
            args.push("-y".into());
        }
        args
    }
}
