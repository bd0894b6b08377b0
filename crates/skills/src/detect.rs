use std::{collections::HashMap, path::Path};

use tracing::debug;

use crate::{
    SKILL_MANIFEST,
    scope::{LocationScope, ResolvedLocation},
    types::{AgentGlobalInfo, AgentInfo, AgentProjectInfo, DetectionReport},
};

/// Probe every resolved location and build the detection report.
///
/// One [`AgentInfo`] per agent, in the order agents first appear in
/// `locations`. A project location only produces an entry when its skills
/// directory exists. Any I/O failure counts as absence for that one location.
pub fn detect(locations: &[ResolvedLocation]) -> DetectionReport {
    let mut agents: Vec<AgentInfo> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for location in locations {
        let slot = *index.entry(location.agent.id).or_insert_with(|| {
            agents.push(AgentInfo {
                id: location.agent.id.to_string(),
                display_name: location.agent.display_name.to_string(),
                detected: false,
                global: AgentGlobalInfo {
                    path: Default::default(),
                    skills: Vec::new(),
                },
                projects: Vec::new(),
            });
            agents.len() - 1
        });
        let info = &mut agents[slot];

        match &location.scope {
            LocationScope::Global { marker, skills_dir } => {
                info.detected = marker.is_dir() || skills_dir.is_dir();
                info.global = AgentGlobalInfo {
                    path: skills_dir.clone(),
                    skills: list_skill_names(skills_dir),
                };
            },
            LocationScope::Project {
                project_root,
                skills_dir,
            } => {
                if !skills_dir.is_dir() {
                    continue;
                }
                info.projects.push(AgentProjectInfo {
                    path: skills_dir.clone(),
                    project_root: project_root.clone(),
                    skills: list_skill_names(skills_dir),
                });
            },
        }
    }

    debug!(
        agents = agents.len(),
        detected = agents.iter().filter(|a| a.detected).count(),
        "detection pass complete"
    );
    DetectionReport { agents }
}

/// Names of the immediate child directories of `dir` that hold a `SKILL.md`,
/// sorted. Missing or unreadable directories yield an empty list.
pub fn list_skill_names(dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            if dir.exists() {
                debug!(dir = %dir.display(), %e, "cannot read skills directory");
            }
            return Vec::new();
        },
    };

    let mut names: Vec<String> = entries
        .flatten()
        .filter(|entry| {
            let path = entry.path();
            path.is_dir() && path.join(SKILL_MANIFEST).is_file()
        })
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
