//! Turns the agent table plus the configured project roots into the concrete
//! directories a scan has to look at. Pure path arithmetic; the filesystem is
//! never touched here.

use std::path::{Path, PathBuf};

use crate::agents::AgentDefinition;

/// A directory to inspect for one agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationScope {
    Global {
        /// Presence of this directory means the agent tool is installed.
        marker: PathBuf,
        skills_dir: PathBuf,
    },
    Project {
        project_root: PathBuf,
        skills_dir: PathBuf,
    },
}

impl LocationScope {
    pub fn skills_dir(&self) -> &Path {
        match self {
            Self::Global { skills_dir, .. } | Self::Project { skills_dir, .. } => skills_dir,
        }
    }
}

/// One agent paired with one of its candidate locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub agent: &'static AgentDefinition,
    pub scope: LocationScope,
}

/// Resolve every candidate location.
///
/// For each agent, in table order: its global location, then one project
/// location per root in `project_roots` order. With no roots only global
/// locations are produced.
pub fn resolve_scopes(
    agents: &'static [AgentDefinition],
    home: &Path,
    project_roots: &[PathBuf],
) -> Vec<ResolvedLocation> {
    let mut out = Vec::with_capacity(agents.len() * (1 + project_roots.len()));
    for agent in agents {
        out.push(ResolvedLocation {
            agent,
            scope: LocationScope::Global {
                marker: home.join(agent.marker),
                skills_dir: home.join(agent.global_skills),
            },
        });
        for root in project_roots {
            out.push(ResolvedLocation {
                agent,
                scope: LocationScope::Project {
                    project_root: root.clone(),
                    skills_dir: root.join(agent.project_skills),
                },
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use {super::*, crate::agents::AGENTS};

    #[test]
    fn no_roots_yields_only_global_locations() {
        let locations = resolve_scopes(AGENTS, Path::new("/home/u"), &[]);
        assert_eq!(locations.len(), AGENTS.len());
        assert!(
            locations
                .iter()
                .all(|l| matches!(l.scope, LocationScope::Global { .. }))
        );
    }

    #[test]
    fn one_project_location_per_root_per_agent() {
        let roots = vec![PathBuf::from("/p1"), PathBuf::from("/p2")];
        let locations = resolve_scopes(AGENTS, Path::new("/home/u"), &roots);
        assert_eq!(locations.len(), AGENTS.len() * 3);

        let first = &locations[..3];
        assert!(first.iter().all(|l| l.agent.id == AGENTS[0].id));
        assert_eq!(
            first[1].scope,
            LocationScope::Project {
                project_root: PathBuf::from("/p1"),
                skills_dir: PathBuf::from("/p1").join(AGENTS[0].project_skills),
            }
        );
        assert_eq!(
            first[2].scope.skills_dir(),
            PathBuf::from("/p2").join(AGENTS[0].project_skills)
        );
    }

    #[test]
    fn global_paths_join_home() {
        let locations = resolve_scopes(AGENTS, Path::new("/home/u"), &[]);
        let claude = locations
            .iter()
            .find(|l| l.agent.id == "claude-code")
            .map(|l| l.scope.clone());
        assert_eq!(
            claude,
            Some(LocationScope::Global {
                marker: PathBuf::from("/home/u/.claude"),
                skills_dir: PathBuf::from("/home/u/.claude/skills"),
            })
        );
    }
}
