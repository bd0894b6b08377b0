use std::{collections::HashSet, path::PathBuf};

use {
    serde::{Deserialize, Serialize},
    skilldash_skills::{DetectionReport, SkillRecord},
};

use crate::updates::UpdateRecord;

/// Overwrite `has_update` on every skill: true iff its name has a record.
pub fn apply_update_flags(
    mut skills: Vec<SkillRecord>,
    updates: &[UpdateRecord],
) -> Vec<SkillRecord> {
    let outdated: HashSet<&str> = updates.iter().map(|u| u.name.as_str()).collect();
    for skill in &mut skills {
        skill.has_update = outdated.contains(skill.name.as_str());
    }
    skills
}

/// What the user currently has focused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Install path of the selected skill.
    pub skill: Option<PathBuf>,
    /// Id of the selected agent.
    pub agent: Option<String>,
    pub project: Option<PathBuf>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.skill.is_none() && self.agent.is_none() && self.project.is_none()
    }
}

/// Clear every part of `selection` that no longer exists after a scan.
///
/// An agent counts as present only while it is detected; a project only while
/// some agent still has a skills directory in it.
pub fn prune_selection(
    selection: &Selection,
    report: &DetectionReport,
    skills: &[SkillRecord],
) -> Selection {
    let skill = selection
        .skill
        .clone()
        .filter(|path| skills.iter().any(|s| &s.install_path == path));
    let agent = selection
        .agent
        .clone()
        .filter(|id| report.agent(id).is_some_and(|a| a.detected));
    let project = selection
        .project
        .clone()
        .filter(|root| report.project_roots().contains(&root.as_path()));
    Selection {
        skill,
        agent,
        project,
    }
}

/// Drop update records for skills that are no longer installed.
pub fn prune_pending(pending: Vec<UpdateRecord>, skills: &[SkillRecord]) -> Vec<UpdateRecord> {
    pending
        .into_iter()
        .filter(|u| skills.iter().any(|s| s.name == u.name))
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        skilldash_skills::{AgentGlobalInfo, AgentInfo, AgentProjectInfo, SkillScope},
        std::{collections::BTreeMap, path::Path},
    };

    fn skill(name: &str, path: &str) -> SkillRecord {
        SkillRecord {
            name: name.into(),
            description: String::new(),
            license: None,
            compatibility: None,
            allowed_tools: None,
            metadata: BTreeMap::new(),
            install_path: PathBuf::from(path),
            scope: SkillScope::Global,
            agents: vec!["claude-code".into()],
            has_update: false,
            body: String::new(),
        }
    }

    fn report(detected: bool, project: Option<&str>) -> DetectionReport {
        DetectionReport {
            agents: vec![AgentInfo {
                id: "claude-code".into(),
                display_name: "Claude Code".into(),
                detected,
                global: AgentGlobalInfo {
                    path: PathBuf::from("/h/.claude/skills"),
                    skills: vec![],
                },
                projects: project
                    .map(|root| AgentProjectInfo {
                        path: Path::new(root).join(".claude/skills"),
                        project_root: PathBuf::from(root),
                        skills: vec![],
                    })
                    .into_iter()
                    .collect(),
            }],
        }
    }

    #[test]
    fn flags_are_a_full_overwrite() {
        let mut stale = skill("old", "/a/old");
        stale.has_update = true;
        let skills = vec![stale, skill("pdf", "/a/pdf"), skill("pdf", "/b/pdf")];

        let flagged = apply_update_flags(skills, &[UpdateRecord::name_only("pdf")]);
        let flags: Vec<bool> = flagged.iter().map(|s| s.has_update).collect();
        assert_eq!(flags, vec![false, true, true]);

        let cleared = apply_update_flags(flagged, &[]);
        assert!(cleared.iter().all(|s| !s.has_update));
    }

    #[test]
    fn selection_survives_when_everything_still_exists() {
        let sel = Selection {
            skill: Some("/a/pdf".into()),
            agent: Some("claude-code".into()),
            project: Some("/work/app".into()),
        };
        let pruned = prune_selection(&sel, &report(true, Some("/work/app")), &[skill(
            "pdf", "/a/pdf",
        )]);
        assert_eq!(pruned, sel);
    }

    #[test]
    fn dangling_selection_is_cleared() {
        let sel = Selection {
            skill: Some("/a/gone".into()),
            agent: Some("claude-code".into()),
            project: Some("/work/app".into()),
        };
        let pruned = prune_selection(&sel, &report(false, None), &[skill("pdf", "/a/pdf")]);
        assert!(pruned.is_empty());

        let unknown = Selection {
            agent: Some("nonexistent".into()),
            ..Selection::default()
        };
        assert!(prune_selection(&unknown, &report(true, None), &[]).is_empty());
    }

    #[test]
    fn pending_updates_for_removed_skills_are_dropped() {
        let pending = vec![UpdateRecord::name_only("pdf"), UpdateRecord::name_only("gone")];
        let kept = prune_pending(pending, &[skill("pdf", "/a/pdf")]);
        assert_eq!(kept, vec![UpdateRecord::name_only("pdf")]);
    }
}
