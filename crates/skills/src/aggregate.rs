use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    SKILL_MANIFEST,
    parse::parse_manifest,
    types::{DetectionReport, ScopeFilter, SkillRecord, SkillScope},
};

/// Flatten a detection report into one record per installed skill directory.
///
/// A directory shared by several agents yields a single record listing all of
/// them. A skill whose `SKILL.md` cannot be read or parsed is skipped.
/// Records are sorted by name, then install path.
pub fn aggregate(report: &DetectionReport) -> Vec<SkillRecord> {
    let global_dirs: Vec<&Path> = report.global_dirs().collect();

    let mut records: Vec<SkillRecord> = Vec::new();
    let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

    for agent in &report.agents {
        let locations = std::iter::once((&agent.global.path, &agent.global.skills)).chain(
            agent
                .projects
                .iter()
                .map(|project| (&project.path, &project.skills)),
        );

        for (skills_dir, names) in locations {
            for name in names {
                let install_path = skills_dir.join(name);
                if let Some(&slot) = by_path.get(&install_path) {
                    let record = &mut records[slot];
                    if !record.agents.iter().any(|a| a == &agent.id) {
                        record.agents.push(agent.id.clone());
                    }
                    continue;
                }

                let Some(mut record) = load_record(&install_path, name) else {
                    continue;
                };
                record.scope = scope_of(&install_path, &global_dirs);
                record.agents.push(agent.id.clone());
                by_path.insert(install_path, records.len());
                records.push(record);
            }
        }
    }

    records.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.install_path.cmp(&b.install_path))
    });
    debug!(count = records.len(), "aggregated skills");
    records
}

/// `Global` iff the path lies under some agent's global skills directory.
pub fn scope_of(install_path: &Path, global_dirs: &[&Path]) -> SkillScope {
    if global_dirs
        .iter()
        .any(|dir| !dir.as_os_str().is_empty() && install_path.starts_with(dir))
    {
        SkillScope::Global
    } else {
        SkillScope::Project
    }
}

/// Keep only the records matching `filter`.
pub fn filter_scope(records: Vec<SkillRecord>, filter: ScopeFilter) -> Vec<SkillRecord> {
    records
        .into_iter()
        .filter(|r| filter.matches(r.scope))
        .collect()
}

fn load_record(skill_dir: &Path, dir_name: &str) -> Option<SkillRecord> {
    let skill_md = skill_dir.join(SKILL_MANIFEST);
    let content = match std::fs::read_to_string(&skill_md) {
        Ok(c) => c,
        Err(e) => {
            warn!(?skill_md, %e, "failed to read SKILL.md");
            return None;
        },
    };
    let manifest = match parse_manifest(&content, dir_name) {
        Ok(m) => m,
        Err(e) => {
            warn!(?skill_dir, %e, "skipping malformed SKILL.md");
            return None;
        },
    };

    Some(SkillRecord {
        name: manifest.name,
        description: manifest.description,
        license: manifest.license,
        compatibility: manifest.compatibility,
        allowed_tools: manifest.allowed_tools,
        metadata: manifest.metadata,
        install_path: skill_dir.to_path_buf(),
        scope: SkillScope::Project,
        agents: Vec::new(),
        has_update: false,
        body: manifest.body,
    })
}
