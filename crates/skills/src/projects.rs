//! Expansion of configured scan roots into concrete project roots.
//!
//! A scan root is usually a folder full of repositories (`~/code`), so the
//! projects carrying agent directories can sit a few levels below it.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
};

use {tracing::debug, walkdir::WalkDir};

use crate::agents::AgentDefinition;

/// Return every root itself followed by each nested directory, at most
/// `depth` levels below a root, that contains some agent's project skills
/// directory.
///
/// Roots are kept even when they do not exist so callers can still report on
/// them; the walk just yields nothing below them. Directories named in
/// `ignore_dirs` are never descended into. Unreadable entries are skipped.
pub fn expand_project_roots(
    scan_roots: &[PathBuf],
    agents: &[AgentDefinition],
    depth: usize,
    ignore_dirs: &[String],
) -> Vec<PathBuf> {
    // First path component (".claude") -> full relative skills dirs (".claude/skills").
    let mut by_head: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for agent in agents {
        let head = agent
            .project_skills
            .split('/')
            .next()
            .unwrap_or(agent.project_skills);
        let rels = by_head.entry(head).or_default();
        if !rels.contains(&agent.project_skills) {
            rels.push(agent.project_skills);
        }
    }

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for root in scan_roots {
        if seen.insert(root.clone()) {
            out.push(root.clone());
        }
    }

    if depth == 0 {
        return out;
    }

    for root in scan_roots {
        if !root.is_dir() {
            debug!(root = %root.display(), "scan root missing, skipping walk");
            continue;
        }
        let walker = WalkDir::new(root)
            .follow_links(true)
            .min_depth(1)
            // The agent directory sits one level below the project root.
            .max_depth(depth + 1)
            .into_iter()
            .filter_entry(|e| {
                e.file_name()
                    .to_str()
                    .is_none_or(|name| !ignore_dirs.iter().any(|d| d == name))
            });

        for entry in walker.filter_map(Result::ok) {
            if !entry.file_type().is_dir() || entry.depth() < 2 {
                continue;
            }
            let Some(rels) = entry.file_name().to_str().and_then(|n| by_head.get(n)) else {
                continue;
            };
            let Some(project_root) = entry.path().parent() else {
                continue;
            };
            if has_agent_dir(project_root, rels) && seen.insert(project_root.to_path_buf()) {
                debug!(project = %project_root.display(), "found nested project");
                out.push(project_root.to_path_buf());
            }
        }
    }

    out
}

fn has_agent_dir(project_root: &Path, rels: &[&str]) -> bool {
    rels.iter().any(|rel| project_root.join(rel).is_dir())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::agents::AGENTS, std::fs};

    fn ignore() -> Vec<String> {
        vec!["node_modules".into(), ".git".into()]
    }

    #[test]
    fn roots_are_always_returned_first() {
        let roots = vec![PathBuf::from("/does/not/exist"), PathBuf::from("/nor/this")];
        let out = expand_project_roots(&roots, AGENTS, 3, &ignore());
        assert_eq!(out, roots);
    }

    #[test]
    fn finds_nested_projects_with_agent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("app/.claude/skills")).unwrap();
        fs::create_dir_all(root.join("group/lib/.agents/skills")).unwrap();
        fs::create_dir_all(root.join("plain/src")).unwrap();

        let out = expand_project_roots(std::slice::from_ref(&root), AGENTS, 3, &ignore());
        assert_eq!(out[0], root);
        assert!(out.contains(&root.join("app")));
        assert!(out.contains(&root.join("group/lib")));
        assert!(!out.contains(&root.join("plain")));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn agent_dir_without_skills_subdir_is_not_a_project() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("app/.claude")).unwrap();
        let out = expand_project_roots(std::slice::from_ref(&root), AGENTS, 3, &ignore());
        assert_eq!(out, vec![root]);
    }

    #[test]
    fn ignored_dirs_and_depth_limit_are_respected() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("node_modules/pkg/.claude/skills")).unwrap();
        fs::create_dir_all(root.join("a/b/c/d/.claude/skills")).unwrap();

        let out = expand_project_roots(std::slice::from_ref(&root), AGENTS, 2, &ignore());
        assert_eq!(out, vec![root.clone()]);

        let deeper = expand_project_roots(std::slice::from_ref(&root), AGENTS, 4, &ignore());
        assert!(deeper.contains(&root.join("a/b/c/d")));
        assert!(!deeper.iter().any(|p| p.starts_with(root.join("node_modules"))));
    }

    #[test]
    fn depth_zero_skips_the_walk() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir_all(root.join("app/.claude/skills")).unwrap();
        let out = expand_project_roots(std::slice::from_ref(&root), AGENTS, 0, &ignore());
        assert_eq!(out, vec![root]);
    }
}
