use std::path::{Path, PathBuf};

use {
    anyhow::Context,
    serde::Serialize,
    skilldash_config::ScanConfig,
    tracing::{debug, info},
};

use crate::{
    agents::{AGENTS, AgentDefinition},
    aggregate::aggregate,
    detect::detect,
    projects::expand_project_roots,
    scope::resolve_scopes,
    types::{DetectionReport, SkillRecord},
};

/// Result of one full detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scan {
    pub report: DetectionReport,
    pub skills: Vec<SkillRecord>,
    /// Project roots actually inspected (configured roots plus nested projects).
    pub project_roots: Vec<PathBuf>,
}

impl Scan {
    /// Existing skills directories worth watching for changes.
    pub fn watch_dirs(&self) -> Vec<PathBuf> {
        self.report.existing_skill_dirs()
    }
}

/// Runs the full pipeline: project expansion, scope resolution, detection
/// and aggregation. Holds only configuration, so every call is a fresh,
/// authoritative pass.
#[derive(Debug, Clone)]
pub struct Scanner {
    home: PathBuf,
    agents: &'static [AgentDefinition],
    project_depth: usize,
    ignore_dirs: Vec<String>,
}

impl Scanner {
    pub fn new(home: PathBuf, config: &ScanConfig) -> Self {
        Self {
            home,
            agents: AGENTS,
            project_depth: config.project_depth,
            ignore_dirs: config.ignore_dirs.clone(),
        }
    }

    /// Build a scanner for the current user's home directory.
    pub fn from_config(config: &ScanConfig) -> anyhow::Result<Self> {
        let home = directories::BaseDirs::new()
            .map(|d| d.home_dir().to_path_buf())
            .context("cannot determine home directory")?;
        Ok(Self::new(home, config))
    }

    /// Use a different agent table.
    pub fn with_agents(mut self, agents: &'static [AgentDefinition]) -> Self {
        self.agents = agents;
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn agents(&self) -> &'static [AgentDefinition] {
        self.agents
    }

    /// Scan global locations plus every project under `scan_roots`.
    pub fn scan(&self, scan_roots: &[PathBuf]) -> Scan {
        let project_roots =
            expand_project_roots(scan_roots, self.agents, self.project_depth, &self.ignore_dirs);
        debug!(
            roots = scan_roots.len(),
            projects = project_roots.len(),
            "resolved project roots"
        );
        let locations = resolve_scopes(self.agents, &self.home, &project_roots);
        let report = detect(&locations);
        let skills = aggregate(&report);
        info!(
            agents = report.detected().count(),
            skills = skills.len(),
            "scan complete"
        );
        Scan {
            report,
            skills,
            project_roots,
        }
    }

    /// [`Scanner::scan`] on the blocking thread pool.
    pub async fn scan_async(&self, scan_roots: Vec<PathBuf>) -> anyhow::Result<Scan> {
        let scanner = self.clone();
        let scan = tokio::task::spawn_blocking(move || scanner.scan(&scan_roots)).await?;
        Ok(scan)
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, crate::SKILL_MANIFEST, std::fs};

    fn write_skill(dir: &Path, name: &str) {
        fs::create_dir_all(dir.join(name)).unwrap();
        fs::write(
            dir.join(name).join(SKILL_MANIFEST),
            format!("---\nname: {name}\n---\nbody\n"),
        )
        .unwrap();
    }

    #[test]
    fn scan_reports_global_and_nested_project_skills() {
        let home = tempfile::tempdir().unwrap();
        let code = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".claude/skills"), "foo");
        write_skill(&code.path().join("app/.claude/skills"), "bar");

        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let scan = scanner.scan(&[code.path().to_path_buf()]);

        assert_eq!(scan.report.len(), AGENTS.len());
        let claude = scan.report.agent("claude-code").unwrap();
        assert_eq!(claude.global.skills, vec!["foo"]);
        assert_eq!(claude.projects.len(), 1);
        assert_eq!(claude.projects[0].project_root, code.path().join("app"));
        assert_eq!(claude.projects[0].skills, vec!["bar"]);
        assert_eq!(scan.skills.len(), 2);
        assert_eq!(scan.project_roots, vec![
            code.path().to_path_buf(),
            code.path().join("app")
        ]);

        let watch = scan.watch_dirs();
        assert!(watch.contains(&home.path().join(".claude/skills")));
        assert!(watch.contains(&code.path().join("app/.claude/skills")));
    }

    #[test]
    fn repeated_scans_are_equal() {
        let home = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".gemini/skills"), "g");
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        assert_eq!(scanner.scan(&[]), scanner.scan(&[]));
    }

    #[test]
    fn custom_agent_table() {
        static ONLY: &[AgentDefinition] = &[AgentDefinition {
            id: "solo",
            display_name: "Solo",
            global_skills: ".solo/skills",
            project_skills: ".solo/skills",
            marker: ".solo",
        }];
        let home = tempfile::tempdir().unwrap();
        let scanner =
            Scanner::new(home.path().to_path_buf(), &ScanConfig::default()).with_agents(ONLY);
        let scan = scanner.scan(&[]);
        assert_eq!(scan.report.len(), 1);
        assert_eq!(scan.report.agents[0].id, "solo");
    }

    #[tokio::test]
    async fn scan_async_matches_sync_scan() {
        let home = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".cursor/skills"), "c");
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let scan = scanner.scan_async(Vec::new()).await.unwrap();
        assert_eq!(scan, scanner.scan(&[]));
    }
}
