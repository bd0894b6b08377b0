use std::path::PathBuf;

use {
    serde::Serialize,
    skilldash_skills::{DetectionReport, Scan, SkillRecord},
    tracing::{debug, warn},
};

use crate::{
    reconcile::{Selection, apply_update_flags, prune_pending, prune_selection},
    updates::UpdateRecord,
};

/// Oldest lines are dropped once the log grows past this.
const MAX_OUTPUT_LINES: usize = 5_000;

/// Everything that changes while the dashboard runs.
///
/// Only the actions in [`crate::actions`] mutate it, one at a time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AppState {
    pub report: DetectionReport,
    pub skills: Vec<SkillRecord>,
    pub selection: Selection,
    pub pending_updates: Vec<UpdateRecord>,
    pub output_log: Vec<String>,
    /// Unix millis of the last completed update check.
    pub last_checked_at_ms: Option<u64>,
    pub scan_roots: Vec<PathBuf>,
}

impl AppState {
    pub fn new(scan_roots: Vec<PathBuf>) -> Self {
        Self {
            scan_roots,
            ..Self::default()
        }
    }

    /// Install a fresh scan, dropping selections and pending updates that
    /// refer to skills, agents or projects which are gone.
    ///
    /// Surviving pending updates are re-applied to the new skill list.
    pub fn replace_scan(&mut self, scan: Scan) {
        let Scan { report, skills, .. } = scan;
        let pending = prune_pending(std::mem::take(&mut self.pending_updates), &skills);
        self.skills = apply_update_flags(skills, &pending);
        self.pending_updates = pending;
        self.selection = prune_selection(&self.selection, &report, &self.skills);
        self.report = report;
        debug!(
            skills = self.skills.len(),
            pending = self.pending_updates.len(),
            "state replaced"
        );
    }

    /// Store the result of an update check and flag the matching skills.
    pub fn set_pending_updates(&mut self, updates: Vec<UpdateRecord>) {
        self.skills = apply_update_flags(std::mem::take(&mut self.skills), &updates);
        self.pending_updates = updates;
    }

    /// Append every non-empty line of `text` to the output log.
    pub fn append_output(&mut self, text: &str) {
        self.output_log.extend(
            text.lines()
                .map(str::trim_end)
                .filter(|l| !l.is_empty())
                .map(String::from),
        );
        if self.output_log.len() > MAX_OUTPUT_LINES {
            let excess = self.output_log.len() - MAX_OUTPUT_LINES;
            self.output_log.drain(..excess);
        }
    }

    /// Log a hint when no project roots are configured. Returns whether it did.
    pub fn warn_if_no_roots(&mut self) -> bool {
        if !self.scan_roots.is_empty() {
            return false;
        }
        warn!("no project roots configured, only global skills will be found");
        self.append_output(
            "No project roots configured. Add one with `skilldash roots add <DIR>` to find project skills.",
        );
        true
    }

    /// Distinct skill names, in list order.
    pub fn skill_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for skill in &self.skills {
            if !names.contains(&skill.name) {
                names.push(skill.name.clone());
            }
        }
        names
    }

    pub fn selected_skill(&self) -> Option<&SkillRecord> {
        let path = self.selection.skill.as_ref()?;
        self.skills.iter().find(|s| &s.install_path == path)
    }
}
