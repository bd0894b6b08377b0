//! Config schema: scan roots, external tool invocation, and watcher settings.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkilldashConfig {
    pub scan: ScanConfig,
    pub tool: ToolConfig,
    pub watch: WatchConfig,
}

/// Where to look for projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// User-configured project roots. Distinct, in the order they were added.
    pub roots: Vec<String>,
    /// How many directory levels below a root are searched for nested projects.
    /// `0` only inspects the roots themselves.
    pub project_depth: usize,
    /// Directory names never descended into while looking for projects.
    pub ignore_dirs: Vec<String>,
}

const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    ".next",
    ".nuxt",
    ".venv",
    "venv",
    "__pycache__",
    ".cache",
    "vendor",
    "bower_components",
];

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            project_depth: 3,
            ignore_dirs: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ScanConfig {
    /// Add a scan root. Returns `false` if it was already present or blank.
    pub fn add_root(&mut self, root: &str) -> bool {
        let root = root.trim();
        if root.is_empty() || self.roots.iter().any(|r| r == root) {
            return false;
        }
        self.roots.push(root.to_string());
        true
    }

    /// Remove a scan root. Returns `false` if it was not configured.
    pub fn remove_root(&mut self, root: &str) -> bool {
        let before = self.roots.len();
        self.roots.retain(|r| r != root.trim());
        self.roots.len() != before
    }

    /// Scan roots as paths, with a leading `~` expanded against `home`.
    pub fn root_paths(&self, home: &Path) -> Vec<PathBuf> {
        self.roots.iter().map(|r| expand_home(r, home)).collect()
    }
}

fn expand_home(raw: &str, home: &Path) -> PathBuf {
    if raw == "~" {
        return home.to_path_buf();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(raw),
    }
}

/// How the external `skills` command-line tool is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Launcher binary. `None` looks up `npx` on PATH.
    pub program: Option<String>,
    /// Package / first argument passed to the launcher.
    pub package: String,
    /// Hard limit for a single invocation.
    pub timeout_secs: u64,
    /// Append `-y` so the tool never prompts.
    pub non_interactive: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: None,
            package: "skills".into(),
            timeout_secs: 300,
            non_interactive: true,
        }
    }
}

/// Filesystem watcher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}
