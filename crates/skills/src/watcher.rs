//! Filesystem watcher for skill directories.
//!
//! Watches skills directories for SKILL.md create/modify/delete events and
//! sends one notification per changed manifest through a channel. The events
//! are only a prompt to re-scan; nothing relies on receiving them.

use std::{path::PathBuf, time::Duration};

use {
    anyhow::Result,
    notify_debouncer_full::{
        DebounceEventResult, Debouncer, RecommendedCache, new_debouncer,
        notify::{EventKind, RecommendedWatcher, RecursiveMode},
    },
    tokio::sync::mpsc,
    tracing::{debug, info, warn},
};

use crate::SKILL_MANIFEST;

/// Events emitted by the skill watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillWatchEvent {
    /// The `SKILL.md` at `path` was created, modified, or deleted.
    Changed { path: PathBuf },
}

/// Watches skill directories for SKILL.md changes with debouncing.
pub struct SkillWatcher {
    _debouncer: Debouncer<RecommendedWatcher, RecommendedCache>,
    watched: Vec<PathBuf>,
}

impl std::fmt::Debug for SkillWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkillWatcher")
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl SkillWatcher {
    /// Start watching the given directories. Returns the watcher and a receiver for events.
    ///
    /// Directories that don't exist are skipped. The watcher must be kept
    /// alive (not dropped) for events to continue.
    pub fn start(
        dirs: Vec<PathBuf>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<SkillWatchEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let debouncer = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let mut changed: Vec<PathBuf> = Vec::new();
                    for event in events {
                        if !matches!(
                            event.kind,
                            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                        ) {
                            continue;
                        }
                        for path in &event.paths {
                            if path.file_name().and_then(|n| n.to_str()) != Some(SKILL_MANIFEST) {
                                continue;
                            }
                            if !changed.contains(path) {
                                debug!(path = %path.display(), "skill watcher event");
                                changed.push(path.clone());
                            }
                        }
                    }
                    for path in changed {
                        let _ = tx.send(SkillWatchEvent::Changed { path });
                    }
                },
                Err(errors) => {
                    for e in errors {
                        warn!(error = %e, "skill watcher error");
                    }
                },
            }
        })?;

        let mut watcher = Self {
            _debouncer: debouncer,
            watched: Vec::new(),
        };

        for dir in dirs {
            if dir.exists() {
                watcher._debouncer.watch(&dir, RecursiveMode::Recursive)?;
                info!(dir = %dir.display(), "skill watcher: watching directory");
                watcher.watched.push(dir);
            }
        }

        Ok((watcher, rx))
    }

    /// Directories actually being watched.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }
}
