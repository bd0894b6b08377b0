use std::path::Path;

use {
    serde::{Deserialize, Serialize},
    skilldash_state::{AppState, UpdateRecord},
    tracing::{debug, warn},
};

/// What one invocation hands to the next: the last update check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub pending_updates: Vec<UpdateRecord>,
    pub last_checked_at_ms: Option<u64>,
}

impl Session {
    pub const FILE_NAME: &'static str = "session.json";

    pub fn from_state(state: &AppState) -> Self {
        Self {
            pending_updates: state.pending_updates.clone(),
            last_checked_at_ms: state.last_checked_at_ms,
        }
    }

    /// Missing or unreadable files give an empty session.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %path.display(), %e, "no previous session");
                return Self::default();
            },
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %path.display(), %e, "ignoring corrupt session file");
            Self::default()
        })
    }

    /// Failures are logged; losing the session only loses update flags.
    pub fn save(&self, path: &Path) {
        if let Err(e) = self.try_save(path) {
            warn!(path = %path.display(), %e, "failed to save session");
        }
    }

    fn try_save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/session.json");
        let session = Session {
            pending_updates: vec![UpdateRecord::name_only("pdf")],
            last_checked_at_ms: Some(1_700_000_000_000),
        };
        session.save(&path);
        assert_eq!(Session::load(&path), session);
    }

    #[test]
    fn missing_or_corrupt_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(Session::load(&tmp.path().join("none.json")), Session::default());

        let bad = tmp.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert_eq!(Session::load(&bad), Session::default());
    }
}
