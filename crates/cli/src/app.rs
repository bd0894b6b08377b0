//! Wiring shared by every command: settings, scanner, tool runner and the
//! state they act on.

use std::path::PathBuf;

use {
    anyhow::Result,
    skilldash_bridge::{CliToolRunner, OutputStream, ToolEvent},
    skilldash_config::SkilldashConfig,
    skilldash_skills::Scanner,
    skilldash_state::{AppState, refresh},
    tokio::{sync::mpsc, task::JoinHandle},
    tracing::debug,
};

use crate::session::Session;

pub struct App {
    #[cfg_attr(not(feature = "file-watcher"), allow(dead_code))]
    pub config: SkilldashConfig,
    pub scanner: Scanner,
    pub runner: CliToolRunner,
    pub state: AppState,
    session_path: PathBuf,
}

impl App {
    /// Load settings and the previous session, then run a first scan.
    pub async fn load() -> Result<Self> {
        let config = skilldash_config::discover_and_load();
        let scanner = Scanner::from_config(&config.scan)?;
        let runner = CliToolRunner::from_config(&config.tool);
        let roots = config.scan.root_paths(scanner.home());
        debug!(roots = ?roots, program = %runner.program().display(), "app configured");

        let session_path = skilldash_config::data_dir().join(Session::FILE_NAME);
        let session = Session::load(&session_path);

        let mut state = AppState::new(roots);
        state.pending_updates = session.pending_updates;
        state.last_checked_at_ms = session.last_checked_at_ms;
        refresh(&mut state, &scanner).await?;

        Ok(Self {
            config,
            scanner,
            runner,
            state,
            session_path,
        })
    }

    /// Persist pending updates so later invocations still show the flags.
    pub fn save_session(&self) {
        Session::from_state(&self.state).save(&self.session_path);
    }
}

/// Print tool output to stderr as it arrives.
///
/// The task ends once every sender is dropped, which happens when the run
/// that received it returns.
pub fn stream_output() -> (mpsc::UnboundedSender<ToolEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<ToolEvent>();
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ToolEvent::Line {
                    stream: OutputStream::Stdout,
                    line,
                } => eprintln!("  {line}"),
                ToolEvent::Line {
                    stream: OutputStream::Stderr,
                    line,
                } => eprintln!("  ! {line}"),
                ToolEvent::Exited { code } => eprintln!("Process exited with code {code}"),
            }
        }
    });
    (tx, handle)
}
