//! Operations that change [`AppState`].
//!
//! Every action finishes with the state fully consistent, so calling one again
//! after a failure is always safe. Anything that changes what is installed is
//! followed by a full re-scan whatever the tool's exit status was: the
//! filesystem is the only record of what the tool actually did.

use std::time::{SystemTime, UNIX_EPOCH};

use {
    anyhow::{Result, ensure},
    skilldash_bridge::{ToolEvent, ToolOutput, ToolRequest, ToolRunner, ToolVerb},
    skilldash_skills::Scanner,
    tokio::sync::mpsc::UnboundedSender,
    tracing::{info, warn},
};

use crate::{
    state::AppState,
    updates::{UpdateRecord, parse_update_output},
};

/// Re-scan everything and replace the state's report and skill list.
pub async fn refresh(state: &mut AppState, scanner: &Scanner) -> Result<()> {
    state.warn_if_no_roots();
    let scan = scanner.scan_async(state.scan_roots.clone()).await?;
    state.replace_scan(scan);
    Ok(())
}

/// Ask the tool which skills are outdated and flag them.
///
/// Returns the parsed records. An empty result means either "all up to date"
/// or "output not understood"; the two cannot be told apart.
pub async fn check_updates(
    state: &mut AppState,
    runner: &dyn ToolRunner,
    events: Option<UnboundedSender<ToolEvent>>,
) -> Result<Vec<UpdateRecord>> {
    state.append_output("Checking for skill updates...");
    let output = match runner.run(&ToolRequest::check_updates(), events).await {
        Ok(output) => output,
        Err(e) => {
            warn!(%e, "update check failed");
            state.append_output(&format!("Error checking updates: {e}"));
            return Err(e.into());
        },
    };
    append_tool_output(state, ToolVerb::CheckUpdates, &output);

    let updates = parse_update_output(&output.stdout, &state.skill_names());
    state.set_pending_updates(updates.clone());
    state.last_checked_at_ms = Some(now_ms());

    if updates.is_empty() {
        state.append_output("All skills are up to date.");
    } else {
        state.append_output(&format!(
            "Found {} skill(s) with updates available.",
            updates.len()
        ));
    }
    info!(count = updates.len(), "update check complete");
    Ok(updates)
}

/// Run an add, remove, update or init request, then re-scan.
///
/// A nonzero exit is logged, not returned as an error. An error means the
/// tool could not be run at all; the re-scan still happens first.
pub async fn run_mutation(
    state: &mut AppState,
    runner: &dyn ToolRunner,
    scanner: &Scanner,
    request: ToolRequest,
    events: Option<UnboundedSender<ToolEvent>>,
) -> Result<ToolOutput> {
    ensure!(
        request.verb.mutates(),
        "`{}` does not change installed skills",
        request.verb
    );
    state.append_output(&start_message(&request));

    let result = runner.run(&request, events).await;
    match &result {
        Ok(output) => {
            append_tool_output(state, request.verb, output);
            match request.verb {
                ToolVerb::Update => state.pending_updates.clear(),
                ToolVerb::UpdateOne => {
                    state
                        .pending_updates
                        .retain(|u| !request.skills.contains(&u.name));
                },
                _ => {},
            }
        },
        Err(e) => {
            warn!(verb = %request.verb, %e, "skills tool could not run");
            state.append_output(&format!("Error running {}: {e}", request.verb));
        },
    }

    let rescan = refresh(state, scanner).await;
    settle(result, rescan)
}

/// Combine a tool run with the re-scan that followed it. A tool error wins
/// over a re-scan error; the latter is only logged then.
fn settle(
    result: skilldash_bridge::Result<ToolOutput>,
    rescan: Result<()>,
) -> Result<ToolOutput> {
    match (result, rescan) {
        (Ok(output), Ok(())) => Ok(output),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), rescan) => {
            if let Err(scan_err) = rescan {
                warn!(error = %scan_err, "re-scan after failed run also failed");
            }
            Err(e.into())
        },
    }
}

fn start_message(request: &ToolRequest) -> String {
    match request.verb {
        ToolVerb::Add => format!(
            "Installing from {}...",
            request.source.as_deref().unwrap_or_default()
        ),
        ToolVerb::Remove => format!("Removing {}...", request.skills.join(", ")),
        ToolVerb::Update => "Updating all skills...".to_string(),
        ToolVerb::UpdateOne => format!("Updating skill: {}...", request.skills.join(", ")),
        ToolVerb::Init => format!("Creating skill {}...", request.skills.join(", ")),
        ToolVerb::CheckUpdates => "Checking for skill updates...".to_string(),
    }
}

fn append_tool_output(state: &mut AppState, verb: ToolVerb, output: &ToolOutput) {
    state.append_output(&output.stdout);
    state.append_output(&output.stderr);
    if !output.success() {
        state.append_output(&format!("{verb} exited with code {}", output.exit_code));
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or_default()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        async_trait::async_trait,
        skilldash_config::ScanConfig,
        std::{path::Path, sync::Mutex},
    };

    /// Replays canned output and records the requests it saw.
    struct Canned {
        output: ToolOutput,
        seen: Mutex<Vec<ToolRequest>>,
    }

    impl Canned {
        fn new(stdout: &str, exit_code: i32) -> Self {
            Self {
                output: ToolOutput {
                    stdout: stdout.into(),
                    stderr: String::new(),
                    exit_code,
                },
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ToolRunner for Canned {
        async fn run(
            &self,
            request: &ToolRequest,
            _events: Option<UnboundedSender<ToolEvent>>,
        ) -> skilldash_bridge::Result<ToolOutput> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.output.clone())
        }
    }

    fn write_skill(dir: &Path, name: &str) {
        std::fs::create_dir_all(dir.join(name)).unwrap();
        std::fs::write(
            dir.join(name).join("SKILL.md"),
            format!("---\nname: {name}\n---\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn check_flags_outdated_skills() {
        let home = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".claude/skills"), "pdf");
        write_skill(&home.path().join(".claude/skills"), "docx");
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let mut state = AppState::new(vec![]);
        refresh(&mut state, &scanner).await.unwrap();

        let runner = Canned::new("pdf: 1.0.0 -> 1.1.0\n", 0);
        let updates = check_updates(&mut state, &runner, None).await.unwrap();

        assert_eq!(updates.len(), 1);
        let pdf = state.skills.iter().find(|s| s.name == "pdf").unwrap();
        let docx = state.skills.iter().find(|s| s.name == "docx").unwrap();
        assert!(pdf.has_update);
        assert!(!docx.has_update);
        assert!(state.last_checked_at_ms.is_some());
        assert!(
            state
                .output_log
                .contains(&"Found 1 skill(s) with updates available.".to_string())
        );
    }

    #[tokio::test]
    async fn empty_check_reports_up_to_date() {
        let mut state = AppState::default();
        let runner = Canned::new("", 0);
        assert!(check_updates(&mut state, &runner, None).await.unwrap().is_empty());
        assert_eq!(state.output_log.last().unwrap(), "All skills are up to date.");
    }

    #[tokio::test]
    async fn update_all_clears_pending_and_logs_failure() {
        let home = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".claude/skills"), "pdf");
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let mut state = AppState::default();
        refresh(&mut state, &scanner).await.unwrap();
        state.set_pending_updates(vec![UpdateRecord::name_only("pdf")]);

        let runner = Canned::new("partial\n", 2);
        let out = run_mutation(&mut state, &runner, &scanner, ToolRequest::update_all(), None)
            .await
            .unwrap();

        assert_eq!(out.exit_code, 2);
        assert!(state.pending_updates.is_empty());
        assert!(state.skills.iter().all(|s| !s.has_update));
        assert!(
            state
                .output_log
                .contains(&"update exited with code 2".to_string())
        );
    }

    #[tokio::test]
    async fn update_one_drops_only_its_record() {
        let home = tempfile::tempdir().unwrap();
        write_skill(&home.path().join(".claude/skills"), "pdf");
        write_skill(&home.path().join(".claude/skills"), "docx");
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let mut state = AppState::default();
        refresh(&mut state, &scanner).await.unwrap();
        state.set_pending_updates(vec![
            UpdateRecord::name_only("pdf"),
            UpdateRecord::name_only("docx"),
        ]);

        let runner = Canned::new("", 0);
        run_mutation(
            &mut state,
            &runner,
            &scanner,
            ToolRequest::update_one("pdf"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(state.pending_updates, vec![UpdateRecord::name_only("docx")]);
        let docx = state.skills.iter().find(|s| s.name == "docx").unwrap();
        assert!(docx.has_update);
        assert_eq!(runner.seen.lock().unwrap()[0].skills, vec!["pdf"]);
    }

    #[test]
    fn tool_error_is_kept_when_rescan_also_fails() {
        let spawn_err = skilldash_bridge::Error::spawn(
            "npx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let err = settle(Err(spawn_err), Err(anyhow::anyhow!("scan task panicked"))).unwrap_err();
        assert!(err.to_string().contains("npx"));

        let ok = ToolOutput {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        };
        let err = settle(Ok(ok.clone()), Err(anyhow::anyhow!("scan task panicked"))).unwrap_err();
        assert!(err.to_string().contains("scan task panicked"));
        assert_eq!(settle(Ok(ok.clone()), Ok(())).unwrap(), ok);
    }

    #[tokio::test]
    async fn check_is_not_a_mutation() {
        let home = tempfile::tempdir().unwrap();
        let scanner = Scanner::new(home.path().to_path_buf(), &ScanConfig::default());
        let mut state = AppState::default();
        let runner = Canned::new("", 0);
        let result = run_mutation(
            &mut state,
            &runner,
            &scanner,
            ToolRequest::check_updates(),
            None,
        )
        .await;
        assert!(result.is_err());
        assert!(runner.seen.lock().unwrap().is_empty());
    }
}
