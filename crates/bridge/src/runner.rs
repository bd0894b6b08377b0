use std::{
    path::{Path, PathBuf},
    process::Stdio,
    time::Duration,
};

use {
    async_trait::async_trait,
    serde::Serialize,
    skilldash_config::ToolConfig,
    tokio::{
        io::{AsyncBufReadExt, AsyncRead, BufReader},
        process::Command,
        sync::mpsc::UnboundedSender,
    },
    tracing::{debug, info, warn},
};

use crate::{
    error::{Error, Result},
    request::ToolRequest,
};

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// `-1` when the process was terminated by a signal.
    pub exit_code: i32,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => {
                let sep = if self.stdout.ends_with('\n') { "" } else { "\n" };
                format!("{}{sep}{}", self.stdout, self.stderr)
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

/// Progress emitted while the tool is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolEvent {
    Line { stream: OutputStream, line: String },
    Exited { code: i32 },
}

/// Something that can execute a [`ToolRequest`].
///
/// A nonzero exit status is reported through [`ToolOutput::exit_code`], not
/// as an error. Errors mean the tool could not be run at all.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(
        &self,
        request: &ToolRequest,
        events: Option<UnboundedSender<ToolEvent>>,
    ) -> Result<ToolOutput>;
}

/// Runs `<program> <package> <args...>` as a child process.
#[derive(Debug, Clone)]
pub struct CliToolRunner {
    program: PathBuf,
    package: String,
    timeout: Duration,
    non_interactive: bool,
}

impl CliToolRunner {
    pub fn new(program: impl Into<PathBuf>, package: impl Into<String>) -> Self {
        let defaults = ToolConfig::default();
        Self {
            program: program.into(),
            package: package.into(),
            timeout: Duration::from_secs(defaults.timeout_secs),
            non_interactive: defaults.non_interactive,
        }
    }

    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            program: resolve_program(config.program.as_deref()),
            package: config.package.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            non_interactive: config.non_interactive,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn non_interactive(mut self, yes: bool) -> Self {
        self.non_interactive = yes;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Full argument vector for `request`, package first.
    pub fn argv(&self, request: &ToolRequest) -> Vec<String> {
        let mut argv = vec![self.package.clone()];
        argv.extend(request.args(self.non_interactive));
        argv
    }
}

/// Configured launcher, else `npx` from PATH, else bare `npx`.
pub fn resolve_program(configured: Option<&str>) -> PathBuf {
    if let Some(program) = configured.filter(|p| !p.trim().is_empty()) {
        return PathBuf::from(program);
    }
    which::which("npx").unwrap_or_else(|_| PathBuf::from("npx"))
}

#[async_trait]
impl ToolRunner for CliToolRunner {
    async fn run(
        &self,
        request: &ToolRequest,
        events: Option<UnboundedSender<ToolEvent>>,
    ) -> Result<ToolOutput> {
        request.validate()?;
        let argv = self.argv(request);
        info!(
            program = %self.program.display(),
            args = ?argv,
            cwd = ?request.working_dir,
            "running skills tool"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&argv);
        if let Some(ref dir) = request.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::spawn(self.program.clone(), e))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completed = async {
            let (out, err) = tokio::join!(
                pump(stdout, OutputStream::Stdout, events.as_ref()),
                pump(stderr, OutputStream::Stderr, events.as_ref()),
            );
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((out?, err?, status))
        };

        match tokio::time::timeout(self.timeout, completed).await {
            Ok(Ok((stdout, stderr, status))) => {
                let exit_code = status.code().unwrap_or(-1);
                if let Some(tx) = &events {
                    let _ = tx.send(ToolEvent::Exited { code: exit_code });
                }
                debug!(
                    exit_code,
                    stdout_len = stdout.len(),
                    stderr_len = stderr.len(),
                    "skills tool done"
                );
                if exit_code != 0 {
                    warn!(verb = %request.verb, exit_code, "skills tool exited with failure");
                }
                Ok(ToolOutput {
                    stdout,
                    stderr,
                    exit_code,
                })
            },
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => {
                warn!(verb = %request.verb, "skills tool timed out");
                Err(Error::Timeout {
                    verb: request.verb.as_str(),
                    timeout: self.timeout,
                })
            },
        }
    }
}

/// Read `reader` line by line, forwarding each line and returning the whole text.
async fn pump<R: AsyncRead + Unpin>(
    reader: Option<R>,
    stream: OutputStream,
    events: Option<&UnboundedSender<ToolEvent>>,
) -> std::io::Result<String> {
    let Some(reader) = reader else {
        return Ok(String::new());
    };
    let mut reader = BufReader::new(reader);
    let mut text = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let chunk = String::from_utf8_lossy(&buf);
        text.push_str(&chunk);
        if let Some(tx) = events {
            let line = chunk.trim_end_matches(['\r', '\n']).to_string();
            let _ = tx.send(ToolEvent::Line { stream, line });
        }
    }
    Ok(text)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(all(test, unix))]
mod tests {
    use {super::*, std::fs, tokio::sync::mpsc};

    /// `sh <script> <args...>`: the script stands in for the package.
    fn script_runner(dir: &Path, body: &str) -> CliToolRunner {
        let script = dir.join("tool.sh");
        fs::write(&script, body).unwrap();
        CliToolRunner::new("sh", script.to_string_lossy())
    }

    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = script_runner(
            tmp.path(),
            "echo \"args: $*\"\necho oops >&2\nexit 3\n",
        );
        let out = runner
            .run(&ToolRequest::check_updates(), None)
            .await
            .unwrap();
        assert_eq!(out.stdout, "args: check -y\n");
        assert_eq!(out.stderr, "oops\n");
        assert_eq!(out.exit_code, 3);
        assert!(!out.success());
        assert_eq!(out.combined(), "args: check -y\noops\n");
    }

    #[tokio::test]
    async fn streams_lines_then_exit() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = script_runner(tmp.path(), "echo one\necho two\n");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let out = runner
            .run(&ToolRequest::update_all(), Some(tx))
            .await
            .unwrap();
        assert!(out.success());

        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        assert_eq!(events, vec![
            ToolEvent::Line {
                stream: OutputStream::Stdout,
                line: "one".into()
            },
            ToolEvent::Line {
                stream: OutputStream::Stdout,
                line: "two".into()
            },
            ToolEvent::Exited { code: 0 },
        ]);
    }

    #[tokio::test]
    async fn init_runs_in_target_dir_without_yes() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        let runner = script_runner(tmp.path(), "pwd\necho \"$*\"\n");
        let out = runner
            .run(
                &ToolRequest::init("my-skill", target.path().to_path_buf()),
                None,
            )
            .await
            .unwrap();
        let mut lines = out.stdout.lines();
        let cwd = PathBuf::from(lines.next().unwrap());
        assert_eq!(
            cwd.canonicalize().unwrap(),
            target.path().canonicalize().unwrap()
        );
        assert_eq!(lines.next(), Some("init my-skill"));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let runner = CliToolRunner::new("/definitely/not/here/npx", "skills");
        let err = runner
            .run(&ToolRequest::check_updates(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
        assert!(err.to_string().contains("/definitely/not/here/npx"));
    }

    #[tokio::test]
    async fn slow_tool_times_out() {
        let tmp = tempfile::tempdir().unwrap();
        let runner =
            script_runner(tmp.path(), "sleep 5\n").with_timeout(Duration::from_millis(100));
        let err = runner
            .run(&ToolRequest::update_all(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Timeout { verb: "update", .. }));
    }

    #[tokio::test]
    async fn invalid_request_never_spawns() {
        let runner = CliToolRunner::new("/definitely/not/here/npx", "skills");
        let err = runner
            .run(&ToolRequest::remove(Vec::new(), true, None), None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn configured_program_wins() {
        let cfg = ToolConfig {
            program: Some("/opt/bin/bunx".into()),
            ..ToolConfig::default()
        };
        let runner = CliToolRunner::from_config(&cfg);
        assert_eq!(runner.program(), Path::new("/opt/bin/bunx"));
        assert_eq!(runner.argv(&ToolRequest::update_one("pdf")), vec![
            "skills", "update", "pdf", "-y"
        ]);
        assert!(
            !resolve_program(None)
                .as_os_str()
                .is_empty()
        );
    }
}
