// Shell command runner
// reason: tokio for async process management and concurrent stream draining
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use failmap_core::port::{
    CapturedOutput, CommandRunner, ExecutionError, OutputObserver, RunOutcome,
};

/// stdout collected line by line, plus any trailing bytes not yet
/// terminated by a newline
///
/// The pending bytes live here rather than inside the read future, so a read
/// cut short by a timeout still leaves them available to [`flush`].
///
/// [`flush`]: LineAccumulator::flush
#[derive(Debug, Default)]
pub struct LineAccumulator {
    text: String,
    pending: Vec<u8>,
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `reader` until EOF, forwarding each line to `observer` and
    /// appending it to the accumulated text
    ///
    /// Newlines are kept, so the text is byte-for-byte what the writer
    /// produced (invalid UTF-8 is replaced). On a read error the text keeps
    /// everything received so far.
    pub async fn read_from<R>(&mut self, mut reader: R, observer: &dyn OutputObserver) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            // read_until appends partial bytes to `pending` even if cancelled
            let read = reader.read_until(b'\n', &mut self.pending).await;
            self.flush(observer);

            match read {
                Ok(0) => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Emit whatever is pending as one (possibly unterminated) line
    pub fn flush(&mut self, observer: &dyn OutputObserver) {
        if self.pending.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.pending);
        observer.on_line(&text);
        self.text.push_str(&text);
        self.pending.clear();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

async fn drain<R>(reader: Option<R>, buf: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    match reader {
        Some(mut reader) => reader.read_to_end(buf).await.map(|_| ()),
        None => Ok(()),
    }
}

/// Runs a command line verbatim through the platform shell
/// (`sh -c` on unix, `cmd /C` on windows)
///
/// Stdout and stderr are drained concurrently so a child that writes heavily
/// to stderr cannot stall on a full pipe.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandRunner {
    timeout: Option<Duration>,
    working_dir: Option<PathBuf>,
}

impl ShellCommandRunner {
    /// Create a runner with no timeout that inherits the current directory
    ///
    /// # Example
    /// ```ignore
    /// let runner = ShellCommandRunner::new()
    ///     .with_timeout(Some(Duration::from_secs(600)))
    ///     .with_working_dir(Some("frontend".into()));
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill the child once `timeout` elapses (None waits forever)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_working_dir(mut self, working_dir: Option<PathBuf>) -> Self {
        self.working_dir = working_dir;
        self
    }

    #[cfg(not(windows))]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    }

    #[cfg(windows)]
    fn shell_command(command: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").raw_arg(command);
        cmd
    }

    fn spawn(&self, command: &str) -> Result<Child, ExecutionError> {
        let mut cmd = Self::shell_command(command);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(e.to_string()))
    }

    /// Drain both pipes to EOF, then reap the child
    async fn capture(
        child: &mut Child,
        stdout: &mut LineAccumulator,
        stderr: &mut Vec<u8>,
        observer: &dyn OutputObserver,
    ) -> Result<Option<i32>, ExecutionError> {
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = async move {
            match stdout_pipe {
                Some(pipe) => stdout.read_from(BufReader::new(pipe), observer).await,
                None => Ok(()),
            }
        };
        let stderr_task = drain(stderr_pipe, stderr);

        let (stdout_result, stderr_result) = tokio::join!(stdout_task, stderr_task);

        stdout_result.map_err(|e| ExecutionError::IoError(e.to_string()))?;
        if let Err(e) = stderr_result {
            warn!(error = %e, "Failed to drain stderr");
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ExecutionError::IoError(e.to_string()))?;

        Ok(status.code())
    }

    /// Kill a child that outlived its timeout and reap it
    async fn kill(child: &mut Child) {
        if let Err(e) = child.start_kill() {
            warn!(error = %e, "Failed to kill timed-out process");
            return;
        }
        if let Err(e) = child.wait().await {
            warn!(error = %e, "Failed to reap killed process");
        }
    }
}

#[async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn run(&self, command: &str, observer: &dyn OutputObserver) -> RunOutcome {
        let started = Instant::now();

        info!(
            command = %command,
            working_dir = ?self.working_dir,
            timeout_ms = ?self.timeout.map(saturating_millis),
            "Starting shell command"
        );

        let mut child = match self.spawn(command) {
            Ok(child) => child,
            Err(cause) => {
                return RunOutcome::Failed {
                    partial: CapturedOutput::default(),
                    cause,
                }
            }
        };
        debug!(pid = ?child.id(), "Shell command spawned");

        let mut stdout = LineAccumulator::new();
        let mut stderr = Vec::new();

        let result = {
            let capture = Self::capture(&mut child, &mut stdout, &mut stderr, observer);
            match self.timeout {
                Some(limit) => timeout(limit, capture)
                    .await
                    .unwrap_or(Err(ExecutionError::Timeout(saturating_millis(limit)))),
                None => capture.await,
            }
        };

        if matches!(result, Err(ExecutionError::Timeout(_))) {
            Self::kill(&mut child).await;
        }
        stdout.flush(observer);

        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let stdout = stdout.into_text();
        let stderr = String::from_utf8_lossy(&stderr).into_owned();

        match result {
            Ok(exit_code) => {
                info!(
                    command = %command,
                    duration_ms = %duration_ms,
                    exit_code = ?exit_code,
                    "Shell command completed"
                );
                RunOutcome::Completed(CapturedOutput {
                    stdout,
                    stderr,
                    exit_code,
                    duration_ms,
                })
            }
            Err(cause) => RunOutcome::Failed {
                partial: CapturedOutput {
                    stdout,
                    stderr,
                    exit_code: None,
                    duration_ms,
                },
                cause,
            },
        }
    }
}
