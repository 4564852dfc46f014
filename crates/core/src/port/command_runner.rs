// Command Runner Port
// Abstraction for executing the external test command and capturing its output

use async_trait::async_trait;
use thiserror::Error;

/// Everything captured from one command execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Standard output, newlines preserved, in arrival order
    pub stdout: String,
    /// Standard error; drained so the child never stalls, not used for extraction
    pub stderr: String,
    /// None when the process was killed by a signal or never finished
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
}

impl CapturedOutput {
    pub fn exited_successfully(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Process timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Result of running a command
///
/// A non-zero exit status is still `Completed`: the exit code is recorded but
/// the captured text is handed to extraction unchanged. `Failed` carries
/// whatever was captured before the fault.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(CapturedOutput),
    Failed {
        partial: CapturedOutput,
        cause: ExecutionError,
    },
}

impl RunOutcome {
    pub fn output(&self) -> &CapturedOutput {
        match self {
            RunOutcome::Completed(output) => output,
            RunOutcome::Failed { partial, .. } => partial,
        }
    }

    pub fn stdout(&self) -> &str {
        &self.output().stdout
    }

    pub fn cause(&self) -> Option<&ExecutionError> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Failed { cause, .. } => Some(cause),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Receives each stdout line as soon as the child writes it
pub trait OutputObserver: Send + Sync {
    /// `line` includes its trailing newline when the child wrote one
    fn on_line(&self, line: &str);
}

/// Observer that drops every line
pub struct SilentObserver;

impl OutputObserver for SilentObserver {
    fn on_line(&self, _line: &str) {}
}

/// Command Runner trait
///
/// Implementations:
/// - ShellCommandRunner: runs the command through the platform shell
/// - MockCommandRunner: replays canned output (tests)
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute `command` verbatim and capture its output
    ///
    /// Never returns an error: launch and read faults come back as
    /// `RunOutcome::Failed` with the partial output.
    async fn run(&self, command: &str, observer: &dyn OutputObserver) -> RunOutcome;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Emit the chunks as stdout lines and exit with the given code
        Exit { chunks: Vec<String>, exit_code: i32 },
        /// Fail to launch
        SpawnFail(String),
        /// Emit the chunks, then fail with a read error
        ReadFail { chunks: Vec<String>, message: String },
    }

    /// Mock Command Runner for testing
    pub struct MockCommandRunner {
        behavior: MockBehavior,
        commands: Mutex<Vec<String>>,
    }

    impl MockCommandRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                commands: Mutex::new(Vec::new()),
            }
        }

        pub fn new_exit(stdout: impl Into<String>, exit_code: i32) -> Self {
            Self::new(MockBehavior::Exit {
                chunks: split_lines(&stdout.into()),
                exit_code,
            })
        }

        pub fn new_spawn_fail(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn new_read_fail(stdout: impl Into<String>, message: impl Into<String>) -> Self {
            Self::new(MockBehavior::ReadFail {
                chunks: split_lines(&stdout.into()),
                message: message.into(),
            })
        }

        /// Commands passed to `run`, in call order
        pub fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    fn split_lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(str::to_string).collect()
    }

    fn replay(chunks: &[String], observer: &dyn OutputObserver) -> String {
        let mut stdout = String::new();
        for chunk in chunks {
            observer.on_line(chunk);
            stdout.push_str(chunk);
        }
        stdout
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, command: &str, observer: &dyn OutputObserver) -> RunOutcome {
            self.commands.lock().unwrap().push(command.to_string());

            match &self.behavior {
                MockBehavior::Exit { chunks, exit_code } => RunOutcome::Completed(CapturedOutput {
                    stdout: replay(chunks, observer),
                    stderr: String::new(),
                    exit_code: Some(*exit_code),
                    duration_ms: 1,
                }),
                MockBehavior::SpawnFail(message) => RunOutcome::Failed {
                    partial: CapturedOutput::default(),
                    cause: ExecutionError::SpawnFailed(message.clone()),
                },
                MockBehavior::ReadFail { chunks, message } => RunOutcome::Failed {
                    partial: CapturedOutput {
                        stdout: replay(chunks, observer),
                        ..Default::default()
                    },
                    cause: ExecutionError::IoError(message.clone()),
                },
            }
        }
    }

    /// Observer that records every line it sees
    #[derive(Default)]
    pub struct RecordingObserver {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        pub fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl OutputObserver for RecordingObserver {
        fn on_line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }
}
