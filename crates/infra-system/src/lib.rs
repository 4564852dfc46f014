// failmap Infrastructure - System Adapters
// Implements: CommandRunner, ReportStore, OutputObserver

pub mod console;
pub mod file_store;
pub mod shell_runner;

pub use console::StdoutEcho;
pub use file_store::FileReportStore;
pub use shell_runner::{LineAccumulator, ShellCommandRunner};
