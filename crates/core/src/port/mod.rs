// Port Layer - Interfaces for external dependencies

pub mod command_runner;
pub mod report_store;

// Re-exports
pub use command_runner::{
    CapturedOutput, CommandRunner, ExecutionError, OutputObserver, RunOutcome, SilentObserver,
};
pub use report_store::ReportStore;
