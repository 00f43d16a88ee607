//! Shell command execution.

pub mod command;
pub mod platform;
pub mod runner;

pub use command::{execute, quote, CommandOptions, CommandResult};
pub use platform::{is_ci, shell_executable};
pub use runner::{ProcessRunner, RecordedCommand, RecordingRunner, SystemRunner};
