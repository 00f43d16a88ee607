//! Process runner abstraction.
//!
//! Tasks never spawn processes directly; they go through a
//! [`ProcessRunner`] so tests can record command lines instead of running
//! `appcfg.py` for real.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use super::command::{execute, CommandOptions, CommandResult};
use crate::error::Result;

/// Runs external commands.
pub trait ProcessRunner {
    /// Run `command` through the user's shell.
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs commands on the real system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult> {
        execute(command, options)
    }
}

/// A command seen by [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCommand {
    pub command: String,
    pub options: CommandOptions,
}

/// Runner that records commands and replays scripted results.
///
/// Unscripted commands succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    recorded: RefCell<Vec<RecordedCommand>>,
    responses: RefCell<VecDeque<(String, CommandResult)>>,
}

impl RecordingRunner {
    /// Create an empty runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result of the next command that starts with `prefix`.
    pub fn respond(&self, prefix: &str, exit_code: i32, stdout: &str) {
        let result = if exit_code == 0 {
            CommandResult::success(stdout.to_string(), String::new(), Duration::ZERO)
        } else {
            CommandResult::failure(
                Some(exit_code),
                stdout.to_string(),
                String::new(),
                Duration::ZERO,
            )
        };
        self.responses
            .borrow_mut()
            .push_back((prefix.to_string(), result));
    }

    /// All recorded commands in order.
    pub fn commands(&self) -> Vec<String> {
        self.recorded
            .borrow()
            .iter()
            .map(|r| r.command.clone())
            .collect()
    }

    /// All recorded commands with their options.
    pub fn recorded(&self) -> Vec<RecordedCommand> {
        self.recorded.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult> {
        self.recorded.borrow_mut().push(RecordedCommand {
            command: command.to_string(),
            options: options.clone(),
        });

        let mut responses = self.responses.borrow_mut();
        if let Some(idx) = responses
            .iter()
            .position(|(prefix, _)| command.starts_with(prefix.as_str()))
        {
            if let Some((_, result)) = responses.remove(idx) {
                return Ok(result);
            }
        }

        Ok(CommandResult::success(
            String::new(),
            String::new(),
            Duration::ZERO,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_runner_records_in_order() {
        let runner = RecordingRunner::new();
        runner.run("git status", &CommandOptions::default()).unwrap();
        runner.run("appcfg.py update .", &CommandOptions::default()).unwrap();
        assert_eq!(runner.commands(), vec!["git status", "appcfg.py update ."]);
    }

    #[test]
    fn recording_runner_replays_scripted_result_once() {
        let runner = RecordingRunner::new();
        runner.respond("git rev-parse", 0, "abc1234\n");

        let first = runner
            .run("git rev-parse --short HEAD", &CommandOptions::default())
            .unwrap();
        assert_eq!(first.stdout, "abc1234\n");

        let second = runner
            .run("git rev-parse --short HEAD", &CommandOptions::default())
            .unwrap();
        assert!(second.stdout.is_empty());
    }

    #[test]
    fn recording_runner_scripts_failures() {
        let runner = RecordingRunner::new();
        runner.respond("appcfg.py", 2, "");
        let result = runner.run("appcfg.py update .", &CommandOptions::default()).unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, Some(2));
    }

    #[test]
    fn system_runner_executes() {
        let options = CommandOptions {
            capture: true,
            ..Default::default()
        };
        let result = SystemRunner.run("echo from-runner", &options).unwrap();
        assert!(result.stdout.contains("from-runner"));
    }
}
