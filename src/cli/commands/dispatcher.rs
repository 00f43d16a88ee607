//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing tasks
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for running a task chain

use std::path::{Path, PathBuf};

use crate::cli::args::Cli;
use crate::config::{load_settings, AppYamlFile};
use crate::error::{DeployError, Result};
use crate::invocation::{Task, TaskChain};
use crate::shell::{ProcessRunner, SystemRunner};
use crate::target::TargetResolver;
use crate::ui::UserInterface;

use super::context::TaskContext;

/// Trait for task implementations.
pub trait Command {
    /// Execute the task.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Resolved target, settings and process runner
    /// * `ui` - User interface for displaying output and prompts
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ctx: &TaskContext, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Runs the task chain of one invocation.
pub struct CommandDispatcher<'r> {
    project_root: PathBuf,
    runner: &'r dyn ProcessRunner,
}

impl CommandDispatcher<'static> {
    /// Create a new dispatcher that runs real processes.
    pub fn new(project_root: PathBuf) -> Self {
        Self::with_runner(project_root, &SystemRunner)
    }
}

impl<'r> CommandDispatcher<'r> {
    /// Create a dispatcher with a custom process runner.
    pub fn with_runner(project_root: PathBuf, runner: &'r dyn ProcessRunner) -> Self {
        Self {
            project_root,
            runner,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Parse, resolve and run the tasks given on the command line.
    ///
    /// Every token is parsed and the target resolved before the first task
    /// runs, so a bad token anywhere in the chain has no side effects.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if cli.list {
            super::list::show_tasks(ui);
            return Ok(CommandResult::success());
        }

        let chain = TaskChain::parse(&cli.tasks)?;
        if chain.is_empty() {
            ui.error("No task given.");
            super::list::show_tasks(ui);
            return Ok(CommandResult::failure(2));
        }
        tracing::debug!(
            "Task chain: {}",
            chain
                .tasks()
                .iter()
                .map(Task::name)
                .collect::<Vec<_>>()
                .join(" ")
        );

        let settings = load_settings(&self.project_root, cli.config.as_deref())?;
        let app_yaml = AppYamlFile::in_project(&self.project_root);
        let target = TargetResolver::resolve(chain.selectors(), &app_yaml)?;

        if !target.is_remote() {
            if let Some(task) = chain.actions().find(|t| t.requires_target()) {
                return Err(DeployError::TargetRequired {
                    task: task.name().to_string(),
                });
            }
        }

        if chain.actions().next().is_none() {
            ui.message(&format!("Deployment target: {}. Nothing to do.", target));
            return Ok(CommandResult::success());
        }

        let ctx = TaskContext {
            project_root: self.project_root.clone(),
            target,
            settings,
            runner: self.runner,
            dry_run: cli.dry_run,
            assume_yes: cli.yes,
        };

        for task in chain.actions() {
            let result = command_for(task).execute(&ctx, ui)?;
            if !result.success {
                tracing::debug!("Task '{}' failed, stopping the chain", task.name());
                return Ok(result);
            }
        }

        Ok(CommandResult::success())
    }
}

fn command_for(task: &Task) -> Box<dyn Command> {
    match task {
        Task::Deploy(args) => Box::new(super::deploy::DeployCommand::new(args.clone())),
        Task::LiveDeploy(args) => Box::new(super::deploy::LiveDeployCommand::new(args.clone())),
        Task::Shell(args) => Box::new(super::shell::ShellCommand::new(args.clone())),
        Task::Memcache(action) => Box::new(super::memcache::MemcacheCommand::new(*action)),
        Task::Test(args) => Box::new(super::test::TestCommand::new(args.clone())),
        Task::Info(format) => Box::new(super::info::InfoCommand::new(*format)),
        Task::Completions(shell) => {
            Box::new(super::completions::CompletionsCommand::new(*shell))
        }
        // Selectors are consumed by the resolver and never reach here.
        Task::Select(_) => Box::new(NoopCommand),
    }
}

struct NoopCommand;

impl Command for NoopCommand {
    fn execute(&self, _ctx: &TaskContext, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        Ok(CommandResult::success())
    }
}
