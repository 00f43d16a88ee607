//! State shared by every task in a chain.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Settings;
use crate::error::{DeployError, Result};
use crate::shell::{CommandOptions, CommandResult as ProcessResult, ProcessRunner};
use crate::target::{DeploymentTarget, VersionId};
use crate::ui::UserInterface;

/// Everything a task needs to know about the current invocation.
///
/// Built once by the dispatcher after the target is resolved and passed to
/// each task in turn.
pub struct TaskContext<'a> {
    pub project_root: PathBuf,
    pub target: DeploymentTarget,
    pub settings: Settings,
    pub runner: &'a dyn ProcessRunner,
    /// Print side-effecting commands instead of running them.
    pub dry_run: bool,
    /// Skip confirmation prompts.
    pub assume_yes: bool,
}

impl<'a> TaskContext<'a> {
    /// A context for a local run with default settings.
    pub fn new(project_root: &Path, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            target: DeploymentTarget::local(),
            settings: Settings::default(),
            runner,
            dry_run: false,
            assume_yes: false,
        }
    }

    /// Set the deployment target.
    pub fn with_target(mut self, target: DeploymentTarget) -> Self {
        self.target = target;
        self
    }

    /// Set the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Enable or disable dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Application id and version of the remote target.
    pub fn remote(&self, task: &str) -> Result<(&str, &VersionId)> {
        match (&self.target.application, &self.target.version) {
            (Some(app), Some(version)) if self.target.is_remote() => {
                Ok((app.as_str(), version))
            }
            _ => Err(DeployError::TargetRequired {
                task: task.to_string(),
            }),
        }
    }

    /// Run a side-effecting command, echoing it first.
    ///
    /// In dry-run mode the command is only echoed and reported as successful.
    pub fn run(
        &self,
        ui: &mut dyn UserInterface,
        command: &str,
        options: &CommandOptions,
    ) -> Result<ProcessResult> {
        ui.show_command(command);
        if self.dry_run {
            tracing::info!("Dry run, not running: {}", command);
            return Ok(ProcessResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            ));
        }

        tracing::debug!("Running: {}", command);
        let result = self.runner.run(command, options)?;
        tracing::debug!(
            "Exited with {:?} after {:?}",
            result.exit_code,
            result.duration
        );
        Ok(result)
    }

    /// Like [`run`](Self::run), but a non-zero exit is an error.
    pub fn run_checked(
        &self,
        ui: &mut dyn UserInterface,
        command: &str,
        options: &CommandOptions,
    ) -> Result<ProcessResult> {
        self.run(ui, command, options)?.check(command)
    }
}
