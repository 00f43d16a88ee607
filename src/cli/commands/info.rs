//! `info` task: show the resolved deployment target.

use crate::error::Result;
use crate::invocation::InfoFormat;
use crate::target::DeploymentTarget;
use crate::ui::UserInterface;

use super::context::TaskContext;
use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand {
    format: InfoFormat,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(format: InfoFormat) -> Self {
        Self { format }
    }
}

/// Human-readable `key: value` lines for a target.
pub fn describe(target: &DeploymentTarget) -> Vec<String> {
    let mut lines = vec![format!("Environment: {}", target.environment)];
    if let Some(app) = &target.application {
        lines.push(format!("Application: {}", app));
    }
    if let Some(version) = &target.version {
        lines.push(format!("Version:     {}", version));
    }
    if let Some(host) = &target.host {
        lines.push(format!("Host:        {}", host));
    }
    lines
}

impl Command for InfoCommand {
    fn execute(&self, ctx: &TaskContext, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.format {
            InfoFormat::Human => {
                for line in describe(&ctx.target) {
                    println!("{}", line);
                }
            }
            InfoFormat::Json => {
                let json = serde_json::to_string_pretty(&ctx.target)
                    .map_err(|e| anyhow::anyhow!("failed to serialize target: {}", e))?;
                println!("{}", json);
            }
        }
        Ok(CommandResult::success())
    }
}
