//! `shell` task: remote or local interactive shell.

use crate::error::Result;
use crate::invocation::ShellArgs;
use crate::shell::{quote, CommandOptions};
use crate::ui::UserInterface;

use super::context::TaskContext;
use super::dispatcher::{Command, CommandResult};

/// The shell command implementation.
pub struct ShellCommand {
    args: ShellArgs,
}

impl ShellCommand {
    /// Create a new shell command.
    pub fn new(args: ShellArgs) -> Self {
        Self { args }
    }
}

/// Command line for a remote shell on the context's target.
///
/// Returns `None` for local runs.
pub fn remote_shell_command(ctx: &TaskContext, path: Option<&str>) -> Option<String> {
    let host = ctx.target.host.as_deref()?;
    let application = ctx.target.application.as_deref()?;
    let path = path.unwrap_or(&ctx.settings.remote_api_path);

    Some(format!(
        "{} -s {} -p {} {}",
        ctx.settings.remote_shell,
        quote(host),
        quote(path),
        quote(application)
    ))
}

/// Feed `code` to the shell started by `command`, which exits afterwards.
pub fn run_code(
    ctx: &TaskContext,
    ui: &mut dyn UserInterface,
    command: &str,
    code: &str,
) -> Result<()> {
    if ctx.target.is_remote() {
        ui.message(&format!("Running remote command: {}", code));
    } else {
        ui.message(&format!("Running command: {}", code));
    }
    let options = CommandOptions::inherited(&ctx.project_root).with_stdin(format!("{}\n", code));
    ctx.run_checked(ui, command, &options)?;
    Ok(())
}

impl Command for ShellCommand {
    fn execute(&self, ctx: &TaskContext, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.args.path.as_deref();

        let command = match remote_shell_command(ctx, path) {
            Some(command) => {
                if let Some(host) = &ctx.target.host {
                    let path = path.unwrap_or(&ctx.settings.remote_api_path);
                    ui.show_header(&format!("Remote shell on {}{}", host, path));
                }
                command
            }
            None => {
                if path.is_some() {
                    ui.warning("Ignoring 'path' for a local shell");
                }
                ctx.settings.local_shell.clone()
            }
        };

        match &self.args.cmd {
            Some(code) => run_code(ctx, ui, &command, code)?,
            None => {
                ctx.run_checked(ui, &command, &CommandOptions::inherited(&ctx.project_root))?;
            }
        }

        Ok(CommandResult::success())
    }
}
