//! `deploy` and `livedeploy` tasks.
//!
//! Both upload the application with the platform tool, optionally from a
//! clean clone of the repository. Production uploads ask for confirmation
//! unless `--yes` was given or the session is not interactive.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::credentials::{find_credentials, Credentials};
use crate::error::Result;
use crate::git;
use crate::invocation::{DeployArgs, LiveDeployArgs};
use crate::shell::{quote, CommandOptions};
use crate::target::{Environment, VersionId};
use crate::ui::{SpinnerHandle, UserInterface};

use super::context::TaskContext;
use super::dispatcher::{Command, CommandResult};

/// The deploy command implementation.
pub struct DeployCommand {
    args: DeployArgs,
}

impl DeployCommand {
    /// Create a new deploy command.
    pub fn new(args: DeployArgs) -> Self {
        Self { args }
    }
}

impl Command for DeployCommand {
    fn execute(&self, ctx: &TaskContext, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (application, version) = ctx.remote("deploy")?;

        let version = if self.args.tag {
            version.tagged(&git::short_revision(ctx.runner, &ctx.project_root)?)?
        } else {
            version.clone()
        };

        if !confirm_production(ctx, ui, application, &[&version])? {
            ui.warning("Deploy cancelled");
            return Ok(CommandResult::failure(1));
        }

        let credentials = upload_credentials(ctx, ui);
        upload(ctx, ui, application, &version, credentials.as_ref(), self.args.export)?;
        Ok(CommandResult::success())
    }
}

/// The livedeploy command implementation.
///
/// Deploys once on `<version>-<git revision>` to keep a record of what is
/// live, then again on the target's own version.
pub struct LiveDeployCommand {
    args: LiveDeployArgs,
}

impl LiveDeployCommand {
    /// Create a new livedeploy command.
    pub fn new(args: LiveDeployArgs) -> Self {
        Self { args }
    }
}

impl Command for LiveDeployCommand {
    fn execute(&self, ctx: &TaskContext, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let (application, version) = ctx.remote("livedeploy")?;
        let tagged = version.tagged(&git::short_revision(ctx.runner, &ctx.project_root)?)?;

        if !confirm_production(ctx, ui, application, &[&tagged, version])? {
            ui.warning("Deploy cancelled");
            return Ok(CommandResult::failure(1));
        }

        let credentials = upload_credentials(ctx, ui);
        let credentials = credentials.as_ref();
        upload(ctx, ui, application, &tagged, credentials, self.args.export)?;
        upload(ctx, ui, application, version, credentials, self.args.export)?;
        Ok(CommandResult::success())
    }
}

fn confirm_production(
    ctx: &TaskContext,
    ui: &mut dyn UserInterface,
    application: &str,
    versions: &[&VersionId],
) -> Result<bool> {
    if ctx.target.environment != Environment::Production
        || ctx.assume_yes
        || ctx.dry_run
        || !ui.is_interactive()
    {
        return Ok(true);
    }

    let versions: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
    ui.confirm(
        &format!(
            "Deploy {} version {} to production?",
            application,
            versions.join(" and ")
        ),
        false,
    )
}

/// Look up the credentials file once per task.
fn upload_credentials(ctx: &TaskContext, ui: &mut dyn UserInterface) -> Option<Credentials> {
    let creds = find_credentials(&ctx.project_root, &ctx.settings.credentials_file)?;
    ui.message(&format!("Using credentials from {}", creds.source.display()));
    Some(creds)
}

/// Upload the application on `version`, from the working tree or a clean clone.
fn upload(
    ctx: &TaskContext,
    ui: &mut dyn UserInterface,
    application: &str,
    version: &VersionId,
    credentials: Option<&Credentials>,
    export: bool,
) -> Result<()> {
    // Dropping the clone removes it, including after a failed upload.
    let export_dir = if export {
        Some(export_clone(ctx, ui, application)?)
    } else {
        None
    };

    let (source, cwd): (PathBuf, &Path) = match &export_dir {
        Some(dir) => (dir.path().to_path_buf(), dir.path()),
        None => (PathBuf::from("."), ctx.project_root.as_path()),
    };

    let mut command = format!(
        "{} -A {} -V {}",
        ctx.settings.appcfg,
        quote(application),
        quote(version.as_str())
    );
    let mut options = CommandOptions::inherited(cwd);

    if let Some(creds) = credentials {
        command.push_str(&format!(" --email={} --passin", quote(&creds.username)));
        options = options.with_stdin(format!("{}\n", creds.password));
    }

    command.push_str(&format!(" update {}", quote(&source.to_string_lossy())));

    ctx.run_checked(ui, &command, &options)?;
    if !ctx.dry_run {
        ui.success(&format!(
            "Deployed {} version {} to {}",
            application, version, ctx.target.environment
        ));
    }
    Ok(())
}

/// Clone the project into a temporary directory, check out submodules and
/// strip all git metadata.
fn export_clone(
    ctx: &TaskContext,
    ui: &mut dyn UserInterface,
    application: &str,
) -> Result<TempDir> {
    let dir = tempfile::Builder::new()
        .prefix(&format!("{}-", application))
        .tempdir()?;
    tracing::debug!("Exporting clean checkout to {}", dir.path().display());

    let mut spinner = ui.start_spinner("Exporting a clean checkout");
    match populate_export(ctx, ui, spinner.as_mut(), dir.path()) {
        Ok(()) => spinner.finish_success(&format!("Exported to {}", dir.path().display())),
        Err(e) => {
            spinner.finish_error("Export failed");
            return Err(e);
        }
    }

    Ok(dir)
}

fn populate_export(
    ctx: &TaskContext,
    ui: &mut dyn UserInterface,
    spinner: &mut dyn SpinnerHandle,
    dir: &Path,
) -> Result<()> {
    let steps = [
        (
            "Cloning the repository",
            git::clone_command(&ctx.project_root, dir),
            CommandOptions::captured(&ctx.project_root),
        ),
        (
            "Updating submodules",
            git::SUBMODULE_UPDATE.to_string(),
            CommandOptions::captured(dir),
        ),
    ];

    for (label, command, options) in &steps {
        spinner.set_message(label);
        let result = ctx.run(ui, command, options)?;
        if !result.success && !result.stderr.trim().is_empty() {
            ui.error(result.stderr.trim());
        }
        result.check(command)?;
    }

    if !ctx.dry_run {
        let removed = git::strip_git_metadata(dir)?;
        tracing::debug!("Removed {} git entries from the export", removed);
    }
    Ok(())
}
