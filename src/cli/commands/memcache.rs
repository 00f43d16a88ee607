//! `memcache` task: stats or flush on the remote deployment.

use crate::error::{DeployError, Result};
use crate::invocation::MemcacheAction;
use crate::ui::UserInterface;

use super::context::TaskContext;
use super::dispatcher::{Command, CommandResult};
use super::shell::{remote_shell_command, run_code};

/// The memcache command implementation.
pub struct MemcacheCommand {
    action: MemcacheAction,
}

impl MemcacheCommand {
    /// Create a new memcache command.
    pub fn new(action: MemcacheAction) -> Self {
        Self { action }
    }
}

impl Command for MemcacheCommand {
    fn execute(&self, ctx: &TaskContext, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let command =
            remote_shell_command(ctx, None).ok_or_else(|| DeployError::TargetRequired {
                task: "memcache".to_string(),
            })?;

        run_code(ctx, ui, &command, self.action.snippet())?;
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppDescriptor;
    use crate::shell::RecordingRunner;
    use crate::target::{TargetResolver, TargetSelector};
    use crate::ui::MockUI;
    use std::path::Path;

    fn production_ctx(runner: &RecordingRunner) -> TaskContext<'_> {
        let app = AppDescriptor::new("key-auth", "1");
        let target = TargetResolver::resolve(&[TargetSelector::production(None)], &app).unwrap();
        TaskContext::new(Path::new("/srv/app"), runner).with_target(target)
    }

    #[test]
    fn stats_prints_remote_stats() {
        let runner = RecordingRunner::new();
        let ctx = production_ctx(&runner);
        let mut ui = MockUI::new();

        MemcacheCommand::new(MemcacheAction::Stats)
            .execute(&ctx, &mut ui)
            .unwrap();

        let recorded = runner.recorded();
        assert!(recorded[0].command.contains("-s key-auth.appspot.com"));
        assert_eq!(
            recorded[0].options.stdin.as_deref(),
            Some("print memcache.get_stats()\n")
        );
    }

    #[test]
    fn flush_runs_flush_all() {
        let runner = RecordingRunner::new();
        let ctx = production_ctx(&runner);
        let mut ui = MockUI::new();

        MemcacheCommand::new(MemcacheAction::Flush)
            .execute(&ctx, &mut ui)
            .unwrap();

        assert_eq!(
            runner.recorded()[0].options.stdin.as_deref(),
            Some("memcache.flush_all()\n")
        );
    }

    #[test]
    fn local_run_is_rejected() {
        let runner = RecordingRunner::new();
        let ctx = TaskContext::new(Path::new("/srv/app"), &runner);
        let mut ui = MockUI::new();

        let err = MemcacheCommand::new(MemcacheAction::Stats)
            .execute(&ctx, &mut ui)
            .unwrap_err();
        assert!(matches!(err, DeployError::TargetRequired { .. }));
        assert!(runner.commands().is_empty());
    }
}
