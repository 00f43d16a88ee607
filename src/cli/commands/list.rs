//! Task listing.
//!
//! Shown for `--list` and when no task is given.

use crate::invocation::{ParamKind, TaskSpec, TASKS};
use crate::ui::UserInterface;

/// Print every task with its arguments and summary.
pub fn show_tasks(ui: &mut dyn UserInterface) {
    ui.message("Available tasks:");
    ui.message("");
    let width = TASKS.iter().map(|t| usage(t).len()).max().unwrap_or(0);
    for spec in TASKS {
        ui.message(&format!(
            "    {:<width$}  {}",
            usage(spec),
            spec.summary,
            width = width
        ));
    }
}

/// `name[:param,flag]` usage line for a task.
pub fn usage(spec: &TaskSpec) -> String {
    if spec.params.is_empty() {
        return spec.name.to_string();
    }
    let params: Vec<String> = spec
        .params
        .iter()
        .map(|(name, kind)| match kind {
            ParamKind::Flag => name.to_string(),
            ParamKind::Value => format!("{}=..", name),
        })
        .collect();
    format!("{}[:{}]", spec.name, params.join(","))
}
