//! Typed tasks and task chains.
//!
//! Each raw token is bound against the task's parameter list and converted
//! into a [`Task`] up front, so a typo in the last task of a chain is reported
//! before the first one has touched anything.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use clap_complete::Shell;

use super::parser::{parse_task_token, RawTask};
use crate::error::{DeployError, Result};
use crate::target::{TargetSelector, VersionId};

/// Arguments for `deploy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployArgs {
    /// Append the short git revision to the version.
    pub tag: bool,
    /// Deploy from a clean clone instead of the working directory.
    pub export: bool,
}

/// Arguments for `livedeploy`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveDeployArgs {
    pub export: bool,
}

/// Arguments for `shell`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShellArgs {
    /// Code to run instead of an interactive session.
    pub cmd: Option<String>,
    /// Remote API handler path override.
    pub path: Option<String>,
}

/// What `memcache` does on the remote deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemcacheAction {
    #[default]
    Stats,
    Flush,
}

impl MemcacheAction {
    /// Code run in the remote shell for this action.
    pub fn snippet(&self) -> &'static str {
        match self {
            Self::Stats => "print memcache.get_stats()",
            Self::Flush => "memcache.flush_all()",
        }
    }
}

impl FromStr for MemcacheAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stats" => Ok(Self::Stats),
            "flush" | "clear" => Ok(Self::Flush),
            _ => Err(format!(
                "invalid memcache command '{}'. Valid commands: stats, flush, clear",
                s
            )),
        }
    }
}

/// Log level passed to the test run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    Critical,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" | "fatal" => Ok(Self::Critical),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        f.write_str(name)
    }
}

/// Arguments for `test`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestArgs {
    pub coverage: bool,
    pub verbose: bool,
    pub loglevel: LogLevel,
}

/// Output format for `info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InfoFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for InfoFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown format '{}' (expected human or json)", s)),
        }
    }
}

/// A fully validated task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// `production[:version]` or `staging[:version]`.
    Select(TargetSelector),
    Deploy(DeployArgs),
    LiveDeploy(LiveDeployArgs),
    Shell(ShellArgs),
    Memcache(MemcacheAction),
    Test(TestArgs),
    Info(InfoFormat),
    Completions(Shell),
}

impl Task {
    /// The task's name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Select(s) => s.environment.selector_name().unwrap_or("local"),
            Self::Deploy(_) => "deploy",
            Self::LiveDeploy(_) => "livedeploy",
            Self::Shell(_) => "shell",
            Self::Memcache(_) => "memcache",
            Self::Test(_) => "test",
            Self::Info(_) => "info",
            Self::Completions(_) => "completions",
        }
    }

    /// Whether the task only makes sense against a deployed environment.
    pub fn requires_target(&self) -> bool {
        matches!(self, Self::Deploy(_) | Self::LiveDeploy(_) | Self::Memcache(_))
    }

    /// Parse and validate one task token.
    pub fn parse(token: &str) -> Result<Self> {
        let raw = parse_task_token(token)?;
        let spec = TaskSpec::find(&raw.name).ok_or_else(|| DeployError::UnknownTask {
            name: raw.name.clone(),
        })?;
        let args = bind(&raw, spec)?;

        let task = match spec.name {
            "production" => Self::Select(TargetSelector::production(args.version()?)),
            "staging" => Self::Select(TargetSelector::staging(args.version()?)),
            "deploy" => Self::Deploy(DeployArgs {
                tag: args.flag("tag"),
                export: args.flag("export"),
            }),
            "livedeploy" => Self::LiveDeploy(LiveDeployArgs {
                export: args.flag("export"),
            }),
            "shell" => Self::Shell(ShellArgs {
                cmd: args.value("cmd"),
                path: args.value("path"),
            }),
            "memcache" => Self::Memcache(args.parsed("cmd")?.unwrap_or_default()),
            "test" => Self::Test(TestArgs {
                coverage: args.flag("coverage"),
                verbose: args.flag("verbose"),
                loglevel: args.parsed("loglevel")?.unwrap_or_default(),
            }),
            "info" => Self::Info(args.parsed("format")?.unwrap_or_default()),
            "completions" => {
                let shell = args.value("shell").ok_or_else(|| DeployError::InvalidTask {
                    task: "completions".to_string(),
                    message: "a shell is required (bash, zsh, fish, elvish, powershell)"
                        .to_string(),
                })?;
                Self::Completions(Shell::from_str(&shell).map_err(|e| {
                    DeployError::InvalidTask {
                        task: "completions".to_string(),
                        message: e.to_string(),
                    }
                })?)
            }
            other => {
                return Err(DeployError::UnknownTask {
                    name: other.to_string(),
                })
            }
        };

        Ok(task)
    }
}

/// Whether a parameter is a boolean switch or takes a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Flag,
    Value,
}

/// A task's name, help text and parameters.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    pub name: &'static str,
    pub summary: &'static str,
    pub params: &'static [(&'static str, ParamKind)],
}

/// Every task that can appear in a chain.
pub const TASKS: &[TaskSpec] = &[
    TaskSpec {
        name: "production",
        summary: "Target production, optionally on a non-default version",
        params: &[("version", ParamKind::Value)],
    },
    TaskSpec {
        name: "staging",
        summary: "Target staging, optionally on a non-default version",
        params: &[("version", ParamKind::Value)],
    },
    TaskSpec {
        name: "deploy",
        summary: "Upload the application to the selected target",
        params: &[("tag", ParamKind::Flag), ("export", ParamKind::Flag)],
    },
    TaskSpec {
        name: "livedeploy",
        summary: "Deploy tagged with the git revision, then on the untagged version",
        params: &[("export", ParamKind::Flag)],
    },
    TaskSpec {
        name: "shell",
        summary: "Open a remote shell on the target, or a local shell",
        params: &[("cmd", ParamKind::Value), ("path", ParamKind::Value)],
    },
    TaskSpec {
        name: "memcache",
        summary: "Show stats for or flush the target's memcache",
        params: &[("cmd", ParamKind::Value)],
    },
    TaskSpec {
        name: "test",
        summary: "Run the configured modules' tests",
        params: &[
            ("coverage", ParamKind::Flag),
            ("verbose", ParamKind::Flag),
            ("loglevel", ParamKind::Value),
        ],
    },
    TaskSpec {
        name: "info",
        summary: "Show the resolved deployment target",
        params: &[("format", ParamKind::Value)],
    },
    TaskSpec {
        name: "completions",
        summary: "Print a shell completion script",
        params: &[("shell", ParamKind::Value)],
    },
];

impl TaskSpec {
    /// Look up a task by name.
    pub fn find(name: &str) -> Option<&'static TaskSpec> {
        TASKS.iter().find(|t| t.name == name)
    }

    fn kind(&self, param: &str) -> Option<ParamKind> {
        self.params
            .iter()
            .find(|(name, _)| *name == param)
            .map(|(_, kind)| *kind)
    }
}

/// Arguments bound to parameter names.
struct BoundArgs {
    task: &'static str,
    values: HashMap<&'static str, String>,
}

impl BoundArgs {
    fn invalid(&self, message: String) -> DeployError {
        DeployError::InvalidTask {
            task: self.task.to_string(),
            message,
        }
    }

    fn value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    /// A flag is on when given bare or with any non-empty value.
    fn flag(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|v| !v.is_empty())
    }

    fn parsed<T: FromStr<Err = String>>(&self, name: &str) -> Result<Option<T>> {
        self.values
            .get(name)
            .map(|v| v.parse::<T>().map_err(|e| self.invalid(e)))
            .transpose()
    }

    fn version(&self) -> Result<Option<VersionId>> {
        self.values
            .get("version")
            .map(|v| VersionId::parse(v))
            .transpose()
    }
}

/// Bind raw arguments to the task's parameters.
///
/// Keywords bind by name. A bare word equal to a flag's name sets that flag;
/// other bare words fill the value parameters in declaration order.
fn bind(raw: &RawTask, spec: &'static TaskSpec) -> Result<BoundArgs> {
    let mut values: HashMap<&'static str, String> = HashMap::new();
    let invalid = |message: String| DeployError::InvalidTask {
        task: spec.name.to_string(),
        message,
    };
    let param = |wanted: &str| {
        spec.params
            .iter()
            .map(|(name, _)| *name)
            .find(|name| *name == wanted)
    };

    for (key, value) in &raw.keywords {
        let name = param(key.as_str())
            .ok_or_else(|| invalid(format!("unknown argument '{}'", key)))?;
        if values.insert(name, value.clone()).is_some() {
            return Err(invalid(format!("argument '{}' given more than once", key)));
        }
    }

    for value in &raw.positional {
        if spec.kind(value) == Some(ParamKind::Flag) {
            let name = param(value.as_str())
                .ok_or_else(|| invalid(format!("unknown argument '{}'", value)))?;
            if values.insert(name, name.to_string()).is_some() {
                return Err(invalid(format!("argument '{}' given more than once", value)));
            }
            continue;
        }

        let slot = spec
            .params
            .iter()
            .filter(|(_, kind)| *kind == ParamKind::Value)
            .map(|(name, _)| *name)
            .find(|name| !values.contains_key(name))
            .ok_or_else(|| invalid(format!("unexpected argument '{}'", value)))?;
        values.insert(slot, value.clone());
    }

    Ok(BoundArgs {
        task: spec.name,
        values,
    })
}

/// The ordered tasks of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChain {
    tasks: Vec<Task>,
}

impl TaskChain {
    /// Parse every token, failing on the first invalid one.
    ///
    /// # Example
    ///
    /// ```
    /// use gaedeploy::invocation::{Task, TaskChain};
    ///
    /// let chain = TaskChain::parse(["staging:1-908ca6a", "shell"]).unwrap();
    /// assert_eq!(chain.selectors().count(), 1);
    /// assert!(matches!(chain.actions().next(), Some(Task::Shell(_))));
    /// ```
    pub fn parse<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tasks = tokens
            .into_iter()
            .map(|t| Task::parse(t.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { tasks })
    }

    /// All tasks in order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Whether no task was given.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Target selectors in order.
    pub fn selectors(&self) -> impl Iterator<Item = &TargetSelector> {
        self.tasks.iter().filter_map(|t| match t {
            Task::Select(s) => Some(s),
            _ => None,
        })
    }

    /// Every task that is not a selector, in order.
    pub fn actions(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !matches!(t, Task::Select(_)))
    }
}
