//! Invocation parsing.
//!
//! An invocation is a chain of tasks on one command line, e.g.
//! `gaedeploy staging:1-908ca6a deploy:tag shell`. [`parser`] splits each
//! token into name and arguments; [`task`] validates them into typed
//! [`Task`] values.

pub mod parser;
pub mod task;

pub use parser::{parse_task_token, RawTask};
pub use task::{
    DeployArgs, InfoFormat, LiveDeployArgs, LogLevel, MemcacheAction, ParamKind, ShellArgs, Task,
    TaskChain, TaskSpec, TestArgs, TASKS,
};
