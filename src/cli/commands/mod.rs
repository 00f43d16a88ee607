//! Task implementations.
//!
//! Each task implements the [`Command`] trait, which provides a uniform
//! interface for executing tasks and reporting results.
//!
//! # Architecture
//!
//! Tasks are run via [`CommandDispatcher`], which parses the whole chain,
//! resolves the deployment target once, and hands every task the same
//! [`TaskContext`].

pub mod completions;
pub mod context;
pub mod deploy;
pub mod dispatcher;
pub mod info;
pub mod list;
pub mod memcache;
pub mod shell;

pub use context::TaskContext;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
