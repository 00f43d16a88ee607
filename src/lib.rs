//! gaedeploy - Deployment helpers for applications described by `app.yaml`.
//!
//! gaedeploy chains small tasks on one command line. A leading
//! `production[:version]` or `staging[:version]` picks the deployment target,
//! and the tasks after it (`deploy`, `shell`, `memcache`, ...) act on it.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface, task implementations and dispatch
//! - [`config`] - `app.yaml` and settings loading
//! - [`credentials`] - Optional upload credentials
//! - [`error`] - Error types and result aliases
//! - [`git`] - Revision lookup and clean exports
//! - [`invocation`] - Task token parsing and typed tasks
//! - [`shell`] - Shell command execution
//! - [`target`] - Deployment target resolution
//! - [`ui`] - Terminal output, spinners and prompts
//!
//! # Example
//!
//! ```
//! use gaedeploy::config::AppDescriptor;
//! use gaedeploy::invocation::TaskChain;
//! use gaedeploy::target::{Environment, TargetResolver};
//!
//! let chain = TaskChain::parse(["staging", "shell"]).unwrap();
//! let app = AppDescriptor::new("key-auth", "1");
//! let target = TargetResolver::resolve(chain.selectors(), &app).unwrap();
//!
//! assert_eq!(target.environment, Environment::Staging);
//! assert_eq!(target.host.as_deref(), Some("staging.latest.key-auth.appspot.com"));
//! ```

pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod git;
pub mod invocation;
pub mod shell;
pub mod target;
pub mod ui;

pub use error::{DeployError, Result};
