//! Deployment target selection.
//!
//! Every invocation acts on exactly one [`DeploymentTarget`]: production,
//! staging, or the implicit local target. The target is resolved once from
//! the invocation's selectors and then handed to each task explicitly.

pub mod resolver;
pub mod version;

pub use resolver::{
    remote_host, DeploymentTarget, Environment, TargetResolver, TargetSelector, HOST_DOMAIN,
    STAGING_VERSION,
};
pub use version::{VersionId, MAX_VERSION_LEN};
