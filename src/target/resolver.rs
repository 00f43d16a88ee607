//! Deployment target resolution.
//!
//! Resolves which environment and version the rest of an invocation acts on:
//! 1. `production[:version]` selects production, defaulting to `app.yaml`'s version
//! 2. `staging[:version]` selects staging, defaulting to the reserved `staging` version
//! 3. No selector means a local, unscoped run
//!
//! A second selector in the same invocation is rejected.

use std::fmt;

use serde::Serialize;

use super::version::VersionId;
use crate::config::AppDescriptorSource;
use crate::error::{DeployError, Result};

/// Version that every staging deploy lands on unless overridden.
///
/// Deployed applications check for this exact string to switch to their
/// staging behavior (e.g. a separate data namespace).
pub const STAGING_VERSION: &str = "staging";

/// Domain suffix of hosted applications.
pub const HOST_DOMAIN: &str = "appspot.com";

/// The environment a task acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    #[default]
    Local,
}

impl Environment {
    /// The selector task name for this environment, if it has one.
    pub fn selector_name(&self) -> Option<&'static str> {
        match self {
            Self::Production => Some("production"),
            Self::Staging => Some("staging"),
            Self::Local => None,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Staging => write!(f, "staging"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A request to switch the invocation to a remote environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    /// Production or staging.
    pub environment: Environment,
    /// Explicit version modifier.
    pub version: Option<VersionId>,
}

impl TargetSelector {
    /// `production[:version]`.
    pub fn production(version: Option<VersionId>) -> Self {
        Self {
            environment: Environment::Production,
            version,
        }
    }

    /// `staging[:version]`.
    pub fn staging(version: Option<VersionId>) -> Self {
        Self {
            environment: Environment::Staging,
            version,
        }
    }
}

/// The environment and version an invocation acts on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeploymentTarget {
    /// Which environment is active.
    pub environment: Environment,
    /// Version identifier. `None` only for local runs.
    pub version: Option<VersionId>,
    /// Application id the target was resolved against. `None` for local runs.
    pub application: Option<String>,
    /// Remote host serving this version. `None` for local runs.
    pub host: Option<String>,
}

impl DeploymentTarget {
    /// The implicit target when no selector ran.
    pub fn local() -> Self {
        Self::default()
    }

    fn remote(
        environment: Environment,
        application: String,
        version: VersionId,
        pinned: bool,
    ) -> Self {
        let host = remote_host(&application, pinned.then_some(&version));
        Self {
            environment,
            version: Some(version),
            application: Some(application),
            host: Some(host),
        }
    }

    /// Whether this target points at a deployed environment.
    pub fn is_remote(&self) -> bool {
        self.environment != Environment::Local
    }
}

impl fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.version, &self.host) {
            (Some(v), Some(h)) => write!(f, "{} (version {}, {})", self.environment, v, h),
            _ => write!(f, "{}", self.environment),
        }
    }
}

/// Build the host name for an application, optionally pinned to a version.
///
/// ```
/// use gaedeploy::target::{remote_host, VersionId};
///
/// assert_eq!(remote_host("key-auth", None), "key-auth.appspot.com");
/// let v = VersionId::parse("staging").unwrap();
/// assert_eq!(remote_host("key-auth", Some(&v)), "staging.latest.key-auth.appspot.com");
/// ```
pub fn remote_host(application: &str, version: Option<&VersionId>) -> String {
    match version {
        Some(v) => format!("{}.latest.{}.{}", v, application, HOST_DOMAIN),
        None => format!("{}.{}", application, HOST_DOMAIN),
    }
}

/// Resolves the deployment target for one invocation.
pub struct TargetResolver<'a> {
    source: &'a dyn AppDescriptorSource,
    current: DeploymentTarget,
}

impl<'a> TargetResolver<'a> {
    /// Create a resolver that reads `app.yaml` through `source` when needed.
    pub fn new(source: &'a dyn AppDescriptorSource) -> Self {
        Self {
            source,
            current: DeploymentTarget::local(),
        }
    }

    /// Resolve a sequence of selectors into a single target.
    ///
    /// # Example
    ///
    /// ```
    /// use gaedeploy::config::AppDescriptor;
    /// use gaedeploy::target::{Environment, TargetResolver, TargetSelector};
    ///
    /// let app = AppDescriptor::new("key-auth", "v3");
    /// let target = TargetResolver::resolve(&[TargetSelector::production(None)], &app).unwrap();
    /// assert_eq!(target.environment, Environment::Production);
    /// assert_eq!(target.version.unwrap().as_str(), "v3");
    /// ```
    pub fn resolve<'s>(
        selectors: impl IntoIterator<Item = &'s TargetSelector>,
        source: &'a dyn AppDescriptorSource,
    ) -> Result<DeploymentTarget> {
        let mut resolver = Self::new(source);
        for selector in selectors {
            resolver.apply(selector)?;
        }
        Ok(resolver.into_target())
    }

    /// Apply one selector.
    pub fn apply(&mut self, selector: &TargetSelector) -> Result<()> {
        match selector.environment {
            Environment::Production => self.select_production(selector.version.clone()),
            Environment::Staging => self.select_staging(selector.version.clone()),
            Environment::Local => Ok(()),
        }
    }

    /// Select production, on `version` or the application's declared version.
    pub fn select_production(&mut self, version: Option<VersionId>) -> Result<()> {
        self.ensure_unselected(Environment::Production)?;
        let app = self.source.descriptor()?;
        let pinned = version.is_some();
        let version = match version {
            Some(v) => v,
            None => VersionId::parse(&app.version)?,
        };
        self.set(DeploymentTarget::remote(
            Environment::Production,
            app.application,
            version,
            pinned,
        ));
        Ok(())
    }

    /// Select staging, on `version` or the reserved staging version.
    ///
    /// The application's declared version is never used here, so staging
    /// and production cannot land on the same version by accident.
    pub fn select_staging(&mut self, version: Option<VersionId>) -> Result<()> {
        self.ensure_unselected(Environment::Staging)?;
        let app = self.source.descriptor()?;
        let version = match version {
            Some(v) => v,
            None => VersionId::parse(STAGING_VERSION)?,
        };
        self.set(DeploymentTarget::remote(
            Environment::Staging,
            app.application,
            version,
            true,
        ));
        Ok(())
    }

    /// The target as currently resolved (local if nothing was selected).
    pub fn current_target(&self) -> &DeploymentTarget {
        &self.current
    }

    /// Consume the resolver, returning the resolved target.
    pub fn into_target(self) -> DeploymentTarget {
        self.current
    }

    fn ensure_unselected(&self, requested: Environment) -> Result<()> {
        if self.current.is_remote() {
            return Err(DeployError::ConflictingTargets {
                first: self.current.environment.to_string(),
                second: requested.to_string(),
            });
        }
        Ok(())
    }

    fn set(&mut self, target: DeploymentTarget) {
        tracing::info!("Deployment target: {}", target);
        self.current = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppDescriptor;

    fn app() -> AppDescriptor {
        AppDescriptor::new("key-auth", "v3")
    }

    fn v(s: &str) -> Option<VersionId> {
        Some(VersionId::parse(s).unwrap())
    }

    struct NoDescriptor;

    impl AppDescriptorSource for NoDescriptor {
        fn descriptor(&self) -> Result<crate::config::AppDescriptor> {
            Err(DeployError::AppConfigNotFound {
                path: "app.yaml".into(),
            })
        }
    }

    #[test]
    fn no_selector_is_local() {
        let source = app();
        let resolver = TargetResolver::new(&source);
        let target = resolver.current_target();
        assert_eq!(target.environment, Environment::Local);
        assert_eq!(target.version, None);
        assert_eq!(target.host, None);
        assert!(!target.is_remote());
    }

    #[test]
    fn local_never_reads_descriptor() {
        let none: [TargetSelector; 0] = [];
        let target = TargetResolver::resolve(&none, &NoDescriptor).unwrap();
        assert_eq!(target, DeploymentTarget::local());
    }

    #[test]
    fn production_defaults_to_declared_version() {
        let target = TargetResolver::resolve(&[TargetSelector::production(None)], &app()).unwrap();
        assert_eq!(target.environment, Environment::Production);
        assert_eq!(target.version, v("v3"));
        assert_eq!(target.host.as_deref(), Some("key-auth.appspot.com"));
    }

    #[test]
    fn production_with_modifier_pins_host() {
        let target =
            TargetResolver::resolve(&[TargetSelector::production(v("v4"))], &app()).unwrap();
        assert_eq!(target.version, v("v4"));
        assert_eq!(
            target.host.as_deref(),
            Some("v4.latest.key-auth.appspot.com")
        );
    }

    #[test]
    fn staging_defaults_to_reserved_version() {
        let target = TargetResolver::resolve(&[TargetSelector::staging(None)], &app()).unwrap();
        assert_eq!(target.environment, Environment::Staging);
        assert_eq!(target.version, v(STAGING_VERSION));
        assert_eq!(
            target.host.as_deref(),
            Some("staging.latest.key-auth.appspot.com")
        );
    }

    #[test]
    fn staging_ignores_declared_version() {
        let source = AppDescriptor::new("key-auth", "staging-looking-not");
        let target = TargetResolver::resolve(&[TargetSelector::staging(None)], &source).unwrap();
        assert_eq!(target.version, v("staging"));
    }

    #[test]
    fn staging_with_modifier_uses_it_verbatim() {
        let target =
            TargetResolver::resolve(&[TargetSelector::staging(v("1-908ca6a"))], &app()).unwrap();
        assert_eq!(target.version, v("1-908ca6a"));
        assert_eq!(
            target.host.as_deref(),
            Some("1-908ca6a.latest.key-auth.appspot.com")
        );
    }

    #[test]
    fn production_may_be_forced_onto_staging_version() {
        let target =
            TargetResolver::resolve(&[TargetSelector::production(v("staging"))], &app()).unwrap();
        assert_eq!(target.environment, Environment::Production);
        assert_eq!(target.version, v("staging"));
    }

    #[test]
    fn second_selector_is_rejected() {
        let err = TargetResolver::resolve(
            &[
                TargetSelector::production(None),
                TargetSelector::staging(None),
            ],
            &app(),
        )
        .unwrap_err();
        match err {
            DeployError::ConflictingTargets { first, second } => {
                assert_eq!(first, "production");
                assert_eq!(second, "staging");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_selector_is_rejected() {
        let app = app();
        let mut resolver = TargetResolver::new(&app);
        resolver.select_staging(None).unwrap();
        assert!(resolver.select_staging(v("2")).is_err());
        assert_eq!(resolver.current_target().version, v("staging"));
    }

    #[test]
    fn production_without_descriptor_fails_fast() {
        let err = TargetResolver::resolve(&[TargetSelector::production(None)], &NoDescriptor)
            .unwrap_err();
        assert!(matches!(err, DeployError::AppConfigNotFound { .. }));
    }

    #[test]
    fn invalid_declared_version_is_rejected() {
        let source = AppDescriptor::new("key-auth", "Version_1");
        let err =
            TargetResolver::resolve(&[TargetSelector::production(None)], &source).unwrap_err();
        assert!(matches!(err, DeployError::InvalidVersion { .. }));
    }

    #[test]
    fn display_formats() {
        assert_eq!(DeploymentTarget::local().to_string(), "local");
        let target = TargetResolver::resolve(&[TargetSelector::staging(None)], &app()).unwrap();
        assert_eq!(
            target.to_string(),
            "staging (version staging, staging.latest.key-auth.appspot.com)"
        );
    }

    #[test]
    fn environment_selector_names() {
        assert_eq!(Environment::Production.selector_name(), Some("production"));
        assert_eq!(Environment::Staging.selector_name(), Some("staging"));
        assert_eq!(Environment::Local.selector_name(), None);
    }
}
