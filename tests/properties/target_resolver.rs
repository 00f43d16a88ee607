//! Property tests for deployment target resolution.

use proptest::prelude::*;

use gaedeploy::config::AppDescriptor;
use gaedeploy::target::{
    DeploymentTarget, Environment, TargetResolver, TargetSelector, VersionId, STAGING_VERSION,
};
use gaedeploy::DeployError;

fn version_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]([a-z0-9-]{0,20}[a-z0-9])?".prop_filter("reserved prefix", |v| !v.starts_with("ah-"))
}

fn app_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,20}[a-z0-9]"
}

fn resolve(
    selectors: &[TargetSelector],
    app: &AppDescriptor,
) -> Result<DeploymentTarget, DeployError> {
    TargetResolver::resolve(selectors, app)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: no selector means a local target, whatever app.yaml says.
    #[test]
    fn property_no_selector_is_local(app in app_strategy(), declared in version_strategy()) {
        let descriptor = AppDescriptor::new(app, declared);
        let target = resolve(&[], &descriptor).unwrap();
        prop_assert_eq!(target, DeploymentTarget::local());
    }

    /// PROPERTY: staging without a modifier always lands on the reserved version.
    #[test]
    fn property_staging_default_is_reserved(app in app_strategy(), declared in version_strategy()) {
        let descriptor = AppDescriptor::new(app.clone(), declared);
        let target = resolve(&[TargetSelector::staging(None)], &descriptor).unwrap();

        prop_assert_eq!(target.environment, Environment::Staging);
        prop_assert_eq!(target.version.as_ref().map(VersionId::as_str), Some(STAGING_VERSION));
        prop_assert_eq!(
            target.host,
            Some(format!("{}.latest.{}.appspot.com", STAGING_VERSION, app))
        );
    }

    /// PROPERTY: production without a modifier uses the declared version on the default host.
    #[test]
    fn property_production_default_is_declared(app in app_strategy(), declared in version_strategy()) {
        let descriptor = AppDescriptor::new(app.clone(), declared.clone());
        let target = resolve(&[TargetSelector::production(None)], &descriptor).unwrap();

        prop_assert_eq!(target.environment, Environment::Production);
        prop_assert_eq!(target.version.as_ref().map(VersionId::as_str), Some(declared.as_str()));
        prop_assert_eq!(target.host, Some(format!("{}.appspot.com", app)));
    }

    /// PROPERTY: an explicit modifier wins for either environment and pins the host.
    #[test]
    fn property_modifier_wins(
        app in app_strategy(),
        declared in version_strategy(),
        modifier in version_strategy(),
        production in any::<bool>(),
    ) {
        let descriptor = AppDescriptor::new(app.clone(), declared);
        let v = VersionId::parse(&modifier).unwrap();
        let selector = if production {
            TargetSelector::production(Some(v))
        } else {
            TargetSelector::staging(Some(v))
        };

        let target = resolve(&[selector], &descriptor).unwrap();
        prop_assert_eq!(target.version.as_ref().map(VersionId::as_str), Some(modifier.as_str()));
        prop_assert_eq!(
            target.host,
            Some(format!("{}.latest.{}.appspot.com", modifier, app))
        );
    }

    /// PROPERTY: a second selector is always rejected.
    #[test]
    fn property_second_selector_conflicts(
        first_production in any::<bool>(),
        second_production in any::<bool>(),
        declared in version_strategy(),
    ) {
        let descriptor = AppDescriptor::new("key-auth", declared);
        let pick = |production: bool| {
            if production {
                TargetSelector::production(None)
            } else {
                TargetSelector::staging(None)
            }
        };

        let result = resolve(&[pick(first_production), pick(second_production)], &descriptor);
        let is_conflict = matches!(result, Err(DeployError::ConflictingTargets { .. }));
        prop_assert!(is_conflict);
    }
}
