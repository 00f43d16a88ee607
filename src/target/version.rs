//! Version identifiers.
//!
//! The hosting platform only accepts version ids made of lowercase letters,
//! digits and hyphens. Validating here means a bad `staging:Foo_Bar` fails
//! while the command line is parsed instead of halfway through an upload.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{DeployError, Result};

/// Maximum length of a version identifier.
pub const MAX_VERSION_LEN: usize = 100;

/// Prefix reserved by the platform for its own versions.
const RESERVED_PREFIX: &str = "ah-";

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").expect("VERSION_REGEX must compile")
});

/// A validated version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Validate and wrap a version string.
    ///
    /// # Example
    ///
    /// ```
    /// use gaedeploy::target::VersionId;
    ///
    /// let version = VersionId::parse("1-908ca6a").unwrap();
    /// assert_eq!(version.as_str(), "1-908ca6a");
    /// assert!(VersionId::parse("Not_Valid").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| DeployError::InvalidVersion {
            version: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if raw.len() > MAX_VERSION_LEN {
            return Err(invalid(&format!(
                "must be at most {} characters",
                MAX_VERSION_LEN
            )));
        }
        if raw.starts_with(RESERVED_PREFIX) {
            return Err(invalid("the 'ah-' prefix is reserved"));
        }
        if !VERSION_REGEX.is_match(raw) {
            return Err(invalid(
                "only lowercase letters, digits and inner hyphens are allowed",
            ));
        }

        Ok(Self(raw.to_string()))
    }

    /// The version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append a suffix (e.g. a git revision) with a hyphen separator.
    pub fn tagged(&self, suffix: &str) -> Result<Self> {
        Self::parse(&format!("{}-{}", self.0, suffix))
    }
}

impl FromStr for VersionId {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
