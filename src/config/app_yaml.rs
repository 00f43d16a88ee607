//! Application descriptor (`app.yaml`) loading.
//!
//! Only the application id and the declared default version are read; every
//! other key in the descriptor belongs to the hosting platform and is ignored.

use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DeployError, Result};

/// File name of the application descriptor in the project root.
pub const APP_YAML: &str = "app.yaml";

/// The parts of `app.yaml` that deployment cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    /// Application id (e.g. `key-auth`).
    pub application: String,

    /// Default version declared by the application.
    pub version: String,
}

#[derive(Deserialize)]
struct RawDescriptor {
    application: String,
    version: serde_yaml::Value,
}

impl AppDescriptor {
    /// Create a descriptor directly.
    pub fn new(application: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            version: version.into(),
        }
    }
}

/// Something that can provide the application descriptor on demand.
///
/// The target resolver only reads the descriptor once a selector needs it,
/// so a plain `shell` never touches `app.yaml`.
pub trait AppDescriptorSource {
    /// Load the descriptor.
    fn descriptor(&self) -> Result<AppDescriptor>;
}

impl AppDescriptorSource for AppDescriptor {
    fn descriptor(&self) -> Result<AppDescriptor> {
        Ok(self.clone())
    }
}

/// `app.yaml` on disk, parsed at most once.
#[derive(Debug)]
pub struct AppYamlFile {
    path: PathBuf,
    loaded: OnceCell<AppDescriptor>,
}

impl AppYamlFile {
    /// Descriptor at `<project_root>/app.yaml`.
    pub fn in_project(project_root: &Path) -> Self {
        Self::at(project_root.join(APP_YAML))
    }

    /// Descriptor at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            loaded: OnceCell::new(),
        }
    }

    /// Path of the descriptor file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AppDescriptorSource for AppYamlFile {
    fn descriptor(&self) -> Result<AppDescriptor> {
        if let Some(d) = self.loaded.get() {
            return Ok(d.clone());
        }
        let d = load_app_yaml(&self.path)?;
        Ok(self.loaded.get_or_init(|| d).clone())
    }
}

/// Load and parse an application descriptor.
///
/// # Errors
///
/// Returns `AppConfigNotFound` if the file doesn't exist.
/// Returns `AppConfigParse` if the YAML is invalid or a field is missing.
pub fn load_app_yaml(path: &Path) -> Result<AppDescriptor> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DeployError::AppConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DeployError::Io(e)
        }
    })?;

    parse_app_yaml(&content, path)
}

/// Parse YAML content into an [`AppDescriptor`].
pub fn parse_app_yaml(content: &str, source_path: &Path) -> Result<AppDescriptor> {
    let parse_error = |message: String| DeployError::AppConfigParse {
        path: source_path.to_path_buf(),
        message,
    };

    let raw: RawDescriptor =
        serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

    let version = match raw.version {
        serde_yaml::Value::String(s) => s,
        // `version: 0x1a` must stay `0x1a`, not become `26`.
        serde_yaml::Value::Number(_) => declared_scalar(content, "version").ok_or_else(|| {
            parse_error("`version` could not be read as written; quote it".to_string())
        })?,
        other => {
            return Err(parse_error(format!(
                "`version` must be a string or number, found {:?}",
                other
            )))
        }
    };

    let descriptor = AppDescriptor {
        application: raw.application,
        version,
    };

    if descriptor.application.trim().is_empty() {
        return Err(DeployError::AppConfigParse {
            path: source_path.to_path_buf(),
            message: "`application` must not be empty".to_string(),
        });
    }

    tracing::debug!(
        "Loaded {} (application={}, version={})",
        source_path.display(),
        descriptor.application,
        descriptor.version
    );

    Ok(descriptor)
}

/// Source text of a top-level scalar, before any YAML type resolution.
fn declared_scalar(content: &str, key: &str) -> Option<String> {
    let node = marked_yaml::parse_yaml(0, content).ok()?;
    let scalar = node.as_mapping()?.get_scalar(key)?;
    Some(scalar.as_str().to_string())
}
