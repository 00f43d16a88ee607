//! Settings file discovery and loading.
//!
//! This module handles finding and loading settings files from
//! various locations in the correct priority order.

use crate::config::merger::merge_layers;
use crate::config::settings::Settings;
use crate::error::{DeployError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Project settings file name.
pub const SETTINGS_FILE: &str = ".gaedeploy.yml";

/// Uncommitted per-checkout overrides.
pub const LOCAL_SETTINGS_FILE: &str = ".gaedeploy.local.yml";

/// Paths to settings files in priority order (later overrides earlier).
///
/// Merge order:
/// 1. User global settings (`~/.gaedeploy/config.yml`)
/// 2. Project settings (`.gaedeploy.yml`)
/// 3. Local overrides (`.gaedeploy.local.yml`)
#[derive(Debug, Clone)]
pub struct SettingsPaths {
    /// User's global settings: ~/.gaedeploy/config.yml
    pub user_global: Option<PathBuf>,

    /// Project settings: .gaedeploy.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .gaedeploy.local.yml
    pub project_local: Option<PathBuf>,
}

impl SettingsPaths {
    /// Discover settings files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            user_global: dirs::home_dir()
                .map(|home| home.join(".gaedeploy").join("config.yml"))
                .filter(|p| p.exists()),
            project: existing(project_root.join(SETTINGS_FILE)),
            project_local: existing(project_root.join(LOCAL_SETTINGS_FILE)),
        }
    }

    /// Returns all existing settings paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.project_local]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Find the project root by walking up from `start`.
///
/// The first directory containing `app.yaml` wins.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(super::APP_YAML).is_file() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load a settings file as a raw YAML value (for merging).
pub fn load_settings_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path)?;

    serde_yaml::from_str(&content).map_err(|e| DeployError::SettingsParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and merge all settings files for a project.
///
/// Missing files are fine; a project with none gets [`Settings::default`].
pub fn load_merged_settings(project_root: &Path) -> Result<Settings> {
    let paths = SettingsPaths::discover(project_root);

    let mut layers = Vec::new();
    for path in paths.all_existing() {
        tracing::debug!("Loading settings from {}", path.display());
        layers.push(load_settings_value(path)?);
    }

    serde_yaml::from_value(merge_layers(&layers)).map_err(|e| DeployError::SettingsParse {
        path: project_root.join(SETTINGS_FILE),
        message: e.to_string(),
    })
}

/// Load settings with optional path override.
///
/// If `settings_override` is provided, loads only that file without merging.
/// Otherwise, discovers and merges all settings files.
pub fn load_settings(project_root: &Path, settings_override: Option<&Path>) -> Result<Settings> {
    match settings_override {
        Some(path) => {
            let value = load_settings_value(path)?;
            serde_yaml::from_value(merge_layers(&[value])).map_err(|e| {
                DeployError::SettingsParse {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })
        }
        None => load_merged_settings(project_root),
    }
}
