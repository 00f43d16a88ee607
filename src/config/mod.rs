//! Configuration loading.
//!
//! Two kinds of configuration are read:
//! - The application descriptor `app.yaml` ([`app_yaml`]), owned by the
//!   application and read only for its id and default version
//! - Tool settings ([`settings`]), discovered and merged by [`loader`]
//!
//! # Example
//!
//! ```
//! use gaedeploy::config::{load_merged_settings, parse_app_yaml};
//! use std::path::Path;
//! use tempfile::TempDir;
//!
//! let app = parse_app_yaml("application: key-auth\nversion: 1\n", Path::new("app.yaml")).unwrap();
//! assert_eq!(app.application, "key-auth");
//!
//! let temp = TempDir::new().unwrap();
//! std::fs::write(temp.path().join(".gaedeploy.yml"), "local_shell: ipython").unwrap();
//! let settings = load_merged_settings(temp.path()).unwrap();
//! assert_eq!(settings.local_shell, "ipython");
//! ```
//!
//! # Settings File Locations
//!
//! Settings are discovered and merged in this order:
//! 1. User global settings (`~/.gaedeploy/config.yml`)
//! 2. Project settings (`.gaedeploy.yml`)
//! 3. Local overrides (`.gaedeploy.local.yml`)

pub mod app_yaml;
pub mod loader;
pub mod merger;
pub mod settings;

pub use app_yaml::{
    load_app_yaml, parse_app_yaml, AppDescriptor, AppDescriptorSource, AppYamlFile, APP_YAML,
};
pub use loader::{
    find_project_root, load_merged_settings, load_settings, load_settings_value, SettingsPaths,
    LOCAL_SETTINGS_FILE, SETTINGS_FILE,
};
pub use merger::{deep_merge, merge_layers};
pub use settings::{Settings, TestSettings};
