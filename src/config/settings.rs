//! Tool settings schema.
//!
//! Maps to `.gaedeploy.yml`. Every field has a default, so a project
//! without a settings file works out of the box.

use serde::{Deserialize, Serialize};

/// Default upload tool.
pub const DEFAULT_APPCFG: &str = "appcfg.py";

/// Default remote shell tool.
pub const DEFAULT_REMOTE_SHELL: &str = "remote_api_shell.py";

/// Default local shell.
pub const DEFAULT_LOCAL_SHELL: &str = "python";

/// Where the remote API handler lives when the builtin is enabled in `app.yaml`.
pub const DEFAULT_REMOTE_API_PATH: &str = "/_ah/remote_api";

/// Optional credentials file name, looked up in the project root and `$HOME`.
pub const DEFAULT_CREDENTIALS_FILE: &str = ".remote_api_creds";

/// Root settings structure for `.gaedeploy.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upload tool invoked by `deploy`.
    pub appcfg: String,

    /// Tool invoked by `shell` on a remote target.
    pub remote_shell: String,

    /// Tool invoked by `shell` without a target.
    pub local_shell: String,

    /// Path of the remote API handler.
    pub remote_api_path: String,

    /// Name of the credentials file.
    pub credentials_file: String,

    /// Settings for the `test` task.
    pub test: TestSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            appcfg: DEFAULT_APPCFG.to_string(),
            remote_shell: DEFAULT_REMOTE_SHELL.to_string(),
            local_shell: DEFAULT_LOCAL_SHELL.to_string(),
            remote_api_path: DEFAULT_REMOTE_API_PATH.to_string(),
            credentials_file: DEFAULT_CREDENTIALS_FILE.to_string(),
            test: TestSettings::default(),
        }
    }
}

/// Settings for the `test` task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSettings {
    /// Modules whose `<module>.tests` are run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,

    /// Test runner command; the test module name is appended.
    pub runner: String,

    /// Runner used when coverage is requested.
    pub coverage_runner: String,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            modules: Vec::new(),
            runner: "python -m unittest".to_string(),
            coverage_runner: "coverage run -m unittest".to_string(),
        }
    }
}
