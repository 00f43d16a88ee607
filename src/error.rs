//! Error types for gaedeploy operations.
//!
//! This module defines [`DeployError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Parse and validation errors are raised before any external command runs
//! - Failures of external tools surface as [`DeployError::CommandFailed`]
//!   with the tool's own output left on the terminal
//! - Use `anyhow::Error` (via `DeployError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for gaedeploy operations.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The application descriptor (`app.yaml`) does not exist.
    #[error("Application config not found: {path}")]
    AppConfigNotFound { path: PathBuf },

    /// The application descriptor could not be parsed or lacks a field.
    #[error("Failed to parse application config at {path}: {message}")]
    AppConfigParse { path: PathBuf, message: String },

    /// A tool settings file could not be parsed.
    #[error("Failed to parse settings at {path}: {message}")]
    SettingsParse { path: PathBuf, message: String },

    /// A version identifier is not acceptable to the platform.
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// No task with this name exists.
    #[error("Unknown task: {name}")]
    UnknownTask { name: String },

    /// A task was given arguments it does not accept.
    #[error("Invalid arguments for task '{task}': {message}")]
    InvalidTask { task: String, message: String },

    /// More than one deployment target selector was given.
    #[error("Conflicting deployment targets: '{first}' was already selected, got '{second}'")]
    ConflictingTargets { first: String, second: String },

    /// The task acts on a remote deployment but none was selected.
    #[error("A deployment target must be specified for '{task}' (e.g. `production {task}`)")]
    TargetRequired { task: String },

    /// External command failed.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for gaedeploy operations.
pub type Result<T> = std::result::Result<T, DeployError>;
