//! Optional upload credentials.
//!
//! A credentials file holds two lines: the account email, then the password.
//! The project root is searched first, then the home directory. Files that
//! cannot be read or do not have exactly two non-empty lines are skipped.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Account credentials read from disk.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    /// File the credentials were read from.
    pub source: PathBuf,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

/// Candidate locations for the credentials file, in lookup order.
pub fn credential_paths(project_root: &Path, file_name: &str) -> Vec<PathBuf> {
    let mut paths = vec![project_root.join(file_name)];
    if let Some(home) = dirs::home_dir() {
        let in_home = home.join(file_name);
        if !paths.contains(&in_home) {
            paths.push(in_home);
        }
    }
    paths
}

/// Find the first usable credentials file.
pub fn find_credentials(project_root: &Path, file_name: &str) -> Option<Credentials> {
    credential_paths(project_root, file_name)
        .into_iter()
        .filter(|p| p.is_file())
        .find_map(|p| match read_credentials(&p) {
            Some(creds) => Some(creds),
            None => {
                tracing::warn!("Ignoring malformed credentials file {}", p.display());
                None
            }
        })
}

/// Read one credentials file.
pub fn read_credentials(path: &Path) -> Option<Credentials> {
    let content = fs::read_to_string(path).ok()?;
    parse_credentials(&content, path)
}

fn parse_credentials(content: &str, source: &Path) -> Option<Credentials> {
    let lines: Vec<&str> = content.trim().lines().map(str::trim).collect();
    match lines.as_slice() {
        [user, pass] if !user.is_empty() && !pass.is_empty() => Some(Credentials {
            username: user.to_string(),
            password: pass.to_string(),
            source: source.to_path_buf(),
        }),
        _ => None,
    }
}
