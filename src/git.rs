//! Git helpers used by `deploy`.

use std::fs;
use std::path::Path;

use crate::error::{DeployError, Result};
use crate::shell::{quote, CommandOptions, ProcessRunner};

/// Command printing the abbreviated HEAD revision.
pub const SHORT_REVISION: &str = "git rev-parse --short HEAD";

/// Command checking out submodules inside a fresh clone.
pub const SUBMODULE_UPDATE: &str = "git submodule update --init --recursive";

/// Abbreviated revision of `HEAD` in `repo`.
pub fn short_revision(runner: &dyn ProcessRunner, repo: &Path) -> Result<String> {
    let result = runner
        .run(SHORT_REVISION, &CommandOptions::captured(repo))?
        .check(SHORT_REVISION)?;

    let revision = result.stdout.trim();
    if revision.is_empty() {
        return Err(DeployError::Other(anyhow::anyhow!(
            "`{}` printed nothing in {}",
            SHORT_REVISION,
            repo.display()
        )));
    }
    Ok(revision.to_string())
}

/// `git clone` command line copying `src` into `dst`.
pub fn clone_command(src: &Path, dst: &Path) -> String {
    format!(
        "git clone {} {}",
        quote(&src.to_string_lossy()),
        quote(&dst.to_string_lossy())
    )
}

/// Remove every `.git*` entry below `root` (repository data, `.gitignore`,
/// `.gitmodules` and submodule `.git` files alike).
///
/// Returns how many entries were removed.
pub fn strip_git_metadata(root: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if entry.file_name().to_string_lossy().starts_with(".git") {
            if file_type.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed += 1;
        } else if file_type.is_dir() {
            removed += strip_git_metadata(&path)?;
        }
    }

    Ok(removed)
}
