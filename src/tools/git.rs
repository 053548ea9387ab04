//! One-time shallow clones of theme asset repositories.

use std::path::Path;
use tracing::info;

use super::{ensure_success, CommandRunner};
use crate::error::ToolError;

/// What [`ensure_shallow_clone`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneStatus {
    /// `dest` already existed; no network access happened.
    AlreadyPresent,
    Cloned,
}

/// Clone `url` into `dest` with `--depth 1 --single-branch`, unless `dest`
/// already exists.
pub async fn ensure_shallow_clone(
    runner: &dyn CommandRunner,
    url: &str,
    dest: &Path,
) -> Result<CloneStatus, ToolError> {
    if dest.exists() {
        return Ok(CloneStatus::AlreadyPresent);
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ToolError::Spawn {
            program: "git".into(),
            message: format!("failed to create {}: {e}", parent.display()),
        })?;
    }

    info!(url, dest = %dest.display(), "cloning theme assets");
    let args = vec![
        "clone".to_string(),
        "--depth".to_string(),
        "1".to_string(),
        "--single-branch".to_string(),
        url.to_string(),
        dest.display().to_string(),
    ];
    let output = runner.run("git", &args, None).await?;
    ensure_success(output, &format!("git clone {url}"))?;
    Ok(CloneStatus::Cloned)
}
