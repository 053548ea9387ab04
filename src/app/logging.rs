//! File-backed tracing setup.
//!
//! The TUI owns stderr, so log lines go to a file. Failing to open the file
//! leaves logging disabled; it never blocks startup.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use zakaranda::config::APP_DIR;

/// Environment variable holding the tracing filter directive.
pub(crate) const LOG_ENV: &str = "ZAKARANDA_LOG";
const DEFAULT_FILTER: &str = "info";

pub(crate) fn default_log_path(config_root: &Path) -> PathBuf {
    config_root.join(APP_DIR).join("zakaranda.log")
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `path`. Returns whether logging
/// is active.
pub(crate) fn init(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let installed = tracing_subscriber::registry()
        .with(filter())
        .with(file_layer)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(path = %path.display(), version = zakaranda::build_info::VERSION, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_lives_under_app_dir() {
        let path = default_log_path(Path::new("/home/u/.config"));
        assert_eq!(path, PathBuf::from("/home/u/.config/zakaranda/zakaranda.log"));
    }

    #[test]
    fn unwritable_location_disables_logging() {
        let blocker = std::env::temp_dir().join(format!("zakaranda-log-blocker-{}", std::process::id()));
        fs::write(&blocker, "file, not a directory").unwrap();
        assert!(!init(&blocker.join("nested").join("z.log")));
        let _ = fs::remove_file(&blocker);
    }
}
