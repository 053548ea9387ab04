//! Startup and shutdown helpers: preferences, backup pruning, catalog
//! assembly, and recording the last apply.

use crossterm::style::{Color, Stylize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use zakaranda::config::{clean_old_backups, Preferences, APP_DIR};
use zakaranda::controller::Controller;
use zakaranda::theme::loader::load_custom_themes;
use zakaranda::theme::Catalog;

/// Print a one-line warning on stderr before the TUI takes over.
pub(crate) fn print_warning(color: bool, message: &str) {
    if color {
        eprintln!("{} {message}", "warning:".with(Color::Yellow).bold());
    } else {
        eprintln!("warning: {message}");
    }
}

pub(crate) fn print_error(color: bool, message: &str) {
    if color {
        eprintln!("{} {message}", "error:".with(Color::Red).bold());
    } else {
        eprintln!("error: {message}");
    }
}

/// Load preferences, falling back to defaults when the file is unusable.
pub(crate) fn load_preferences(path: &Path, color: bool) -> Preferences {
    match Preferences::load_or_create(path) {
        Ok(prefs) => prefs,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "using default preferences");
            print_warning(color, &format!("ignoring {}: {e}", path.display()));
            Preferences::default()
        }
    }
}

/// Prune timestamped backups under `<config root>/zakaranda/backups` and
/// each of its per-app subdirectories. Returns the number removed.
pub(crate) fn prune_backups(prefs: &Preferences, config_root: &Path) -> usize {
    if !prefs.auto_backup {
        return 0;
    }
    let root = config_root.join(APP_DIR).join("backups");
    let mut dirs = vec![root.clone()];
    if let Ok(entries) = fs::read_dir(&root) {
        let mut subdirs: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        subdirs.sort();
        dirs.extend(subdirs);
    }

    let mut removed = 0;
    for dir in dirs {
        match clean_old_backups(&dir, prefs.max_backups) {
            Ok(n) => removed += n,
            Err(e) => warn!(dir = %dir.display(), error = %e, "backup cleanup failed"),
        }
    }
    if removed > 0 {
        info!(removed, "pruned old backups");
    }
    removed
}

/// Built-in families plus custom themes from `override_dir` or the
/// preferences' theme directory.
pub(crate) fn build_catalog(
    prefs: &Preferences,
    config_root: &Path,
    override_dir: Option<&Path>,
) -> Catalog {
    let dir = override_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| prefs.themes_dir(config_root));
    let mut catalog = Catalog::builtin();
    let custom = load_custom_themes(&dir);
    debug!(dir = %dir.display(), count = custom.len(), "custom themes");
    catalog.extend_custom(custom);
    catalog
}

/// Persist the theme and targets of a finished non-empty batch.
pub(crate) fn remember_apply(
    prefs: &mut Preferences,
    path: &Path,
    controller: &Controller,
) -> bool {
    let Some(report) = controller.report().filter(|r| !r.is_empty()) else {
        return false;
    };
    prefs.remember(&report.theme, &controller.chosen_target_names());
    match prefs.save(path) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not save preferences");
            false
        }
    }
}
