//! Host paths and persisted user preferences.
//!
//! Paths are resolved once at startup into a [`HostPaths`] value that every
//! adapter receives, so tests can root the whole system in a temp directory.
//! Preferences live at `$XDG_CONFIG_HOME/zakaranda/config.json`
//! (or `~/.config/zakaranda/config.json`).

mod paths;
mod preferences;

pub use paths::{config_root_dir, config_root_dir_from, HostPaths, Platform};
pub use preferences::{
    clean_old_backups, default_preferences_path, Preferences, DEFAULT_MAX_BACKUPS,
};

/// Directory name under the config root owned by this tool.
pub const APP_DIR: &str = "zakaranda";
