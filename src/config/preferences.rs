//! Persisted user preferences (`config.json`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

use super::{config_root_dir, APP_DIR};
use crate::document::write_atomic;
use crate::error::PreferencesError;

pub const DEFAULT_MAX_BACKUPS: usize = 5;

/// Return the default preferences path (`~/.config/zakaranda/config.json`).
pub fn default_preferences_path() -> Option<PathBuf> {
    config_root_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Full name of the most recently applied theme.
    pub last_theme: Option<String>,
    /// Target names chosen in the last apply batch.
    pub enabled_apps: Vec<String>,
    pub auto_backup: bool,
    pub max_backups: usize,
    /// Directory scanned for custom theme files. `None` means
    /// `<config root>/zakaranda/themes`.
    pub custom_themes_path: Option<PathBuf>,
    pub preferences: BTreeMap<String, String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_theme: None,
            enabled_apps: Vec::new(),
            auto_backup: true,
            max_backups: DEFAULT_MAX_BACKUPS,
            custom_themes_path: None,
            preferences: BTreeMap::new(),
        }
    }
}

impl Preferences {
    /// Load preferences from `path`, writing the defaults first if the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let defaults = Self::default();
        // create_new avoids clobbering a file another process just wrote.
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                file.write_all(defaults.to_json()?.as_bytes())?;
                debug!(path = %path.display(), "created default preferences");
                return Ok(defaults);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(PreferencesError::Io(e)),
        }

        let text = std::fs::read_to_string(path)?;
        if text.trim().is_empty() {
            return Ok(defaults);
        }
        let prefs: Self = serde_json::from_str(&text)?;
        prefs.validate()?;
        Ok(prefs)
    }

    /// Rewrite the preferences file as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        self.validate()?;
        write_atomic(path, self.to_json()?.as_bytes())?;
        Ok(())
    }

    /// Resolved custom theme directory.
    pub fn themes_dir(&self, config_root: &Path) -> PathBuf {
        self.custom_themes_path
            .clone()
            .unwrap_or_else(|| config_root.join(APP_DIR).join("themes"))
    }

    /// Record the outcome of an apply batch.
    pub fn remember(&mut self, theme: &str, targets: &[String]) {
        self.last_theme = Some(theme.to_string());
        self.enabled_apps = targets.to_vec();
    }

    fn validate(&self) -> Result<(), PreferencesError> {
        if self.max_backups == 0 {
            return Err(PreferencesError::Invalid(
                "`max_backups` must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_json(&self) -> Result<String, PreferencesError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

/// Remove timestamped `<name>.backup.<stamp>` leftovers in `dir`, keeping the
/// `max` newest per original file. Returns how many files were removed.
///
/// The plain `<name>.backup` written by the document engine is never touched.
pub fn clean_old_backups(dir: &Path, max: usize) -> Result<usize, PreferencesError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut groups: BTreeMap<String, Vec<(SystemTime, PathBuf)>> = BTreeMap::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let Some((original, stamp)) = name.split_once(".backup.") else {
            continue;
        };
        if stamp.is_empty() || !entry.file_type()?.is_file() {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        groups
            .entry(original.to_string())
            .or_default()
            .push((modified, entry.path()));
    }

    let mut removed = 0;
    for (_, mut backups) in groups {
        // Newest first; ties broken by name so stamps sort deterministically.
        backups.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        for (_, path) in backups.into_iter().skip(max) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove old backup"),
            }
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn load_or_create_writes_defaults_once() {
        let tmp = TestTempDir::new("prefs-create");
        let path = tmp.child("zakaranda/config.json");

        let prefs = Preferences::load_or_create(&path).unwrap();
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.auto_backup);
        assert_eq!(prefs.max_backups, 5);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"auto_backup\": true"));
    }

    #[test]
    fn existing_file_is_loaded_with_defaults_for_missing_fields() {
        let tmp = TestTempDir::new("prefs-load");
        let path = tmp.write_text("config.json", r#"{"last_theme": "Nord"}"#);
        let prefs = Preferences::load_or_create(&path).unwrap();
        assert_eq!(prefs.last_theme.as_deref(), Some("Nord"));
        assert_eq!(prefs.max_backups, DEFAULT_MAX_BACKUPS);
        assert!(prefs.enabled_apps.is_empty());
    }

    #[test]
    fn save_round_trips_remembered_selection() {
        let tmp = TestTempDir::new("prefs-save");
        let path = tmp.child("config.json");
        let mut prefs = Preferences::default();
        prefs.remember("Rose Pine Moon", &["Zed".to_string(), "Warp".to_string()]);
        prefs.save(&path).unwrap();

        let loaded = Preferences::load_or_create(&path).unwrap();
        assert_eq!(loaded.last_theme.as_deref(), Some("Rose Pine Moon"));
        assert_eq!(loaded.enabled_apps, vec!["Zed", "Warp"]);
    }

    #[test]
    fn zero_max_backups_is_rejected() {
        let tmp = TestTempDir::new("prefs-invalid");
        let path = tmp.write_text("config.json", r#"{"max_backups": 0}"#);
        let err = Preferences::load_or_create(&path).unwrap_err();
        assert!(matches!(err, PreferencesError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_reported() {
        let tmp = TestTempDir::new("prefs-bad");
        let path = tmp.write_text("config.json", "{ nope");
        assert!(matches!(
            Preferences::load_or_create(&path),
            Err(PreferencesError::Json(_))
        ));
    }

    #[test]
    fn themes_dir_defaults_under_config_root() {
        let prefs = Preferences::default();
        assert_eq!(
            prefs.themes_dir(Path::new("/cfg")),
            PathBuf::from("/cfg/zakaranda/themes")
        );
    }

    #[test]
    fn clean_old_backups_keeps_newest_per_file_and_plain_backup() {
        let tmp = TestTempDir::new("prefs-backups");
        for stamp in ["20240101", "20240102", "20240103"] {
            tmp.write_text(&format!("settings.json.backup.{stamp}"), stamp);
        }
        tmp.write_text("alacritty.toml.backup.1", "x");
        tmp.write_text("settings.json.backup", "keep");
        tmp.write_text("settings.json", "{}");

        let removed = clean_old_backups(tmp.path(), 1).unwrap();
        assert_eq!(removed, 2);
        assert!(tmp.child("settings.json.backup").exists());
        assert!(tmp.child("alacritty.toml.backup.1").exists());
        assert!(tmp.child("settings.json").exists());
    }

    #[test]
    fn clean_old_backups_ignores_missing_dir() {
        let tmp = TestTempDir::new("prefs-missing");
        assert_eq!(clean_old_backups(&tmp.child("absent"), 3).unwrap(), 0);
    }
}
