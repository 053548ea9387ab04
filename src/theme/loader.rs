//! User-supplied theme documents (JSON, YAML, TOML) and theme export.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Theme;
use crate::error::ThemeError;

/// Serialization format for a theme document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeFormat {
    Json,
    Yaml,
    Toml,
}

impl ThemeFormat {
    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

/// Load every supported theme file directly under `dir`.
///
/// A missing directory yields no themes. Files that fail to parse are logged
/// and skipped so one bad document never hides the rest.
pub fn load_custom_themes(dir: &Path) -> Vec<Theme> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not list custom themes");
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && ThemeFormat::from_path(path).is_some())
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| match load_theme_file(&path) {
            Ok(theme) => {
                debug!(path = %path.display(), theme = theme.name(), "loaded custom theme");
                Some(theme)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping custom theme");
                None
            }
        })
        .collect()
}

/// Parse one theme document, choosing the decoder from its extension.
pub fn load_theme_file(path: &Path) -> Result<Theme, ThemeError> {
    let format =
        ThemeFormat::from_path(path).ok_or_else(|| ThemeError::UnsupportedFormat(path.into()))?;
    let text = fs::read_to_string(path)?;
    let parse_err = |message: String| ThemeError::Parse {
        path: path.to_path_buf(),
        message,
    };
    match format {
        ThemeFormat::Json => serde_json::from_str(&text).map_err(|e| parse_err(e.to_string())),
        ThemeFormat::Yaml => serde_yaml::from_str(&text).map_err(|e| parse_err(e.to_string())),
        ThemeFormat::Toml => toml::from_str(&text).map_err(|e| parse_err(e.to_string())),
    }
}

/// Render a theme in the given format.
pub fn render_theme(theme: &Theme, format: ThemeFormat) -> Result<String, ThemeError> {
    let invalid = |message: String| ThemeError::Parse {
        path: PathBuf::from(theme.name()),
        message,
    };
    match format {
        ThemeFormat::Json => serde_json::to_string_pretty(theme)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(|e| invalid(e.to_string())),
        ThemeFormat::Yaml => serde_yaml::to_string(theme).map_err(|e| invalid(e.to_string())),
        ThemeFormat::Toml => toml::to_string_pretty(theme).map_err(|e| invalid(e.to_string())),
    }
}

/// Save a theme into the custom theme directory as `<sanitized>.<ext>`.
pub fn save_custom_theme(
    theme: &Theme,
    dir: &Path,
    format: ThemeFormat,
) -> Result<PathBuf, ThemeError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", theme.file_stem(), format.extension()));
    fs::write(&path, render_theme(theme, format)?)?;
    Ok(path)
}

/// Export a theme to an arbitrary path; the extension picks the format.
pub fn export_theme(theme: &Theme, path: &Path) -> Result<(), ThemeError> {
    let format =
        ThemeFormat::from_path(path).ok_or_else(|| ThemeError::UnsupportedFormat(path.into()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_theme(theme, format)?)?;
    Ok(())
}
