//! Well-known per-platform locations.

use std::path::{Path, PathBuf};

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Other
        }
    }
}

/// Resolve the config root (`$XDG_CONFIG_HOME`, else `~/.config`).
pub fn config_root_dir() -> Option<PathBuf> {
    config_root_dir_from(|name| std::env::var(name).ok(), dirs::home_dir())
}

pub fn config_root_dir_from<F>(env_lookup: F, home: Option<PathBuf>) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = env_lookup("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    home.map(|home| home.join(".config")).or_else(dirs::config_dir)
}

/// Directories adapters read and write under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub platform: Platform,
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME` or `~/.config`.
    pub config_root: PathBuf,
    /// Per-platform application settings root (`~/Library/Application
    /// Support` on macOS, `~/.config` on Linux, `%APPDATA%` on Windows).
    pub app_support: PathBuf,
    /// `$XDG_DATA_HOME` or `~/.local/share`.
    pub data_root: PathBuf,
    /// Application bundle directories (`/Applications`, `~/Applications`).
    pub applications: Vec<PathBuf>,
    /// Bundled assets shipped next to the executable.
    pub assets_dir: PathBuf,
}

impl HostPaths {
    /// Resolve paths for the running user. `None` when no home directory
    /// can be determined.
    pub fn detect() -> Option<Self> {
        let home = dirs::home_dir()?;
        let config_root = config_root_dir()?;
        let app_support = dirs::config_dir().unwrap_or_else(|| config_root.clone());
        let data_root = std::env::var("XDG_DATA_HOME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local").join("share"));
        let assets_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"));
        Some(Self {
            platform: Platform::current(),
            applications: vec![PathBuf::from("/Applications"), home.join("Applications")],
            home,
            config_root,
            app_support,
            data_root,
            assets_dir,
        })
    }

    /// Every location under `root`, laid out like a macOS home directory.
    pub fn rooted_at(root: &Path, platform: Platform) -> Self {
        Self {
            platform,
            home: root.to_path_buf(),
            config_root: root.join(".config"),
            app_support: root.join("Library").join("Application Support"),
            data_root: root.join(".local").join("share"),
            applications: vec![root.join("Applications")],
            assets_dir: root.join("assets"),
        }
    }

    /// First existing `<applications>/<bundle>`.
    pub fn find_app_bundle(&self, bundle: &str) -> Option<PathBuf> {
        self.applications
            .iter()
            .map(|dir| dir.join(bundle))
            .find(|path| path.exists())
    }

    /// Replace a leading home directory with `~` for display.
    pub fn display(&self, path: &Path) -> String {
        match path.strip_prefix(&self.home) {
            Ok(rest) if !rest.as_os_str().is_empty() => format!("~/{}", rest.display()),
            _ => path.display().to_string(),
        }
    }
}
