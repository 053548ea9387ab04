//! Alacritty terminal.
//!
//! TOML configs reference the official theme file from the
//! `alacritty-theme` repository when it is available; otherwise (and always
//! for legacy YAML configs) the `colors` section is written inline.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

use super::{AdapterEnv, Applied, Integration};
use crate::config::HostPaths;
use crate::doc_map;
use crate::document::{Document, Format, Map, Value};
use crate::error::ApplyError;
use crate::theme::{Palette, Slot, Theme};
use crate::tools::git::ensure_shallow_clone;
use crate::tools::CommandRunner;

pub const THEME_REPO_URL: &str = "https://github.com/alacritty/alacritty-theme";

/// File name of the official theme in the `alacritty-theme` repository.
pub fn official_asset(theme_name: &str) -> Option<&'static str> {
    match theme_name {
        "Nord" => Some("nord.toml"),
        "Catppuccin Latte" => Some("catppuccin_latte.toml"),
        "Catppuccin Frappe" => Some("catppuccin_frappe.toml"),
        "Catppuccin Macchiato" => Some("catppuccin_macchiato.toml"),
        "Catppuccin Mocha" => Some("catppuccin_mocha.toml"),
        "Rose Pine" => Some("rose_pine.toml"),
        "Rose Pine Moon" => Some("rose_pine_moon.toml"),
        "Rose Pine Dawn" => Some("rose_pine_dawn.toml"),
        _ => None,
    }
}

/// The `colors` section for a palette.
pub fn inline_colors(p: &Palette) -> Map {
    let ansi = |slots: [Slot; 8]| -> Map {
        slots
            .iter()
            .map(|&slot| (slot.ansi_name().to_string(), Value::from(p.hex(slot))))
            .collect()
    };
    doc_map! {
        "primary" => doc_map! {
            "background" => p.hex(Slot::Background),
            "foreground" => p.hex(Slot::Foreground),
        },
        "cursor" => doc_map! {
            "text" => p.hex(Slot::Background),
            "cursor" => p.hex(Slot::Foreground),
        },
        "normal" => ansi(Slot::NORMAL),
        "bright" => ansi(Slot::BRIGHT),
        "selection" => doc_map! {
            "text" => p.hex(Slot::Foreground),
            "background" => p.hex(Slot::BrightBlack),
        },
    }
}

pub struct AlacrittyIntegration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
}

impl AlacrittyIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
        }
    }

    fn config_dir(&self) -> PathBuf {
        self.paths.config_root.join("alacritty")
    }

    /// Checkout of the `alacritty-theme` repository.
    fn theme_repo(&self) -> PathBuf {
        self.config_dir().join("themes").join("alacritty")
    }

    /// `alacritty.toml` if present, else a legacy `alacritty.yml` if present,
    /// else a new `alacritty.toml`.
    fn config_file(&self) -> (PathBuf, Format) {
        let dir = self.config_dir();
        let toml = dir.join("alacritty.toml");
        if toml.exists() {
            return (toml, Format::Toml);
        }
        let yaml = dir.join("alacritty.yml");
        if yaml.exists() {
            return (yaml, Format::Yaml);
        }
        (toml, Format::Toml)
    }

    /// Official theme file on disk, fetching the repository on first use.
    async fn resolve_asset(&self, file: &str, notes: &mut Vec<String>) -> Option<PathBuf> {
        let repo = self.theme_repo();
        if let Err(e) = ensure_shallow_clone(self.runner.as_ref(), THEME_REPO_URL, &repo).await {
            warn!(error = %e, "alacritty-theme unavailable, writing inline colors");
            notes.push(format!(
                "Could not fetch alacritty-theme ({e}); colors were written inline.\nClone {THEME_REPO_URL} into {} to use the official theme.",
                self.paths.display(&repo)
            ));
            return None;
        }
        let asset = repo.join("themes").join(file);
        asset.exists().then_some(asset)
    }
}

/// `~` and `~/...` resolved against `home`; other paths unchanged.
fn expand_home(raw: &str, home: &Path) -> PathBuf {
    match raw.strip_prefix('~') {
        Some("") => home.to_path_buf(),
        Some(rest) if rest.starts_with('/') => home.join(rest.trim_start_matches('/')),
        _ => PathBuf::from(raw),
    }
}

/// Existing imports that do not point into `repo`.
fn foreign_imports(doc: &Document, repo: &Path, home: &Path) -> Vec<Value> {
    match doc.get_path(&["general", "import"]) {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| {
                !item
                    .as_str()
                    .is_some_and(|s| expand_home(s, home).starts_with(repo))
            })
            .cloned()
            .collect(),
        _ => Vec::new(),
    }
}

#[async_trait]
impl Integration for AlacrittyIntegration {
    fn name(&self) -> &str {
        "Alacritty"
    }

    fn is_installed(&self) -> bool {
        self.config_dir().is_dir()
    }

    fn config_location(&self) -> String {
        self.paths.display(&self.config_file().0)
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let (path, format) = self.config_file();
        let mut notes = Vec::new();

        let mut doc = Document::open(&path, format)?;
        let asset = match (format, official_asset(theme.name())) {
            (Format::Toml, Some(file)) => self.resolve_asset(file, &mut notes).await,
            _ => None,
        };

        let repo = self.theme_repo();
        let mut imports = foreign_imports(&doc, &repo, &self.paths.home);

        match asset {
            Some(asset) => {
                imports.push(Value::from(asset.display().to_string()));
                doc.replace_path(&["general", "import"], imports);
                doc.remove("colors");
            }
            None => {
                if imports.is_empty() {
                    doc.remove_path(&["general", "import"]);
                    doc.remove_if_empty("general");
                } else {
                    doc.replace_path(&["general", "import"], imports);
                }
                doc.replace_section("colors", inline_colors(theme.palette()));
            }
        }

        doc.save()?;
        Ok(Applied::with_notes(notes))
    }
}
