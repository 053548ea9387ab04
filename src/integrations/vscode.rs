//! VS Code family (VS Code, VS Code Insiders, Cursor).
//!
//! Several channels can be installed side by side; the controller picks one
//! through [`Integration::select_variant`] before apply. Channel detection is
//! a pure scan ([`scan_channels`]) memoized in a [`ChannelCache`] owned by
//! the adapter.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::{AdapterEnv, Applied, Integration, TargetVariant};
use crate::config::HostPaths;
use crate::doc_map;
use crate::document::{Document, Format, Map};
use crate::error::{ApplyError, ToolError};
use crate::theme::{Palette, Slot, Theme};
use crate::tools::{ensure_success, CommandRunner};

const SETTINGS_KEYS: [&str; 3] = [
    "workbench.colorTheme",
    "workbench.iconTheme",
    "workbench.productIconTheme",
];
const CUSTOMIZATIONS_KEY: &str = "workbench.colorCustomizations";

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// One editor distribution sharing the VS Code settings layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pub name: &'static str,
    /// Directory under the platform application-support root.
    pub config_dir: &'static str,
    pub cli: &'static str,
    pub app_bundle: &'static str,
}

pub static CHANNELS: [Channel; 3] = [
    Channel {
        name: "VS Code",
        config_dir: "Code",
        cli: "code",
        app_bundle: "Visual Studio Code.app",
    },
    Channel {
        name: "VS Code Insiders",
        config_dir: "Code - Insiders",
        cli: "code-insiders",
        app_bundle: "Visual Studio Code - Insiders.app",
    },
    Channel {
        name: "Cursor",
        config_dir: "Cursor",
        cli: "cursor",
        app_bundle: "Cursor.app",
    },
];

impl Channel {
    pub fn config_root(&self, paths: &HostPaths) -> PathBuf {
        paths.app_support.join(self.config_dir)
    }

    pub fn settings_path(&self, paths: &HostPaths) -> PathBuf {
        self.config_root(paths).join("User").join("settings.json")
    }

    /// Present when its settings directory or application bundle exists.
    pub fn is_present(&self, paths: &HostPaths) -> bool {
        self.config_root(paths).exists() || paths.find_app_bundle(self.app_bundle).is_some()
    }
}

/// Indices of the `candidates` for which `present` holds, in order.
pub fn scan_channels(candidates: &[Channel], present: impl Fn(&Channel) -> bool) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, channel)| present(channel))
        .map(|(i, _)| i)
        .collect()
}

/// Memoized channel scan. Clones share the same memo.
#[derive(Debug, Clone, Default)]
pub struct ChannelCache {
    scanned: Arc<Mutex<Option<Vec<usize>>>>,
}

impl ChannelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result, running `scan` on first use.
    pub fn get_or_scan(&self, scan: impl FnOnce() -> Vec<usize>) -> Vec<usize> {
        let mut slot = match self.scanned.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        slot.get_or_insert_with(scan).clone()
    }

    /// Forget the cached scan so the next lookup rescans.
    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.scanned.lock() {
            *slot = None;
        }
    }
}

// ---------------------------------------------------------------------------
// Official extensions
// ---------------------------------------------------------------------------

/// Marketplace theme that replaces synthesized colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficialTheme {
    pub extension: &'static str,
    pub color_theme: &'static str,
    pub icon_theme: &'static str,
    pub product_icon_theme: &'static str,
}

const fn official(
    extension: &'static str,
    color_theme: &'static str,
    icon_theme: &'static str,
    product_icon_theme: &'static str,
) -> OfficialTheme {
    OfficialTheme {
        extension,
        color_theme,
        icon_theme,
        product_icon_theme,
    }
}

pub fn official_theme(theme_name: &str) -> Option<OfficialTheme> {
    const CATPPUCCIN: &str = "catppuccin.catppuccin-vsc";
    const ROSE_PINE: &str = "mvllow.rose-pine";
    let found = match theme_name {
        "Nord" => official(
            "arcticicestudio.nord-visual-studio-code",
            "Nord",
            "charmed-light",
            "fluent-icons",
        ),
        "Catppuccin Latte" => official(
            CATPPUCCIN,
            "Catppuccin Latte",
            "catppuccin-latte",
            "catppuccin-latte",
        ),
        "Catppuccin Frappe" => official(
            CATPPUCCIN,
            "Catppuccin Frappé",
            "catppuccin-frappe",
            "catppuccin-frappe",
        ),
        "Catppuccin Macchiato" => official(
            CATPPUCCIN,
            "Catppuccin Macchiato",
            "catppuccin-macchiato",
            "catppuccin-macchiato",
        ),
        "Catppuccin Mocha" => official(
            CATPPUCCIN,
            "Catppuccin Mocha",
            "catppuccin-mocha",
            "catppuccin-mocha",
        ),
        "Rose Pine" => official(ROSE_PINE, "Rosé Pine", "rose-pine-icons", "fluent-icons"),
        "Rose Pine Moon" => official(
            ROSE_PINE,
            "Rosé Pine Moon",
            "rose-pine-moon-icons",
            "fluent-icons",
        ),
        "Rose Pine Dawn" => official(
            ROSE_PINE,
            "Rosé Pine Dawn",
            "rose-pine-dawn-icons",
            "fluent-icons",
        ),
        _ => return None,
    };
    Some(found)
}

/// Extension providing an icon or product-icon theme.
fn icon_extension(icon_theme: &str) -> Option<&'static str> {
    match icon_theme {
        "charmed-light" => Some("charmed-icons.charmed-icons"),
        "fluent-icons" => Some("miguelsolorio.fluent-icons"),
        "material-icon-theme" => Some("pkief.material-icon-theme"),
        t if t.starts_with("catppuccin-") => Some("catppuccin.catppuccin-vsc-icons"),
        t if t.starts_with("rose-pine") => Some("mvllow.rose-pine"),
        _ => None,
    }
}

impl OfficialTheme {
    /// Extensions to install, without duplicates, theme first.
    pub fn required_extensions(&self) -> Vec<&'static str> {
        let mut ids = vec![self.extension];
        for icon in [self.icon_theme, self.product_icon_theme] {
            if let Some(id) = icon_extension(icon) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

// ---------------------------------------------------------------------------
// Synthesized colors
// ---------------------------------------------------------------------------

/// Workbench and integrated-terminal colors derived from the palette.
pub fn color_customizations(p: &Palette) -> Map {
    let h = |slot: Slot| p.hex(slot);
    let mut colors = doc_map! {
        "editor.background" => h(Slot::Background),
        "editor.foreground" => h(Slot::Foreground),
        "editorCursor.foreground" => h(Slot::Blue),
        "editor.lineHighlightBackground" => h(Slot::Black),
        "editor.selectionBackground" => h(Slot::BrightBlack),
        "sideBar.background" => h(Slot::Black),
        "sideBar.foreground" => h(Slot::Foreground),
        "sideBarSectionHeader.background" => h(Slot::Background),
        "activityBar.background" => h(Slot::Black),
        "activityBar.foreground" => h(Slot::Blue),
        "activityBar.inactiveForeground" => h(Slot::BrightBlack),
        "statusBar.background" => h(Slot::Black),
        "statusBar.foreground" => h(Slot::Foreground),
        "statusBar.noFolderBackground" => h(Slot::Background),
        "titleBar.activeBackground" => h(Slot::Black),
        "titleBar.activeForeground" => h(Slot::Foreground),
        "titleBar.inactiveBackground" => h(Slot::Background),
        "tab.activeBackground" => h(Slot::Background),
        "tab.inactiveBackground" => h(Slot::Black),
        "tab.activeForeground" => h(Slot::Foreground),
        "tab.border" => h(Slot::Black),
        "panel.background" => h(Slot::Background),
        "panel.border" => h(Slot::Black),
        "panelTitle.activeForeground" => h(Slot::Foreground),
        "panelTitle.inactiveForeground" => h(Slot::BrightBlack),
        "terminal.background" => h(Slot::Background),
        "terminal.foreground" => h(Slot::Foreground),
    };
    for (prefix, slots) in [("ansi", Slot::NORMAL), ("ansiBright", Slot::BRIGHT)] {
        for slot in slots {
            let mut name = slot.ansi_name().to_string();
            name[..1].make_ascii_uppercase();
            colors.insert(format!("terminal.{prefix}{name}"), h(slot).into());
        }
    }
    colors
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

pub struct VsCodeIntegration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
    cache: ChannelCache,
    selected: Option<usize>,
}

impl VsCodeIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self::with_cache(env, ChannelCache::new())
    }

    pub fn with_cache(env: &AdapterEnv, cache: ChannelCache) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
            cache,
            selected: None,
        }
    }

    fn present(&self) -> Vec<usize> {
        self.cache
            .get_or_scan(|| scan_channels(&CHANNELS, |c| c.is_present(&self.paths)))
    }

    /// Channel apply targets: the selected one, else the first present.
    fn channel(&self) -> Option<&'static Channel> {
        let index = self.selected.or_else(|| self.present().first().copied())?;
        CHANNELS.get(index)
    }

    fn find_cli(&self, channel: &Channel) -> Option<PathBuf> {
        if let Some(path) = self.runner.locate(channel.cli) {
            return Some(path);
        }
        if let Some(bundle) = self.paths.find_app_bundle(channel.app_bundle) {
            let cli = bundle
                .join("Contents")
                .join("Resources")
                .join("app")
                .join("bin")
                .join(channel.cli);
            if cli.exists() {
                return Some(cli);
            }
        }
        ["/usr/local/bin", "/opt/homebrew/bin"]
            .iter()
            .map(|dir| Path::new(dir).join(channel.cli))
            .find(|path| path.exists())
    }

    /// Install missing extensions. Every problem becomes a note.
    async fn ensure_extensions(&self, channel: &Channel, theme: &OfficialTheme) -> Vec<String> {
        let required = theme.required_extensions();
        let Some(cli) = self.find_cli(channel) else {
            return vec![format!(
                "`{}` CLI not found; install these extensions from the Extensions view: {}",
                channel.cli,
                required.join(", ")
            )];
        };
        let program = cli.display().to_string();

        let installed = match self
            .runner
            .run(&program, &["--list-extensions".to_string()], None)
            .await
        {
            Ok(out) if out.success() => out
                .stdout
                .lines()
                .map(|l| l.trim().to_ascii_lowercase())
                .collect::<Vec<_>>(),
            _ => Vec::new(),
        };

        let mut notes = Vec::new();
        for id in required {
            if installed.iter().any(|i| i == &id.to_ascii_lowercase()) {
                debug!(extension = id, "already installed");
                continue;
            }
            let args = vec![
                "--install-extension".to_string(),
                id.to_string(),
                "--force".to_string(),
            ];
            let result = match self.runner.run(&program, &args, None).await {
                Ok(out) => ensure_success(out, &format!("install {id}")).map(|_| ()),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => info!(extension = id, channel = channel.name, "installed extension"),
                Err(e) => notes.push(install_note(id, channel, &e)),
            }
        }
        notes
    }
}

fn install_note(id: &str, channel: &Channel, error: &ToolError) -> String {
    format!(
        "Could not install `{id}` ({error}).\nRun `{} --install-extension {id}` or install it from the Extensions view.",
        channel.cli
    )
}

#[async_trait]
impl Integration for VsCodeIntegration {
    fn name(&self) -> &str {
        "VS Code"
    }

    fn is_installed(&self) -> bool {
        !self.present().is_empty()
    }

    fn config_location(&self) -> String {
        String::new()
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let channel = self.channel().ok_or(ApplyError::NotInstalled)?;
        let mut doc = Document::open(channel.settings_path(&self.paths), Format::Json)?;

        match official_theme(theme.name()) {
            Some(official) => {
                let values = [
                    official.color_theme,
                    official.icon_theme,
                    official.product_icon_theme,
                ];
                for (key, value) in SETTINGS_KEYS.iter().zip(values) {
                    doc.set(key, value);
                }
                doc.remove_if_empty(CUSTOMIZATIONS_KEY);
                doc.save()?;
                let notes = self.ensure_extensions(channel, &official).await;
                Ok(Applied::with_notes(notes))
            }
            None => {
                doc.extend_preserving(CUSTOMIZATIONS_KEY, color_customizations(theme.palette()));
                doc.save()?;
                Ok(Applied::clean())
            }
        }
    }

    fn variants(&self) -> Vec<TargetVariant> {
        self.present()
            .into_iter()
            .filter_map(|i| CHANNELS.get(i))
            .map(|channel| TargetVariant {
                name: channel.name.to_string(),
                location: self.paths.display(&channel.settings_path(&self.paths)),
            })
            .collect()
    }

    fn select_variant(&mut self, index: usize) {
        self.selected = self.present().get(index).copied();
    }
}
