//! iTerm2 color presets.
//!
//! The `.itermcolors` file is the deliverable and must be written; importing
//! it into iTerm2's preference store is best-effort.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use super::{AdapterEnv, Applied, Integration};
use crate::config::{HostPaths, APP_DIR};
use crate::doc_map;
use crate::document::{Document, Format, Map};
use crate::error::ApplyError;
use crate::theme::{HexColor, Palette, Slot, Theme};
use crate::tools::plist_buddy::register_color_preset;
use crate::tools::CommandRunner;

const APP_BUNDLES: [&str; 2] = ["iTerm.app", "iTerm2.app"];

fn color(c: HexColor, alpha: f64) -> Map {
    let [r, g, b] = c.components();
    doc_map! {
        "Alpha Component" => alpha,
        "Blue Component" => b,
        "Color Space" => "sRGB",
        "Green Component" => g,
        "Red Component" => r,
    }
}

/// Preset dictionary, keys in iTerm2's own order.
pub fn preset(p: &Palette) -> Map {
    let opaque = |slot: Slot| color(p.get(slot), 1.0);
    let mut map = Map::new();
    for (i, slot) in Slot::NORMAL.iter().chain(Slot::BRIGHT.iter()).enumerate() {
        map.insert(format!("Ansi {i} Color"), opaque(*slot).into());
    }
    let named = [
        ("Background Color", opaque(Slot::Background)),
        ("Badge Color", color(p.get(Slot::Black), 0.5)),
        ("Bold Color", opaque(Slot::BrightWhite)),
        ("Cursor Color", opaque(Slot::Foreground)),
        ("Cursor Guide Color", opaque(Slot::BrightBlack)),
        ("Cursor Text Color", opaque(Slot::Background)),
        ("Foreground Color", opaque(Slot::Foreground)),
        ("Link Color", opaque(Slot::BrightCyan)),
        ("Selected Text Color", opaque(Slot::BrightBlack)),
        ("Selection Color", opaque(Slot::Foreground)),
    ];
    for (key, value) in named {
        map.insert(key.to_string(), value.into());
    }
    map
}

/// Name iTerm2 shows for an imported preset file.
pub fn preset_name(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

pub struct ITerm2Integration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
}

impl ITerm2Integration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
        }
    }

    fn presets_dir(&self) -> PathBuf {
        self.paths.config_root.join(APP_DIR).join("iterm2")
    }

    fn preference_store(&self) -> PathBuf {
        self.paths
            .home
            .join("Library")
            .join("Preferences")
            .join("com.googlecode.iterm2.plist")
    }
}

#[async_trait]
impl Integration for ITerm2Integration {
    fn name(&self) -> &str {
        "iTerm2"
    }

    fn is_installed(&self) -> bool {
        APP_BUNDLES
            .iter()
            .any(|bundle| self.paths.find_app_bundle(bundle).is_some())
    }

    fn config_location(&self) -> String {
        self.paths.display(&self.presets_dir())
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let file = self
            .presets_dir()
            .join(format!("{}.itermcolors", theme.file_stem()));
        let mut doc = Document::open(&file, Format::Plist)?;
        for (key, value) in preset(theme.palette()) {
            doc.set(&key, value);
        }
        doc.save()?;

        let name = preset_name(&file);
        let store = self.preference_store();
        match register_color_preset(self.runner.as_ref(), &store, &name, &file).await {
            Ok(()) => {
                info!(preset = %name, "registered iTerm2 color preset");
                Ok(Applied::clean())
            }
            Err(e) => {
                warn!(error = %e, "iTerm2 preset registration failed");
                Ok(Applied::with_notes(vec![format!(
                    "Preset saved to {}, but auto-import failed: {e}\nTo import manually:\n  1. Open iTerm2 > Settings > Profiles > Colors\n  2. Color Presets > Import...\n  3. Select {}\n  4. Choose `{name}` from Color Presets",
                    self.paths.display(&file),
                    self.paths.display(&file),
                )]))
            }
        }
    }
}
