//! Starship prompt.
//!
//! Built-in themes get the upstream preset as a complete `starship.toml`
//! with the matching named palette. Any other theme keeps the user's prompt
//! layout and only swaps in a `zakaranda` palette.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{AdapterEnv, Applied, Integration};
use crate::config::HostPaths;
use crate::document::{backup_file, write_atomic, Document, Format, Map, Value};
use crate::error::ApplyError;
use crate::theme::{Palette, Slot, Theme};
use crate::tools::CommandRunner;

const NORD_TEMPLATE: &str = include_str!("../templates/starship/nord.toml");
const CATPPUCCIN_TEMPLATE: &str = include_str!("../templates/starship/catppuccin.toml");
const ROSE_PINE_TEMPLATE: &str = include_str!("../templates/starship/rose_pine.toml");

const PALETTE_PLACEHOLDER: &str = "{{palette}}";
pub const FALLBACK_PALETTE: &str = "zakaranda";

/// Complete official config for a built-in theme.
pub fn official_config(theme_name: &str) -> Option<String> {
    let (template, palette) = match theme_name {
        "Nord" => (NORD_TEMPLATE, "nord"),
        "Catppuccin Latte" => (CATPPUCCIN_TEMPLATE, "catppuccin_latte"),
        "Catppuccin Frappe" => (CATPPUCCIN_TEMPLATE, "catppuccin_frappe"),
        "Catppuccin Macchiato" => (CATPPUCCIN_TEMPLATE, "catppuccin_macchiato"),
        "Catppuccin Mocha" => (CATPPUCCIN_TEMPLATE, "catppuccin_mocha"),
        "Rose Pine" => (ROSE_PINE_TEMPLATE, "rose_pine"),
        "Rose Pine Moon" => (ROSE_PINE_TEMPLATE, "rose_pine_moon"),
        "Rose Pine Dawn" => (ROSE_PINE_TEMPLATE, "rose_pine_dawn"),
        _ => return None,
    };
    Some(template.replace(PALETTE_PLACEHOLDER, palette))
}

/// `palettes.zakaranda` entries, one per slot.
pub fn palette_table(p: &Palette) -> Map {
    Slot::ALL
        .iter()
        .map(|&slot| (slot.key().to_string(), Value::from(p.hex(slot))))
        .collect()
}

pub struct StarshipIntegration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
}

impl StarshipIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
        }
    }

    fn config_file(&self) -> PathBuf {
        self.paths.config_root.join("starship.toml")
    }

    fn binary_present(&self) -> bool {
        self.runner.locate("starship").is_some()
            || ["/usr/local/bin/starship", "/opt/homebrew/bin/starship"]
                .iter()
                .any(|p| Path::new(p).exists())
    }
}

#[async_trait]
impl Integration for StarshipIntegration {
    fn name(&self) -> &str {
        "Starship"
    }

    fn is_installed(&self) -> bool {
        self.config_file().exists() || self.binary_present()
    }

    fn config_location(&self) -> String {
        self.paths.display(&self.config_file())
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let path = self.config_file();

        if let Some(config) = official_config(theme.name()) {
            backup_file(&path)?;
            write_atomic(&path, config.as_bytes())
                .map_err(|e| ApplyError::io(format!("write {}", path.display()), e))?;
            return Ok(Applied::clean());
        }

        let mut doc = Document::open(&path, Format::Toml)?;
        doc.set("palette", FALLBACK_PALETTE);
        doc.replace_path(
            &["palettes", FALLBACK_PALETTE],
            palette_table(theme.palette()),
        );
        doc.save()?;
        Ok(Applied::clean())
    }
}
