//! Warp terminal custom themes.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{AdapterEnv, Applied, Integration};
use crate::config::{HostPaths, Platform};
use crate::doc_map;
use crate::document::{Document, Format, Map, Value};
use crate::error::ApplyError;
use crate::theme::{Palette, Slot, Theme};

/// A Warp release channel with its own data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Channel {
    display_name: &'static str,
    dir: &'static str,
    app_bundle: &'static str,
}

const CHANNELS: [Channel; 2] = [
    Channel {
        display_name: "Warp (Default)",
        dir: ".warp",
        app_bundle: "Warp.app",
    },
    Channel {
        display_name: "Warp Preview",
        dir: ".warp-preview",
        app_bundle: "WarpPreview.app",
    },
];

/// Warp theme document for a palette.
pub fn theme_document(theme: &Theme) -> Map {
    let p = theme.palette();
    let ansi = |slots: [Slot; 8]| -> Map {
        slots
            .iter()
            .map(|&slot| (slot.ansi_name().to_string(), Value::from(p.hex(slot))))
            .collect()
    };
    doc_map! {
        "name" => theme.name(),
        "accent" => p.hex(Slot::Blue),
        "cursor" => p.hex(Slot::Green),
        "background" => p.hex(Slot::Background),
        "foreground" => p.hex(Slot::Foreground),
        "details" => details(p),
        "terminal_colors" => doc_map! {
            "normal" => ansi(Slot::NORMAL),
            "bright" => ansi(Slot::BRIGHT),
        },
    }
}

fn details(p: &Palette) -> &'static str {
    p.tone().as_str()
}

pub struct WarpIntegration {
    paths: HostPaths,
    display_name: String,
}

impl WarpIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        let paths = env.paths.clone();
        let present = present_channels(&paths);
        let display_name = match present.as_slice() {
            [] => "Warp".to_string(),
            [only] => only.display_name.to_string(),
            _ => "Warp (installs to both versions)".to_string(),
        };
        Self {
            paths,
            display_name,
        }
    }

    fn theme_dirs(&self) -> Vec<PathBuf> {
        present_channels(&self.paths)
            .iter()
            .map(|c| self.paths.home.join(c.dir).join("themes"))
            .collect()
    }
}

/// Channels whose data directory exists. On macOS the application bundle
/// must be present too.
fn present_channels(paths: &HostPaths) -> Vec<Channel> {
    CHANNELS
        .iter()
        .filter(|c| paths.home.join(c.dir).is_dir())
        .filter(|c| paths.platform != Platform::MacOs || paths.find_app_bundle(c.app_bundle).is_some())
        .copied()
        .collect()
}

#[async_trait]
impl Integration for WarpIntegration {
    fn name(&self) -> &str {
        &self.display_name
    }

    fn is_installed(&self) -> bool {
        !present_channels(&self.paths).is_empty()
    }

    fn config_location(&self) -> String {
        self.theme_dirs()
            .iter()
            .map(|d| self.paths.display(d))
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let dirs = self.theme_dirs();
        if dirs.is_empty() {
            return Err(ApplyError::NotInstalled);
        }
        let file = format!("{}.yaml", theme.file_stem());
        for dir in dirs {
            let mut doc = Document::open(dir.join(&file), Format::Yaml)?;
            for (key, value) in theme_document(theme) {
                doc.set(&key, value);
            }
            doc.save()?;
        }
        Ok(Applied::clean())
    }
}
