//! Desktop wallpaper (macOS).

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

use super::{AdapterEnv, Applied, Integration};
use crate::config::{HostPaths, Platform, APP_DIR};
use crate::error::ApplyError;
use crate::theme::Theme;
use crate::tools::{ensure_success, CommandRunner};

/// Bundled wallpaper file for a theme.
pub fn wallpaper_for(theme_name: &str) -> &'static str {
    if theme_name.to_lowercase().contains("nord") {
        "nord.png"
    } else {
        "catppuccin-rosepine.jpg"
    }
}

/// AppleScript that sets `image` on every desktop.
pub fn set_picture_script(image: &str) -> String {
    format!(
        "tell application \"System Events\"\n\ttell every desktop\n\t\tset picture to \"{}\"\n\tend tell\nend tell",
        image.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

pub struct WallpaperIntegration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
}

impl WallpaperIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
        }
    }

    fn wallpapers_dir(&self) -> PathBuf {
        self.paths.config_root.join(APP_DIR).join("wallpapers")
    }
}

#[async_trait]
impl Integration for WallpaperIntegration {
    fn name(&self) -> &str {
        "macOS Wallpaper"
    }

    fn is_installed(&self) -> bool {
        self.paths.platform == Platform::MacOs
    }

    fn config_location(&self) -> String {
        self.paths.display(&self.wallpapers_dir())
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let file = wallpaper_for(theme.name());
        let source = self.paths.assets_dir.join("wallpapers").join(file);
        if !source.is_file() {
            return Err(ApplyError::NoOfficialAsset {
                theme: theme.name().to_string(),
                instructions: format!("Bundled wallpaper missing: {}", source.display()),
            });
        }

        let dir = self.wallpapers_dir();
        std::fs::create_dir_all(&dir)
            .map_err(|e| ApplyError::io(format!("create {}", dir.display()), e))?;
        let dest = dir.join(file);
        std::fs::copy(&source, &dest)
            .map_err(|e| ApplyError::io(format!("copy wallpaper to {}", dest.display()), e))?;

        let script = set_picture_script(&dest.display().to_string());
        let result = match self
            .runner
            .run("osascript", &["-e".to_string(), script], None)
            .await
        {
            Ok(out) => ensure_success(out, "osascript").map(|_| ()),
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => Ok(Applied::clean()),
            Err(e) => {
                warn!(error = %e, "could not set wallpaper");
                Ok(Applied::with_notes(vec![format!(
                    "Wallpaper copied to {}, but setting it failed: {e}\nSet it from System Settings > Wallpaper.",
                    self.paths.display(&dest)
                )]))
            }
        }
    }
}
