//! Zed editor.
//!
//! Zed themes ship as extensions; there is no palette fallback. The theme's
//! extension must already be installed.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{AdapterEnv, Applied, Integration};
use crate::config::HostPaths;
use crate::doc_map;
use crate::document::{Document, Format};
use crate::error::ApplyError;
use crate::theme::Theme;

/// Extension id and the theme name it registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZedTheme {
    pub extension: &'static str,
    pub theme_name: &'static str,
}

pub fn zed_theme(theme_name: &str) -> Option<ZedTheme> {
    let (extension, zed_name) = match theme_name {
        "Nord" => ("nord", "Nord Dark"),
        "Catppuccin Latte" => ("catppuccin", "Catppuccin Latte"),
        "Catppuccin Frappe" => ("catppuccin", "Catppuccin Frappé"),
        "Catppuccin Macchiato" => ("catppuccin", "Catppuccin Macchiato"),
        "Catppuccin Mocha" => ("catppuccin", "Catppuccin Mocha"),
        "Rose Pine" => ("rose-pine-theme", "Rosé Pine"),
        "Rose Pine Moon" => ("rose-pine-theme", "Rosé Pine Moon"),
        "Rose Pine Dawn" => ("rose-pine-theme", "Rosé Pine Dawn"),
        _ => return None,
    };
    Some(ZedTheme {
        extension,
        theme_name: zed_name,
    })
}

pub fn extension_url(id: &str) -> String {
    format!("zed://extensions/{id}")
}

pub struct ZedIntegration {
    paths: HostPaths,
}

impl ZedIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
        }
    }

    fn settings_file(&self) -> PathBuf {
        self.paths.config_root.join("zed").join("settings.json")
    }

    /// Installed-extensions directory: the data-root location when it
    /// exists, else the macOS location when it exists, else the data root.
    fn extensions_dir(&self) -> PathBuf {
        let data = self
            .paths
            .data_root
            .join("zed")
            .join("extensions")
            .join("installed");
        if data.exists() {
            return data;
        }
        let macos = self
            .paths
            .app_support
            .join("Zed")
            .join("extensions")
            .join("installed");
        if macos.exists() {
            return macos;
        }
        data
    }
}

#[async_trait]
impl Integration for ZedIntegration {
    fn name(&self) -> &str {
        "Zed"
    }

    fn is_installed(&self) -> bool {
        self.paths.config_root.join("zed").is_dir()
    }

    fn config_location(&self) -> String {
        self.paths.display(&self.settings_file())
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let Some(mapped) = zed_theme(theme.name()) else {
            return Err(ApplyError::NoOfficialAsset {
                theme: theme.name().to_string(),
                instructions: "Zed themes come from extensions and none is known for this theme."
                    .to_string(),
            });
        };

        if !self.extensions_dir().join(mapped.extension).exists() {
            return Err(ApplyError::NoOfficialAsset {
                theme: theme.name().to_string(),
                instructions: format!(
                    "Install the `{}` extension first:\n  {}\nThen apply the theme again.",
                    mapped.extension,
                    extension_url(mapped.extension)
                ),
            });
        }

        let mut doc = Document::open(self.settings_file(), Format::Json)?;
        doc.replace_section(
            "theme",
            doc_map! {
                "mode" => "system",
                "light" => mapped.theme_name,
                "dark" => mapped.theme_name,
            },
        );
        doc.save()?;
        Ok(Applied::clean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::testsupport::{RecordingRunner, TestTempDir};
    use crate::theme::sample_theme;
    use std::sync::Arc;

    fn adapter(tmp: &TestTempDir) -> ZedIntegration {
        ZedIntegration::new(&AdapterEnv::new(
            HostPaths::rooted_at(tmp.path(), Platform::MacOs),
            Arc::new(RecordingRunner::new()),
        ))
    }

    #[tokio::test]
    async fn missing_extension_is_a_hard_failure_with_install_link() {
        let tmp = TestTempDir::new("zed-noext");
        tmp.mkdir(".config/zed");
        let err = adapter(&tmp).apply(&sample_theme()).await.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("zed://extensions/catppuccin"), "{text}");
        assert!(!tmp.child(".config/zed/settings.json").exists());
    }

    #[tokio::test]
    async fn unknown_theme_has_no_fallback() {
        let tmp = TestTempDir::new("zed-unknown");
        let custom = Theme::new("Dusk", "", *sample_theme().palette());
        let err = adapter(&tmp).apply(&custom).await.unwrap_err();
        assert!(matches!(err, ApplyError::NoOfficialAsset { .. }));
    }

    #[tokio::test]
    async fn theme_section_is_overwritten_and_other_settings_kept() {
        let tmp = TestTempDir::new("zed-apply");
        tmp.mkdir("Library/Application Support/Zed/extensions/installed/catppuccin");
        let settings = tmp.write_text(
            ".config/zed/settings.json",
            "// Zed settings\n{\n  \"buffer_font_size\": 15,\n  \"theme\": {\"mode\": \"dark\", \"dark\": \"One Dark\", \"extra\": 1}\n}\n",
        );
        let zed = adapter(&tmp);

        zed.apply(&sample_theme()).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&settings).unwrap()).unwrap();
        assert_eq!(written["buffer_font_size"], 15);
        assert_eq!(
            written["theme"],
            serde_json::json!({"mode": "system", "light": "Catppuccin Mocha", "dark": "Catppuccin Mocha"})
        );
    }

    #[tokio::test]
    async fn second_apply_leaves_identical_settings_and_one_backup() {
        let tmp = TestTempDir::new("zed-twice");
        tmp.mkdir(".local/share/zed/extensions/installed/catppuccin");
        let original = "{\n  // ui\n  \"vim_mode\": true\n}\n";
        let settings = tmp.write_text(".config/zed/settings.json", original);
        let zed = adapter(&tmp);

        zed.apply(&sample_theme()).await.unwrap();
        let once = std::fs::read_to_string(&settings).unwrap();
        zed.apply(&sample_theme()).await.unwrap();

        assert_eq!(std::fs::read_to_string(&settings).unwrap(), once);
        let backups: Vec<_> = std::fs::read_dir(tmp.child(".config/zed"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".backup"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            std::fs::read_to_string(tmp.child(".config/zed/settings.json.backup")).unwrap(),
            once
        );
    }
}
