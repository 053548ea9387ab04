//! Slack sidebar theme.
//!
//! Slack has no config file to edit. The four-color theme string goes to the
//! clipboard and the user pastes it into Slack's custom theme field.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::{AdapterEnv, Applied, Integration, SharedTerminal};
use crate::config::{HostPaths, Platform};
use crate::error::{ApplyError, ToolError};
use crate::theme::{Palette, Slot, Theme};
use crate::tools::clipboard::{copy_to_clipboard, ClipboardMethod};
use crate::tools::open::open_uri;
use crate::tools::CommandRunner;

pub const PREFERENCES_URI: &str = "slack://preferences";

/// Navigation, selected item, presence, and notification colors.
pub fn theme_string(p: &Palette) -> String {
    [Slot::Background, Slot::Blue, Slot::Green, Slot::Red]
        .iter()
        .map(|&slot| p.hex(slot))
        .collect::<Vec<_>>()
        .join(",")
}

pub struct SlackIntegration {
    paths: HostPaths,
    runner: Arc<dyn CommandRunner>,
    terminal: SharedTerminal,
}

impl SlackIntegration {
    pub fn new(env: &AdapterEnv) -> Self {
        Self {
            paths: env.paths.clone(),
            runner: env.runner.clone(),
            terminal: env.terminal.clone(),
        }
    }
}

#[async_trait]
impl Integration for SlackIntegration {
    fn name(&self) -> &str {
        "Slack"
    }

    fn is_installed(&self) -> bool {
        match self.paths.platform {
            Platform::MacOs => self.paths.find_app_bundle("Slack.app").is_some(),
            Platform::Linux => self.runner.locate("slack").is_some(),
            Platform::Windows => self.runner.locate("slack.exe").is_some(),
            Platform::Other => false,
        }
    }

    fn config_location(&self) -> String {
        "Manual (copy to clipboard)".to_string()
    }

    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError> {
        let colors = theme_string(theme.palette());

        let method = {
            let mut terminal = self.terminal.lock().await;
            copy_to_clipboard(self.runner.as_ref(), &colors, &mut **terminal)
                .await
                .map_err(|e| {
                    ApplyError::Tool(ToolError::Failed(format!(
                        "copy to clipboard: {e}\nTheme colors: {colors}"
                    )))
                })?
        };

        if let Err(e) = open_uri(self.runner.as_ref(), PREFERENCES_URI).await {
            debug!(error = %e, "could not open Slack preferences");
        }

        let copied = match method {
            ClipboardMethod::Tool(tool) => format!("Copied to clipboard with {tool}: {colors}"),
            ClipboardMethod::Osc52 => {
                format!("Sent to the terminal clipboard (OSC 52): {colors}")
            }
        };
        Ok(Applied::with_notes(vec![
            copied,
            "In Slack: Preferences > Appearance > Custom theme, then paste the colors.".to_string(),
        ]))
    }
}
