//! Target application adapters.
//!
//! Each adapter implements [`Integration`] for one external application.
//! Adapters receive their host paths and command runner through
//! [`AdapterEnv`]; they never read global state. The [`IntegrationRegistry`]
//! applies a theme to selected targets one after another and turns every
//! result into an [`Outcome`], so a failing target never aborts the batch.

pub mod alacritty;
pub mod iterm2;
pub mod slack;
pub mod starship;
pub mod vscode;
pub mod wallpaper;
pub mod warp;
pub mod zed;

use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::HostPaths;
use crate::error::ApplyError;
use crate::theme::Theme;
use crate::tools::CommandRunner;

// ---------------------------------------------------------------------------
// Integration trait
// ---------------------------------------------------------------------------

/// Successful apply, possibly with follow-up steps the user has to finish
/// by hand (a registration step that could not run, for example).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Applied {
    pub notes: Vec<String>,
}

impl Applied {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<String>) -> Self {
        Self { notes }
    }
}

/// One concurrently installed flavor of a target (an editor channel, say).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetVariant {
    pub name: String,
    /// Human-readable location shown next to the name.
    pub location: String,
}

/// A themable application.
#[async_trait]
pub trait Integration: Send + Sync {
    /// Stable display identity.
    fn name(&self) -> &str;

    /// Best-effort local detection. Absence of evidence means `false`.
    fn is_installed(&self) -> bool;

    /// Where the theme lands. Empty when there is no single location.
    fn config_location(&self) -> String;

    /// Apply `theme`. Calling this twice with the same theme leaves the same
    /// files behind, including a single `.backup` per edited file.
    async fn apply(&self, theme: &Theme) -> Result<Applied, ApplyError>;

    /// Installed variants the user must choose between before apply.
    fn variants(&self) -> Vec<TargetVariant> {
        Vec::new()
    }

    /// Choose the variant at `index` in [`Integration::variants`].
    fn select_variant(&mut self, _index: usize) {}
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Per-target result of one apply attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied { notes: Vec<String> },
    SkippedNotInstalled,
    Failed { reason: String },
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}

/// Outcome tagged with the target it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub target: String,
    pub outcome: Outcome,
}

/// Ordered results of one apply batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub theme: String,
    pub entries: Vec<ReportEntry>,
}

impl ApplyReport {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn outcome_for(&self, target: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.target == target)
            .map(|entry| &entry.outcome)
    }

    pub fn failures(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_failure()).count()
    }
}

// ---------------------------------------------------------------------------
// Adapter environment
// ---------------------------------------------------------------------------

/// Terminal handle for escape-sequence side channels (OSC 52).
pub type SharedTerminal = Arc<Mutex<Box<dyn Write + Send>>>;

/// Everything an adapter needs from the host.
#[derive(Clone)]
pub struct AdapterEnv {
    pub paths: HostPaths,
    pub runner: Arc<dyn CommandRunner>,
    pub terminal: SharedTerminal,
}

impl AdapterEnv {
    /// Environment whose terminal side channel is stderr.
    pub fn new(paths: HostPaths, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            paths,
            runner,
            terminal: Arc::new(Mutex::new(Box::new(std::io::stderr()))),
        }
    }

    pub fn with_terminal(mut self, terminal: SharedTerminal) -> Self {
        self.terminal = terminal;
        self
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Ordered, closed set of adapters offered to the user.
pub struct IntegrationRegistry {
    integrations: Vec<Box<dyn Integration>>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self {
            integrations: Vec::new(),
        }
    }

    /// Every built-in adapter, in menu order.
    pub fn builtin(env: &AdapterEnv) -> Self {
        let mut registry = Self::new();
        registry.register(vscode::VsCodeIntegration::new(env));
        registry.register(alacritty::AlacrittyIntegration::new(env));
        registry.register(warp::WarpIntegration::new(env));
        registry.register(iterm2::ITerm2Integration::new(env));
        registry.register(starship::StarshipIntegration::new(env));
        registry.register(zed::ZedIntegration::new(env));
        registry.register(wallpaper::WallpaperIntegration::new(env));
        registry.register(slack::SlackIntegration::new(env));
        registry
    }

    pub fn register(&mut self, integration: impl Integration + 'static) {
        self.integrations.push(Box::new(integration));
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Integration> {
        self.integrations.get(index).map(|i| i.as_ref())
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Integration + 'static)> {
        self.integrations.get_mut(index).map(|i| i.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Integration> {
        self.integrations.iter().map(|i| i.as_ref())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.integrations.iter().position(|i| i.name() == name)
    }

    /// Apply `theme` to the target at `index` and classify the result.
    pub async fn apply_one(&self, index: usize, theme: &Theme) -> Option<ReportEntry> {
        let integration = self.integrations.get(index)?;
        let target = integration.name().to_string();

        if !integration.is_installed() {
            info!(target = %target, "skipping target that is not installed");
            return Some(ReportEntry {
                target,
                outcome: Outcome::SkippedNotInstalled,
            });
        }

        let outcome = match integration.apply(theme).await {
            Ok(applied) => {
                info!(target = %target, theme = theme.name(), notes = applied.notes.len(), "applied");
                Outcome::Applied {
                    notes: applied.notes,
                }
            }
            Err(ApplyError::NotInstalled) => Outcome::SkippedNotInstalled,
            Err(e) => {
                warn!(target = %target, theme = theme.name(), error = %e, "apply failed");
                Outcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        Some(ReportEntry { target, outcome })
    }

    /// Apply `theme` to each selected target in order. Unknown indices are
    /// ignored.
    pub async fn apply_selected(&self, indices: &[usize], theme: &Theme) -> ApplyReport {
        let mut report = ApplyReport::new(theme.name());
        for &index in indices {
            if let Some(entry) = self.apply_one(index, theme).await {
                report.entries.push(entry);
            }
        }
        report
    }
}

impl Default for IntegrationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted adapter for registry and controller tests.

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub struct FakeIntegration {
        pub name: String,
        pub installed: bool,
        pub fail_with: Option<String>,
        pub variants: Vec<TargetVariant>,
        pub selected: Option<usize>,
        pub calls: Arc<AtomicUsize>,
    }

    impl FakeIntegration {
        pub fn new(name: &str) -> Self {
            Self {
                name: name.to_string(),
                installed: true,
                fail_with: None,
                variants: Vec::new(),
                selected: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn not_installed(mut self) -> Self {
            self.installed = false;
            self
        }

        pub fn failing(mut self, reason: &str) -> Self {
            self.fail_with = Some(reason.to_string());
            self
        }

        pub fn with_variants(mut self, names: &[&str]) -> Self {
            self.variants = names
                .iter()
                .map(|n| TargetVariant {
                    name: n.to_string(),
                    location: String::new(),
                })
                .collect();
            self
        }
    }

    #[async_trait]
    impl Integration for FakeIntegration {
        fn name(&self) -> &str {
            &self.name
        }

        fn is_installed(&self) -> bool {
            self.installed
        }

        fn config_location(&self) -> String {
            format!("/fake/{}", self.name)
        }

        async fn apply(&self, _theme: &Theme) -> Result<Applied, ApplyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some(reason) => Err(ApplyError::Tool(crate::error::ToolError::Failed(
                    reason.clone(),
                ))),
                None => Ok(Applied::clean()),
            }
        }

        fn variants(&self) -> Vec<TargetVariant> {
            self.variants.clone()
        }

        fn select_variant(&mut self, index: usize) {
            self.selected = Some(index);
        }
    }
}
