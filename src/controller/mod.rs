//! Selection/apply state machine.
//!
//! The controller owns the catalog and the adapter registry. Key handling
//! ([`Controller::handle`]) is synchronous and free of I/O; the only async
//! step is [`Controller::run_apply`], which the caller awaits when `handle`
//! returns [`Step::Apply`].
//!
//! ```text
//! SelectingTheme -> SelectingVariant -> PreviewingTheme -> SelectingTargets
//!                                                           -> SelectingTargetVariant -> Complete
//! ```
//!
//! `SelectingVariant` is skipped for single-variant families and
//! `SelectingTargetVariant` is only entered for targets with more than one
//! installed variant.

mod cursor;

use std::collections::VecDeque;
use tracing::{debug, info};

use crate::config::Preferences;
use crate::error::ControllerError;
use crate::integrations::{ApplyReport, Integration, IntegrationRegistry, TargetVariant};
use crate::theme::{BaseTheme, Catalog, Theme};

pub use cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SelectingTheme,
    SelectingVariant,
    PreviewingTheme,
    SelectingTargets,
    SelectingTargetVariant,
    Complete,
}

/// User intent decoded from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    /// Flip the highlighted target (multi-select screens only).
    Toggle,
    Confirm,
    /// Return to the previous screen.
    Back,
    Quit,
}

/// What the caller should do after [`Controller::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// Await [`Controller::run_apply`].
    Apply,
    Exit,
}

pub struct Controller {
    catalog: Catalog,
    registry: IntegrationRegistry,
    screen: Screen,
    family: Cursor,
    variant: Cursor,
    /// Family the variant cursor belongs to.
    variant_family: Option<usize>,
    target: Cursor,
    toggled: Vec<bool>,
    /// Chosen targets still waiting for a variant choice, front first.
    pending_variants: VecDeque<usize>,
    target_variant: Cursor,
    theme: Option<Theme>,
    chosen: Vec<usize>,
    report: Option<ApplyReport>,
}

impl Controller {
    pub fn new(catalog: Catalog, registry: IntegrationRegistry) -> Result<Self, ControllerError> {
        if catalog.is_empty() {
            return Err(ControllerError::EmptyCatalog);
        }
        let toggled = vec![false; registry.len()];
        Ok(Self {
            family: Cursor::new(catalog.families().len()),
            target: Cursor::new(registry.len()),
            catalog,
            registry,
            screen: Screen::SelectingTheme,
            variant: Cursor::new(0),
            variant_family: None,
            toggled,
            pending_variants: VecDeque::new(),
            target_variant: Cursor::new(0),
            theme: None,
            chosen: Vec::new(),
            report: None,
        })
    }

    /// Start on the last applied theme and pre-toggle the last targets that
    /// are still offered.
    pub fn with_preferences(mut self, prefs: &Preferences) -> Self {
        if let Some((family, variant)) = prefs
            .last_theme
            .as_deref()
            .and_then(|name| self.catalog.position_of(name))
        {
            self.family.set(family);
            self.enter_variant_family(family);
            self.variant.set(variant);
        }
        for name in &prefs.enabled_apps {
            if let Some(index) = self.registry.position(name) {
                self.toggled[index] = true;
            }
        }
        self
    }

    // -- Accessors used by the view ------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn registry(&self) -> &IntegrationRegistry {
        &self.registry
    }

    pub fn family_cursor(&self) -> usize {
        self.family.index()
    }

    pub fn variant_cursor(&self) -> usize {
        self.variant.index()
    }

    pub fn target_cursor(&self) -> usize {
        self.target.index()
    }

    pub fn target_variant_cursor(&self) -> usize {
        self.target_variant.index()
    }

    pub fn current_family(&self) -> Option<&BaseTheme> {
        self.catalog.family(self.family.index())
    }

    /// Theme being previewed or applied.
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    pub fn is_toggled(&self, target: usize) -> bool {
        self.toggled.get(target).copied().unwrap_or(false)
    }

    /// Target whose variant is being chosen, with its variants.
    pub fn pending_target(&self) -> Option<(&dyn Integration, Vec<TargetVariant>)> {
        let index = *self.pending_variants.front()?;
        let integration = self.registry.get(index)?;
        Some((integration, integration.variants()))
    }

    pub fn report(&self) -> Option<&ApplyReport> {
        self.report.as_ref()
    }

    /// Names of the targets chosen for the current batch.
    pub fn chosen_target_names(&self) -> Vec<String> {
        self.chosen
            .iter()
            .filter_map(|&i| self.registry.get(i))
            .map(|i| i.name().to_string())
            .collect()
    }

    // -- Transitions ---------------------------------------------------

    pub fn handle(&mut self, action: Action) -> Step {
        if action == Action::Quit {
            return Step::Exit;
        }
        let step = match self.screen {
            Screen::SelectingTheme => self.on_theme_list(action),
            Screen::SelectingVariant => self.on_variant_list(action),
            Screen::PreviewingTheme => self.on_preview(action),
            Screen::SelectingTargets => self.on_target_list(action),
            Screen::SelectingTargetVariant => self.on_target_variant_list(action),
            Screen::Complete => match action {
                Action::Confirm | Action::Back => Step::Exit,
                _ => Step::Continue,
            },
        };
        debug!(?action, screen = ?self.screen, ?step, "handled action");
        step
    }

    /// Apply the previewed theme to every chosen target and move to
    /// [`Screen::Complete`].
    pub async fn run_apply(&mut self) -> &ApplyReport {
        let report = match &self.theme {
            Some(theme) => self.registry.apply_selected(&self.chosen, theme).await,
            None => ApplyReport::default(),
        };
        info!(
            theme = %report.theme,
            targets = report.entries.len(),
            failures = report.failures(),
            "apply finished"
        );
        self.screen = Screen::Complete;
        self.report.insert(report)
    }

    /// [`Controller::handle`], running the apply phase when it is due.
    pub async fn dispatch(&mut self, action: Action) -> Step {
        match self.handle(action) {
            Step::Apply => {
                self.run_apply().await;
                Step::Continue
            }
            step => step,
        }
    }

    fn on_theme_list(&mut self, action: Action) -> Step {
        match action {
            Action::Up => self.family.up(),
            Action::Down => self.family.down(),
            Action::Confirm => {
                let index = self.family.index();
                let Some(count) = self.catalog.family(index).map(|f| f.variants.len()) else {
                    return Step::Continue;
                };
                self.enter_variant_family(index);
                match count {
                    0 => {}
                    1 => {
                        self.variant.set(0);
                        self.preview();
                    }
                    _ => self.screen = Screen::SelectingVariant,
                }
            }
            _ => {}
        }
        Step::Continue
    }

    fn on_variant_list(&mut self, action: Action) -> Step {
        match action {
            Action::Up => self.variant.up(),
            Action::Down => self.variant.down(),
            Action::Confirm => self.preview(),
            Action::Back => self.screen = Screen::SelectingTheme,
            _ => {}
        }
        Step::Continue
    }

    fn on_preview(&mut self, action: Action) -> Step {
        match action {
            Action::Confirm => self.screen = Screen::SelectingTargets,
            Action::Back => {
                let multi = self.current_family().is_some_and(|f| f.variants.len() > 1);
                self.screen = if multi {
                    Screen::SelectingVariant
                } else {
                    Screen::SelectingTheme
                };
            }
            _ => {}
        }
        Step::Continue
    }

    fn on_target_list(&mut self, action: Action) -> Step {
        match action {
            Action::Up => self.target.up(),
            Action::Down => self.target.down(),
            Action::Toggle => {
                if let Some(flag) = self.toggled.get_mut(self.target.index()) {
                    *flag = !*flag;
                }
            }
            Action::Back => {
                self.toggled.iter_mut().for_each(|t| *t = false);
                self.screen = Screen::PreviewingTheme;
            }
            Action::Confirm => return self.confirm_targets(),
            Action::Quit => {}
        }
        Step::Continue
    }

    fn confirm_targets(&mut self) -> Step {
        self.chosen = (0..self.toggled.len()).filter(|&i| self.toggled[i]).collect();
        if self.chosen.is_empty() {
            let theme = self.theme.as_ref().map(|t| t.name()).unwrap_or_default();
            self.report = Some(ApplyReport::new(theme));
            self.screen = Screen::Complete;
            return Step::Continue;
        }

        self.pending_variants.clear();
        for &index in &self.chosen {
            let Some(integration) = self.registry.get_mut(index) else {
                continue;
            };
            match integration.variants().len() {
                0 => {}
                1 => integration.select_variant(0),
                _ => self.pending_variants.push_back(index),
            }
        }
        self.next_target_variant()
    }

    fn on_target_variant_list(&mut self, action: Action) -> Step {
        match action {
            Action::Up => self.target_variant.up(),
            Action::Down => self.target_variant.down(),
            Action::Confirm => {
                if let Some(index) = self.pending_variants.pop_front() {
                    let choice = self.target_variant.index();
                    if let Some(integration) = self.registry.get_mut(index) {
                        integration.select_variant(choice);
                    }
                }
                return self.next_target_variant();
            }
            Action::Back => {
                self.pending_variants.clear();
                self.screen = Screen::SelectingTargets;
            }
            _ => {}
        }
        Step::Continue
    }

    /// Show the next variant picker, or start applying when none is left.
    fn next_target_variant(&mut self) -> Step {
        let Some(count) = self.pending_target().map(|(_, variants)| variants.len()) else {
            return Step::Apply;
        };
        self.target_variant = Cursor::new(count);
        self.screen = Screen::SelectingTargetVariant;
        Step::Continue
    }

    /// Point the variant cursor at `family`, keeping its position when the
    /// family is unchanged.
    fn enter_variant_family(&mut self, family: usize) {
        if self.variant_family == Some(family) {
            return;
        }
        let len = self
            .catalog
            .family(family)
            .map_or(0, |f| f.variants.len());
        self.variant = Cursor::new(len);
        self.variant_family = Some(family);
    }

    fn preview(&mut self) {
        let theme = self
            .current_family()
            .and_then(|f| f.theme(self.variant.index()));
        if theme.is_some() {
            self.theme = theme;
            self.screen = Screen::PreviewingTheme;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrations::fake::FakeIntegration;
    use crate::integrations::Outcome;
    use std::sync::atomic::Ordering;

    fn registry(fakes: Vec<FakeIntegration>) -> IntegrationRegistry {
        let mut registry = IntegrationRegistry::new();
        for fake in fakes {
            registry.register(fake);
        }
        registry
    }

    fn controller(fakes: Vec<FakeIntegration>) -> Controller {
        Controller::new(Catalog::builtin(), registry(fakes)).unwrap()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Controller::new(Catalog::default(), IntegrationRegistry::new())
            .err()
            .unwrap();
        assert!(matches!(err, ControllerError::EmptyCatalog));
    }

    #[test]
    fn single_variant_family_skips_variant_screen() {
        let mut c = controller(vec![]);
        assert_eq!(c.current_family().unwrap().name, "Nord");
        assert_eq!(c.handle(Action::Confirm), Step::Continue);
        assert_eq!(c.screen(), Screen::PreviewingTheme);
        assert_eq!(c.theme().unwrap().name(), "Nord");

        c.handle(Action::Back);
        assert_eq!(c.screen(), Screen::SelectingTheme);
    }

    #[test]
    fn multi_variant_family_asks_for_variant_and_back_restores_cursor() {
        let mut c = controller(vec![]);
        c.handle(Action::Down);
        c.handle(Action::Confirm);
        assert_eq!(c.screen(), Screen::SelectingVariant);

        c.handle(Action::Down);
        c.handle(Action::Down);
        c.handle(Action::Confirm);
        assert_eq!(c.theme().unwrap().name(), "Catppuccin Macchiato");

        c.handle(Action::Back);
        assert_eq!(c.screen(), Screen::SelectingVariant);
        assert_eq!(c.variant_cursor(), 2);

        c.handle(Action::Back);
        assert_eq!(c.screen(), Screen::SelectingTheme);
        assert_eq!(c.family_cursor(), 1);

        c.handle(Action::Confirm);
        assert_eq!(c.variant_cursor(), 2);
    }

    #[test]
    fn cursor_wraps_around() {
        let mut c = controller(vec![]);
        c.handle(Action::Up);
        assert_eq!(c.family_cursor(), 2);
        c.handle(Action::Down);
        assert_eq!(c.family_cursor(), 0);
    }

    #[tokio::test]
    async fn zero_targets_completes_with_empty_report() {
        let fake = FakeIntegration::new("A");
        let calls = fake.calls.clone();
        let mut c = controller(vec![fake]);
        c.handle(Action::Confirm);
        c.handle(Action::Confirm);
        assert_eq!(c.screen(), Screen::SelectingTargets);

        assert_eq!(c.dispatch(Action::Confirm).await, Step::Continue);
        assert_eq!(c.screen(), Screen::Complete);
        assert!(c.report().unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(c.handle(Action::Confirm), Step::Exit);
    }

    #[tokio::test]
    async fn toggled_targets_are_applied_and_reported_by_name() {
        let mut c = controller(vec![
            FakeIntegration::new("A"),
            FakeIntegration::new("B").not_installed(),
            FakeIntegration::new("C").failing("nope"),
        ]);
        c.handle(Action::Confirm);
        c.handle(Action::Confirm);
        for _ in 0..3 {
            c.handle(Action::Toggle);
            c.handle(Action::Down);
        }
        assert_eq!(c.handle(Action::Confirm), Step::Apply);
        let report = c.run_apply().await.clone();

        assert_eq!(c.screen(), Screen::Complete);
        assert_eq!(report.theme, "Nord");
        assert_eq!(
            report.outcome_for("A"),
            Some(&Outcome::Applied { notes: vec![] })
        );
        assert_eq!(report.outcome_for("B"), Some(&Outcome::SkippedNotInstalled));
        assert!(report.outcome_for("C").unwrap().is_failure());
        assert_eq!(c.chosen_target_names(), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn targets_with_several_variants_are_disambiguated_in_turn() {
        let mut c = controller(vec![
            FakeIntegration::new("Editor").with_variants(&["Stable", "Insiders"]),
            FakeIntegration::new("Single").with_variants(&["Only"]),
            FakeIntegration::new("Term").with_variants(&["One", "Two", "Three"]),
        ]);
        c.handle(Action::Confirm);
        c.handle(Action::Confirm);
        for _ in 0..3 {
            c.handle(Action::Toggle);
            c.handle(Action::Down);
        }

        assert_eq!(c.handle(Action::Confirm), Step::Continue);
        assert_eq!(c.screen(), Screen::SelectingTargetVariant);
        assert_eq!(c.pending_target().unwrap().0.name(), "Editor");
        c.handle(Action::Down);
        assert_eq!(c.handle(Action::Confirm), Step::Continue);

        assert_eq!(c.pending_target().unwrap().0.name(), "Term");
        assert_eq!(c.target_variant_cursor(), 0);
        c.handle(Action::Up);
        assert_eq!(c.handle(Action::Confirm), Step::Apply);
    }

    #[test]
    fn back_from_targets_clears_toggles() {
        let mut c = controller(vec![FakeIntegration::new("A")]);
        c.handle(Action::Confirm);
        c.handle(Action::Confirm);
        c.handle(Action::Toggle);
        assert!(c.is_toggled(0));
        c.handle(Action::Back);
        assert_eq!(c.screen(), Screen::PreviewingTheme);
        assert!(!c.is_toggled(0));
    }

    #[test]
    fn quit_exits_from_any_screen() {
        let mut c = controller(vec![]);
        c.handle(Action::Down);
        c.handle(Action::Confirm);
        assert_eq!(c.handle(Action::Quit), Step::Exit);
    }

    #[test]
    fn preferences_preselect_theme_and_targets() {
        let prefs = Preferences {
            last_theme: Some("Rose Pine Dawn".into()),
            enabled_apps: vec!["B".into(), "Gone".into()],
            ..Preferences::default()
        };
        let mut c = controller(vec![FakeIntegration::new("A"), FakeIntegration::new("B")])
            .with_preferences(&prefs);
        assert_eq!(c.family_cursor(), 2);
        assert!(c.is_toggled(1));
        assert!(!c.is_toggled(0));

        c.handle(Action::Confirm);
        assert_eq!(c.variant_cursor(), 2);
        c.handle(Action::Confirm);
        assert_eq!(c.theme().unwrap().name(), "Rose Pine Dawn");
    }
}
