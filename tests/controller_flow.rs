//! Drive the controller through whole sessions the way the TUI does, with
//! the built-in registry rooted in a fake home.

mod harness;

use harness::{offline_env, Home};
use serde_json::Value;
use zakaranda::config::Preferences;
use zakaranda::controller::{Action, Controller, Screen, Step};
use zakaranda::integrations::{IntegrationRegistry, Outcome};
use zakaranda::theme::Catalog;
use zakaranda::tui::view;

fn controller(home: &Home) -> Controller {
    let (env, _runner) = offline_env(home);
    Controller::new(Catalog::builtin(), IntegrationRegistry::builtin(&env)).unwrap()
}

async fn press(c: &mut Controller, actions: &[Action]) -> Step {
    let mut last = Step::Continue;
    for &action in actions {
        last = c.dispatch(action).await;
    }
    last
}

fn move_to_target(c: &mut Controller, name: &str) {
    let index = c.registry().position(name).unwrap();
    while c.target_cursor() != index {
        c.handle(Action::Down);
    }
}

#[tokio::test]
async fn nord_to_starship_applies_and_reports() {
    let home = Home::new("flow-starship");
    home.write(".config/starship.toml", "add_newline = false\n");
    let mut c = controller(&home);

    // Nord has a single variant: straight to the preview.
    press(&mut c, &[Action::Confirm]).await;
    assert_eq!(c.screen(), Screen::PreviewingTheme);
    press(&mut c, &[Action::Confirm]).await;
    assert_eq!(c.screen(), Screen::SelectingTargets);

    move_to_target(&mut c, "Starship");
    press(&mut c, &[Action::Toggle, Action::Confirm]).await;

    assert_eq!(c.screen(), Screen::Complete);
    let report = c.report().unwrap();
    assert_eq!(report.theme, "Nord");
    assert_eq!(
        report.outcome_for("Starship"),
        Some(&Outcome::Applied { notes: vec![] })
    );
    assert!(home.read(".config/starship.toml").contains("palette = 'nord'"));

    let screen = view::plain_text(&view::screen_lines(&c, 80));
    assert!(screen.contains("✅ Starship: applied"), "{screen}");
    assert_eq!(press(&mut c, &[Action::Confirm]).await, Step::Exit);
}

#[tokio::test]
async fn confirming_no_targets_touches_nothing() {
    let home = Home::new("flow-empty");
    home.write(".config/starship.toml", "add_newline = false\n");
    let mut c = controller(&home);

    press(&mut c, &[Action::Confirm, Action::Confirm, Action::Confirm]).await;

    assert_eq!(c.screen(), Screen::Complete);
    assert!(c.report().unwrap().is_empty());
    assert_eq!(home.files(), vec![".config/starship.toml".to_string()]);
}

#[tokio::test]
async fn two_vscode_channels_ask_which_one() {
    let home = Home::new("flow-vscode");
    let stable = "Library/Application Support/Code/User/settings.json";
    let insiders = "Library/Application Support/Code - Insiders/User/settings.json";
    home.write(stable, "{}\n");
    home.write(insiders, "{\"editor.fontSize\": 13}\n");
    let mut c = controller(&home);

    press(&mut c, &[Action::Confirm, Action::Confirm]).await;
    move_to_target(&mut c, "VS Code");
    press(&mut c, &[Action::Toggle, Action::Confirm]).await;

    assert_eq!(c.screen(), Screen::SelectingTargetVariant);
    let (_, variants) = c.pending_target().unwrap();
    let names: Vec<&str> = variants.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, ["VS Code", "VS Code Insiders"]);

    press(&mut c, &[Action::Down, Action::Confirm]).await;
    assert_eq!(c.screen(), Screen::Complete);

    // The CLI is missing, so extension installation becomes a follow-up note.
    assert!(matches!(
        c.report().unwrap().outcome_for("VS Code"),
        Some(Outcome::Applied { notes }) if !notes.is_empty()
    ));
    let written: Value = serde_json::from_str(&home.read(insiders)).unwrap();
    assert_eq!(written["editor.fontSize"], 13);
    assert!(written["workbench.colorTheme"].is_string());
    assert_eq!(home.read(stable), "{}\n");
}

#[tokio::test]
async fn remembered_preferences_preselect_theme_and_targets() {
    let home = Home::new("flow-prefs");
    home.write(".config/starship.toml", "");
    let prefs = Preferences {
        last_theme: Some("Catppuccin Latte".into()),
        enabled_apps: vec!["Starship".into()],
        ..Preferences::default()
    };
    let mut c = controller(&home).with_preferences(&prefs);

    press(&mut c, &[Action::Confirm]).await;
    assert_eq!(c.screen(), Screen::SelectingVariant);
    assert_eq!(c.variant_cursor(), 0);
    press(&mut c, &[Action::Confirm, Action::Confirm]).await;
    assert_eq!(c.theme().unwrap().name(), "Catppuccin Latte");
    assert!(c.is_toggled(c.registry().position("Starship").unwrap()));

    press(&mut c, &[Action::Confirm]).await;
    assert!(matches!(
        c.report().unwrap().outcome_for("Starship"),
        Some(Outcome::Applied { .. })
    ));
    assert!(home.read(".config/starship.toml").contains("palette = 'catppuccin_latte'"));
}

#[tokio::test]
async fn quit_is_available_everywhere() {
    let home = Home::new("flow-quit");
    let mut c = controller(&home);
    assert_eq!(press(&mut c, &[Action::Down, Action::Quit]).await, Step::Exit);
    assert!(c.report().is_none());
}
