//! End-to-end apply runs against the built-in registry, rooted in a fake
//! home directory with every external tool missing.

mod harness;

use harness::{offline_env, Home};
use serde_json::Value;
use zakaranda::integrations::{IntegrationRegistry, Outcome};
use zakaranda::theme::{Catalog, Theme};

const ALACRITTY_TOML: &str = "[font]\nsize = 12.0\n\n[colors.primary]\nbackground = \"#000000\"\n";
const STARSHIP_TOML: &str = "add_newline = false\n";

fn index_of(registry: &IntegrationRegistry, name: &str) -> usize {
    registry
        .position(name)
        .unwrap_or_else(|| panic!("{name} is registered"))
}

fn mocha() -> Theme {
    Catalog::builtin().find_theme("Catppuccin Mocha").unwrap()
}

#[tokio::test]
async fn applying_twice_is_idempotent_with_a_single_backup() {
    let home = Home::new("idempotent");
    home.write(".config/alacritty/alacritty.toml", ALACRITTY_TOML);
    home.write(".config/starship.toml", STARSHIP_TOML);
    let (env, _runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);
    let targets = [
        index_of(&registry, "Alacritty"),
        index_of(&registry, "Starship"),
    ];

    let first = registry.apply_selected(&targets, &mocha()).await;
    assert_eq!(first.failures(), 0, "{first:?}");
    assert_eq!(
        home.read(".config/alacritty/alacritty.toml.backup"),
        ALACRITTY_TOML
    );
    assert_eq!(home.read(".config/starship.toml.backup"), STARSHIP_TOML);
    let alacritty_once = home.read(".config/alacritty/alacritty.toml");
    let starship_once = home.read(".config/starship.toml");

    let second = registry.apply_selected(&targets, &mocha()).await;
    assert_eq!(second.failures(), 0, "{second:?}");
    assert_eq!(home.read(".config/alacritty/alacritty.toml"), alacritty_once);
    assert_eq!(home.read(".config/starship.toml"), starship_once);
    assert_eq!(
        home.backups_in(".config/alacritty"),
        vec!["alacritty.toml.backup".to_string()]
    );
    assert_eq!(
        home.backups_in(".config"),
        vec!["starship.toml.backup".to_string()]
    );

    // Unrelated keys survive, the colors section is replaced wholesale.
    let doc: toml::Value = toml::from_str(&alacritty_once).unwrap();
    assert_eq!(doc["font"]["size"].as_float(), Some(12.0));
    assert_eq!(
        doc["colors"]["primary"]["background"].as_str(),
        Some("#1e1e2e")
    );
    assert!(doc["colors"].get("normal").is_some());
}

#[tokio::test]
async fn offline_alacritty_falls_back_to_inline_colors_with_a_note() {
    let home = Home::new("alacritty-offline");
    home.write(".config/alacritty/alacritty.toml", ALACRITTY_TOML);
    let (env, runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);

    let report = registry
        .apply_selected(&[index_of(&registry, "Alacritty")], &mocha())
        .await;

    match report.outcome_for("Alacritty") {
        Some(Outcome::Applied { notes }) => {
            assert!(notes.iter().any(|n| n.contains("alacritty-theme")));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(runner.calls.lock().unwrap().as_slice(), ["git".to_string()]);
}

#[tokio::test]
async fn not_installed_target_is_skipped_without_writes() {
    let home = Home::new("skip");
    let (env, runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);

    let report = registry
        .apply_selected(&[index_of(&registry, "Warp")], &mocha())
        .await;

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].outcome, Outcome::SkippedNotInstalled);
    assert!(home.files().is_empty(), "{:?}", home.files());
    assert!(runner.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn vscode_fallback_extends_customizations_and_keeps_settings() {
    let home = Home::new("vscode");
    let settings = "Library/Application Support/Code/User/settings.json";
    home.write(
        settings,
        r##"{
  // user settings
  "editor.fontSize": 14,
  /* keep me */
  "workbench.colorCustomizations": { "minimap.background": "#101010" }
}
"##,
    );
    let (env, _runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);
    let midnight = Theme::new("Midnight", "custom", *mocha().palette());

    let report = registry
        .apply_selected(&[index_of(&registry, "VS Code")], &midnight)
        .await;
    assert_eq!(
        report.outcome_for("VS Code"),
        Some(&Outcome::Applied { notes: vec![] })
    );

    let written: Value = serde_json::from_str(&home.read(settings)).unwrap();
    assert_eq!(written["editor.fontSize"], 14);
    let colors = &written["workbench.colorCustomizations"];
    assert_eq!(colors["minimap.background"], "#101010");
    assert_eq!(colors["terminal.ansiRed"], "#f38ba8");
    assert_eq!(colors["editor.background"], "#1e1e2e");
}

#[tokio::test]
async fn zed_without_extension_fails_but_the_batch_continues() {
    let home = Home::new("zed");
    home.write(".config/zed/settings.json", "{\"vim_mode\": true}\n");
    home.write(".config/starship.toml", STARSHIP_TOML);
    let (env, _runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);
    let targets = [index_of(&registry, "Zed"), index_of(&registry, "Starship")];

    let report = registry.apply_selected(&targets, &mocha()).await;

    match report.outcome_for("Zed") {
        Some(Outcome::Failed { reason }) => {
            assert!(reason.contains("zed://extensions/catppuccin"), "{reason}");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert!(matches!(
        report.outcome_for("Starship"),
        Some(Outcome::Applied { .. })
    ));
    assert_eq!(home.read(".config/zed/settings.json"), "{\"vim_mode\": true}\n");
}

#[tokio::test]
async fn vscode_official_theme_applied_twice_is_stable() {
    let home = Home::new("vscode-twice");
    let dir = "Library/Application Support/Code/User";
    let settings = format!("{dir}/settings.json");
    home.write(&settings, "{\n  // mine\n  \"editor.fontSize\": 13\n}\n");
    let (env, _runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);
    let vscode = [index_of(&registry, "VS Code")];

    let first = registry.apply_selected(&vscode, &mocha()).await;
    assert!(
        matches!(first.outcome_for("VS Code"), Some(Outcome::Applied { .. })),
        "{first:?}"
    );
    let once = home.read(&settings);
    let second = registry.apply_selected(&vscode, &mocha()).await;
    assert_eq!(second.failures(), 0, "{second:?}");

    assert_eq!(home.read(&settings), once);
    assert_eq!(home.backups_in(dir), vec!["settings.json.backup".to_string()]);
    let written: Value = serde_json::from_str(&once).unwrap();
    assert_eq!(written["editor.fontSize"], 13);
    assert_eq!(written["workbench.colorTheme"], "Catppuccin Mocha");
}

#[cfg(unix)]
#[tokio::test]
async fn symlinked_config_is_updated_through_the_link() {
    let home = Home::new("symlink");
    let dotfile = home.write("dotfiles/alacritty.toml", "[font]\nsize = 12\n");
    let link = home.root.join(".config/alacritty/alacritty.toml");
    std::fs::create_dir_all(link.parent().unwrap()).unwrap();
    std::os::unix::fs::symlink(&dotfile, &link).unwrap();
    let (env, _runner) = offline_env(&home);
    let registry = IntegrationRegistry::builtin(&env);

    let report = registry
        .apply_selected(&[index_of(&registry, "Alacritty")], &mocha())
        .await;
    assert!(matches!(
        report.outcome_for("Alacritty"),
        Some(Outcome::Applied { .. })
    ));

    assert!(std::fs::symlink_metadata(&link)
        .unwrap()
        .file_type()
        .is_symlink());
    let doc: toml::Value = toml::from_str(&home.read("dotfiles/alacritty.toml")).unwrap();
    assert_eq!(doc["font"]["size"].as_integer(), Some(12));
    assert_eq!(
        doc["colors"]["primary"]["background"].as_str(),
        Some("#1e1e2e")
    );
}
