//! Color preset registration in a property-list preference store.
//!
//! Registering replaces any entry with the same name: repeated merges into
//! an existing entry accumulate conflicting sub-keys.

use std::path::Path;
use tracing::debug;

use super::{ensure_success, CommandOutput, CommandRunner};
use crate::error::ToolError;

pub const PLIST_BUDDY: &str = "/usr/libexec/PlistBuddy";
pub const PRESETS_KEY: &str = "Custom Color Presets";

async fn plist_buddy(
    runner: &dyn CommandRunner,
    store: &Path,
    commands: &[String],
) -> Result<CommandOutput, ToolError> {
    let mut args = Vec::with_capacity(commands.len() * 2 + 1);
    for command in commands {
        args.push("-c".to_string());
        args.push(command.clone());
    }
    args.push(store.display().to_string());
    debug!(?commands, store = %store.display(), "PlistBuddy");
    runner.run(PLIST_BUDDY, &args, None).await
}

/// Register `preset_file` under `Custom Color Presets:<name>` in `store`.
pub async fn register_color_preset(
    runner: &dyn CommandRunner,
    store: &Path,
    name: &str,
    preset_file: &Path,
) -> Result<(), ToolError> {
    if !store.exists() {
        return Err(ToolError::Failed(format!(
            "preference store {} not found",
            store.display()
        )));
    }

    let presets = format!("\"{PRESETS_KEY}\"");
    let entry = format!("\"{PRESETS_KEY}:{name}\"");

    let listed = plist_buddy(runner, store, &[format!("Print {presets}")]).await?;
    if !listed.success() {
        let added = plist_buddy(runner, store, &[format!("Add {presets} dict")]).await?;
        ensure_success(added, "create color preset dictionary")?;
    }

    let existing = plist_buddy(runner, store, &[format!("Print {entry}")]).await?;
    if existing.success() {
        let deleted = plist_buddy(runner, store, &[format!("Delete {entry}")]).await?;
        ensure_success(deleted, "remove previous color preset")?;
    }

    let merged = plist_buddy(
        runner,
        store,
        &[
            format!("Add {entry} dict"),
            format!("Merge \"{}\" {entry}", preset_file.display()),
        ],
    )
    .await?;
    ensure_success(merged, "import color preset")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{RecordingRunner, TestTempDir};

    fn commands(call: &[String]) -> Vec<&str> {
        call.iter()
            .enumerate()
            .filter(|(i, _)| *i > 0 && call[i - 1] == "-c")
            .map(|(_, c)| c.as_str())
            .collect()
    }

    #[tokio::test]
    async fn existing_entry_is_deleted_before_merge() {
        let tmp = TestTempDir::new("plistbuddy-replace");
        let store = tmp.write_text("prefs.plist", "<plist/>");
        let runner = RecordingRunner::new().respond(PLIST_BUDDY, 0, "", "");
        register_color_preset(&runner, &store, "Nord", Path::new("/p/Nord.itermcolors"))
            .await
            .unwrap();

        let issued: Vec<Vec<String>> = runner.calls();
        let flat: Vec<Vec<&str>> = issued.iter().map(|c| commands(c)).collect();
        assert_eq!(
            flat,
            vec![
                vec!["Print \"Custom Color Presets\""],
                vec!["Print \"Custom Color Presets:Nord\""],
                vec!["Delete \"Custom Color Presets:Nord\""],
                vec![
                    "Add \"Custom Color Presets:Nord\" dict",
                    "Merge \"/p/Nord.itermcolors\" \"Custom Color Presets:Nord\"",
                ],
            ]
        );
        assert!(issued.iter().all(|c| c.last().unwrap() == &store.display().to_string()));
    }

    #[tokio::test]
    async fn missing_dictionary_is_created_and_no_delete_happens() {
        let tmp = TestTempDir::new("plistbuddy-fresh");
        let store = tmp.write_text("prefs.plist", "<plist/>");
        let runner = RecordingRunner::new()
            .respond_when(PLIST_BUDDY, "Print", 1, "", "Does Not Exist")
            .respond(PLIST_BUDDY, 0, "", "");
        register_color_preset(&runner, &store, "Nord", Path::new("/p/n.itermcolors"))
            .await
            .unwrap();
        let flat: Vec<String> = runner
            .calls()
            .iter()
            .flat_map(|c| commands(c).into_iter().map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert!(flat.contains(&"Add \"Custom Color Presets\" dict".to_string()));
        assert!(!flat.iter().any(|c| c.starts_with("Delete")));
    }

    #[tokio::test]
    async fn missing_store_fails_without_running_anything() {
        let tmp = TestTempDir::new("plistbuddy-missing");
        let runner = RecordingRunner::new().respond(PLIST_BUDDY, 0, "", "");
        let err = register_color_preset(&runner, &tmp.child("none.plist"), "x", Path::new("p"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(runner.calls().is_empty());
    }
}
