//! CLI entry point for zakaranda.

mod app;
mod cli;

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};

use app::startup::{
    build_catalog, load_preferences, print_error, prune_backups, remember_apply,
};
use zakaranda::config::{config_root_dir, default_preferences_path, HostPaths};
use zakaranda::controller::Controller;
use zakaranda::integrations::{AdapterEnv, IntegrationRegistry};
use zakaranda::tools::SystemRunner;
use zakaranda::tui;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    let color = !args.no_color;

    let (Some(paths), Some(config_root), Some(prefs_path)) = (
        HostPaths::detect(),
        config_root_dir(),
        default_preferences_path(),
    ) else {
        print_error(color, "could not determine the home or config directory");
        std::process::exit(1);
    };

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| app::logging::default_log_path(&config_root));
    app::logging::init(&log_path);

    let mut prefs = load_preferences(&prefs_path, color);
    prune_backups(&prefs, &config_root);
    let catalog = build_catalog(&prefs, &config_root, args.themes_dir.as_deref());

    let env = AdapterEnv::new(paths, Arc::new(SystemRunner));
    let registry = IntegrationRegistry::builtin(&env);
    info!(
        families = catalog.families().len(),
        targets = registry.len(),
        "starting"
    );

    let mut controller = match Controller::new(catalog, registry) {
        Ok(controller) => controller.with_preferences(&prefs),
        Err(e) => {
            error!(error = %e, "controller failed to start");
            print_error(color, &e.to_string());
            std::process::exit(1);
        }
    };

    let result = tui::run(&mut controller, color).await;
    remember_apply(&mut prefs, &prefs_path, &controller);

    if let Err(e) = result {
        error!(error = %e, "interactive session failed");
        print_error(color, &e.to_string());
        std::process::exit(1);
    }
}
