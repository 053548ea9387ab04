//! CLI argument parsing via clap.

use clap::Parser;
use std::path::PathBuf;

/// Apply one color theme across your terminal, editor, prompt and chat apps.
#[derive(Debug, Parser)]
#[command(
    name = "zakaranda",
    version = zakaranda::build_info::VERSION,
    long_version = zakaranda::build_info::LONG_VERSION,
    after_help = zakaranda::build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Write logs here instead of ~/.config/zakaranda/zakaranda.log.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Load custom themes from this directory for this run.
    #[arg(long = "themes-dir", value_name = "DIR")]
    pub themes_dir: Option<PathBuf>,
}
