//! Compile-time build metadata exposed to the CLI.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("ZAKARANDA_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("ZAKARANDA_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `zakaranda --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("ZAKARANDA_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("ZAKARANDA_BUILD_TIMESTAMP")
);

/// `--version` text: version followed by commit and build time.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("ZAKARANDA_BUILD_GIT_HASH"),
    "\nbuilt: ",
    env!("ZAKARANDA_BUILD_TIMESTAMP")
);

/// One-line metadata shown in the picker header.
pub fn header_metadata_line() -> String {
    format!("v{VERSION} ({GIT_COMMIT})")
}
