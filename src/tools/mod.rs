//! External tool invoker.
//!
//! Adapters never spawn processes directly; they go through a
//! [`CommandRunner`] so every call is best-effort and replaceable in tests.
//! The helpers in the submodules turn failures into [`ToolError`] values
//! that callers downgrade to manual-recovery notes.

pub mod clipboard;
pub mod git;
pub mod open;
pub mod plist_buddy;
pub mod process;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::ToolError;

pub use process::{ensure_success, SystemRunner};

/// Captured result of one finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Subprocess boundary used by adapters.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion, optionally feeding stdin.
    ///
    /// A missing executable is reported as [`ToolError::NotFound`]; a
    /// non-zero exit is *not* an error here (see [`ensure_success`]).
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError>;

    /// Like [`CommandRunner::run`], but stdout and stderr are discarded.
    ///
    /// For tools that leave a forked child holding their output (clipboard
    /// owners, URI openers). Only the exit code is reported.
    async fn run_uncaptured(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        self.run(program, args, stdin).await
    }

    /// Resolve an executable on `PATH`.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Resolve `program` on `PATH` with `which`.
pub fn find_executable(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}

/// Convert borrowed string arguments into the owned form `run` takes.
pub fn args<const N: usize>(items: [&str; N]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
