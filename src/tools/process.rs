//! Process execution on the local machine.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::{CommandOutput, CommandRunner};
use crate::error::ToolError;

/// Production runner backed by `tokio::process`.
///
/// There is no internal deadline: a hung child blocks its caller until the
/// process exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        run_process(program, args, stdin).await
    }

    async fn run_uncaptured(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        run_process_uncaptured(program, args, stdin).await
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        super::find_executable(program)
    }
}

/// Spawn and wait for a process, optionally piping stdin.
pub async fn run_process(
    program: &str,
    args: &[String],
    stdin: Option<&[u8]>,
) -> Result<CommandOutput, ToolError> {
    debug!(program, ?args, "spawning");
    let mut cmd = Command::new(program);
    // The apply phase may be dropped on quit; take the child down with it.
    cmd.kill_on_drop(true);
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;

    if let Some(input) = stdin {
        if let Some(mut child_stdin) = child.stdin.take() {
            child_stdin
                .write_all(input)
                .await
                .map_err(|e| spawn_error(program, e))?;
        }
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| spawn_error(program, e))?;

    Ok(CommandOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Spawn and wait for a process whose stdout and stderr go to the null device.
///
/// Waits for `program` itself only; children it forks do not hold the call.
pub async fn run_process_uncaptured(
    program: &str,
    args: &[String],
    stdin: Option<&[u8]>,
) -> Result<CommandOutput, ToolError> {
    debug!(program, ?args, "spawning without capture");
    let mut cmd = Command::new(program);
    cmd.kill_on_drop(true);
    cmd.args(args).stdout(Stdio::null()).stderr(Stdio::null());
    cmd.stdin(if stdin.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });

    let mut child = cmd.spawn().map_err(|e| spawn_error(program, e))?;

    if let Some(input) = stdin {
        if let Some(mut child_stdin) = child.stdin.take() {
            child_stdin
                .write_all(input)
                .await
                .map_err(|e| spawn_error(program, e))?;
            // Closing stdin signals end of input.
            drop(child_stdin);
        }
    }

    let status = child.wait().await.map_err(|e| spawn_error(program, e))?;
    Ok(CommandOutput {
        exit_code: status.code().unwrap_or(-1),
        ..CommandOutput::default()
    })
}

fn spawn_error(program: &str, e: std::io::Error) -> ToolError {
    if e.kind() == std::io::ErrorKind::NotFound {
        ToolError::NotFound(program.to_string())
    } else {
        ToolError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        }
    }
}

/// Convert a non-zero exit into a contextual error.
pub fn ensure_success(output: CommandOutput, context: &str) -> Result<CommandOutput, ToolError> {
    if output.exit_code == 0 {
        return Ok(output);
    }

    let mut details = if output.stderr.trim().is_empty() {
        output.stdout.trim().to_string()
    } else {
        output.stderr.trim().to_string()
    };
    if details.is_empty() {
        details = format!("command exited with {}", output.exit_code);
    }

    Err(ToolError::Failed(format!("{context}: {details}")))
}
