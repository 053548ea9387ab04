//! Clipboard writes through external tools, with an OSC 52 fallback.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use tracing::debug;

use super::{ensure_success, CommandRunner};
use crate::error::ToolError;

/// Clipboard tools tried in order, with their arguments.
const CLIPBOARD_TOOLS: &[(&str, &[&str])] = &[
    ("pbcopy", &[]),
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("clip", &[]),
];

/// How the text reached the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardMethod {
    /// Piped into the named tool.
    Tool(String),
    /// Written as an OSC 52 escape to the terminal.
    Osc52,
}

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text.as_bytes()))
}

/// Copy `text` with the first clipboard tool that succeeds, else emit OSC 52
/// to `terminal`.
///
/// A tool that is missing or fails hands over to the next candidate. An
/// error is returned only when the OSC 52 write fails too.
pub async fn copy_to_clipboard(
    runner: &dyn CommandRunner,
    text: &str,
    terminal: &mut (dyn Write + Send),
) -> Result<ClipboardMethod, ToolError> {
    let mut failures = Vec::new();
    for (program, tool_args) in CLIPBOARD_TOOLS {
        if runner.locate(program).is_none() {
            continue;
        }
        let args: Vec<String> = tool_args.iter().map(|s| s.to_string()).collect();
        let result = runner
            .run_uncaptured(program, &args, Some(text.as_bytes()))
            .await
            .and_then(|output| ensure_success(output, program));
        match result {
            Ok(_) => {
                debug!(program, "copied to clipboard");
                return Ok(ClipboardMethod::Tool((*program).to_string()));
            }
            Err(e) => {
                debug!(program, error = %e, "clipboard tool failed, trying next");
                failures.push(e.to_string());
            }
        }
    }

    terminal
        .write_all(osc52_sequence(text).as_bytes())
        .and_then(|_| terminal.flush())
        .map_err(|e| {
            failures.push(format!("OSC 52 clipboard write: {e}"));
            ToolError::Failed(failures.join("; "))
        })?;
    Ok(ClipboardMethod::Osc52)
}
