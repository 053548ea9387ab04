//! Best-effort opening of paths and URIs with the platform handler.

use super::{ensure_success, CommandRunner};
use crate::error::ToolError;

/// Platform opener command and its leading arguments.
pub fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/c", "start"])
    } else {
        ("xdg-open", &[])
    }
}

/// Hand `uri` to the platform opener.
///
/// Output is not captured: the handler it launches may outlive the opener.
pub async fn open_uri(runner: &dyn CommandRunner, uri: &str) -> Result<(), ToolError> {
    let (program, lead) = opener();
    let mut args: Vec<String> = lead.iter().map(|s| s.to_string()).collect();
    args.push(uri.to_string());
    let output = runner.run_uncaptured(program, &args, None).await?;
    ensure_success(output, &format!("{program} {uri}"))?;
    Ok(())
}
