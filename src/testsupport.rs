//! Shared test fixtures: temp directories and a scripted command runner.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ToolError;
use crate::tools::{CommandOutput, CommandRunner};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!(
            "zakaranda-{prefix}-{}-{millis}-{suffix}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }

    /// Create a child directory (and parents).
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.child(relative);
        fs::create_dir_all(&path).expect("failed to create fixture directory");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    /// Only match when some argument contains this text.
    needle: Option<String>,
    output: CommandOutput,
}

/// [`CommandRunner`] that records invocations and replays scripted output.
///
/// Programs without a rule behave as if not installed.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    rules: Vec<Rule>,
    executables: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

#[derive(Debug, Clone)]
struct Call {
    argv: Vec<String>,
    stdin: Option<String>,
    captured: bool,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to every call of `program` that no earlier rule matched.
    pub fn respond(mut self, program: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            needle: None,
            output: CommandOutput {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        });
        self
    }

    /// Reply to calls of `program` whose arguments mention `needle`.
    pub fn respond_when(
        mut self,
        program: &str,
        needle: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            needle: Some(needle.to_string()),
            output: CommandOutput {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        });
        self
    }

    /// Make `locate(program)` succeed.
    pub fn with_executable(mut self, program: &str) -> Self {
        self.executables.push(program.to_string());
        self
    }

    /// Every call so far as `[program, args...]`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|call| call.argv.clone())
            .collect()
    }

    /// Stdin passed to the `index`-th call.
    pub fn stdin_of(&self, index: usize) -> Option<String> {
        self.calls
            .lock()
            .expect("calls lock")
            .get(index)
            .and_then(|call| call.stdin.clone())
    }

    /// Whether the `index`-th call captured stdout and stderr.
    pub fn captured(&self, index: usize) -> Option<bool> {
        self.calls
            .lock()
            .expect("calls lock")
            .get(index)
            .map(|call| call.captured)
    }

    fn replay(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
        captured: bool,
    ) -> Result<CommandOutput, ToolError> {
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().cloned());
        let stdin = stdin.map(|bytes| String::from_utf8_lossy(bytes).to_string());
        self.calls.lock().expect("calls lock").push(Call {
            argv,
            stdin,
            captured,
        });

        self.rules
            .iter()
            .find(|rule| {
                rule.program == program
                    && rule
                        .needle
                        .as_ref()
                        .map_or(true, |needle| args.iter().any(|a| a.contains(needle.as_str())))
            })
            .map(|rule| rule.output.clone())
            .ok_or_else(|| ToolError::NotFound(program.to_string()))
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        self.replay(program, args, stdin, true)
    }

    async fn run_uncaptured(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        self.replay(program, args, stdin, false)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.executables
            .iter()
            .any(|p| p == program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.mkdir("a/b").is_dir());
    }

    #[tokio::test]
    async fn needle_rules_take_priority_in_declaration_order() {
        let runner = RecordingRunner::new()
            .respond_when("tool", "special", 2, "", "")
            .respond("tool", 0, "", "");
        let special = runner.run("tool", &["a special arg".into()], None).await.unwrap();
        let plain = runner.run("tool", &["plain".into()], None).await.unwrap();
        assert_eq!(special.exit_code, 2);
        assert_eq!(plain.exit_code, 0);
    }

    #[test]
    fn locate_only_knows_registered_executables() {
        let runner = RecordingRunner::new().with_executable("git");
        assert!(runner.locate("git").is_some());
        assert!(runner.locate("code").is_none());
    }
}
