//! Shared fixtures for end-to-end tests: a rooted host layout and a command
//! runner that never spawns anything.

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use zakaranda::config::{HostPaths, Platform};
use zakaranda::error::ToolError;
use zakaranda::integrations::AdapterEnv;
use zakaranda::tools::{CommandOutput, CommandRunner};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fake home directory removed on drop.
pub struct Home {
    pub root: PathBuf,
}

impl Home {
    pub fn new(prefix: &str) -> Self {
        let root = std::env::temp_dir().join(format!(
            "zakaranda-e2e-{prefix}-{}-{}",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&root).expect("create fake home");
        Self { root }
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.join(relative)).expect("read fixture")
    }

    pub fn paths(&self) -> HostPaths {
        HostPaths::rooted_at(&self.root, Platform::Linux)
    }

    /// Every file under the home, relative and sorted.
    pub fn files(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(&self.root, &self.root, &mut out);
        out.sort();
        out
    }

    /// Files in `relative_dir` whose names contain `.backup`.
    pub fn backups_in(&self, relative_dir: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.root.join(relative_dir)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.contains(".backup"))
            .collect();
        names.sort();
        names
    }
}

fn collect(root: &Path, dir: &Path, out: &mut Vec<String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            out.push(rel.to_string_lossy().to_string());
        }
    }
}

impl Drop for Home {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

/// Runner for which every program is missing; calls are recorded.
#[derive(Debug, Default)]
pub struct OfflineRunner {
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl CommandRunner for OfflineRunner {
    async fn run(
        &self,
        program: &str,
        _args: &[String],
        _stdin: Option<&[u8]>,
    ) -> Result<CommandOutput, ToolError> {
        self.calls.lock().expect("calls").push(program.to_string());
        Err(ToolError::NotFound(program.to_string()))
    }

    fn locate(&self, _program: &str) -> Option<PathBuf> {
        None
    }
}

pub fn offline_env(home: &Home) -> (AdapterEnv, Arc<OfflineRunner>) {
    let runner = Arc::new(OfflineRunner::default());
    let sink: Box<dyn Write + Send> = Box::new(std::io::sink());
    let env = AdapterEnv::new(home.paths(), runner.clone())
        .with_terminal(Arc::new(tokio::sync::Mutex::new(sink)));
    (env, runner)
}
