//! Non-destructive config merge/backup engine.
//!
//! A [`Document`] is read from disk, decoded into a format-neutral
//! [`Value`] tree, backed up beside the original, edited through the merge
//! policies below, and encoded back in its original format:
//!
//! - **overwrite-section** ([`Document::replace_section`],
//!   [`Document::replace_path`]): a sub-map is replaced wholesale.
//! - **preserve-and-extend** ([`Document::extend_preserving`]): keys already
//!   present win over the update set; an empty or missing map is populated.
//!
//! Keys outside the touched sections survive untouched. Comments in
//! JSON-with-comments files are stripped on read and not restored.

mod codec;
pub mod jsonc;

use indexmap::IndexMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocumentError;

/// Ordered string-keyed mapping.
pub type Map = IndexMap<String, Value>;

/// Format-neutral document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Unsigned values beyond `i64::MAX`.
    UInteger(u64),
    Float(f64),
    String(String),
    /// TOML/plist datetimes, kept as their canonical text.
    Datetime(String),
    /// Plist `<data>` blobs.
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Map),
}

impl Value {
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

/// Build a [`Map`] from `key => value` pairs, keeping their order.
#[macro_export]
macro_rules! doc_map {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::document::Map::new();
        $(map.insert(($key).to_string(), $crate::document::Value::from($value));)*
        map
    }};
}

/// Structural format of a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON that may contain comments and trailing commas.
    Json,
    Yaml,
    Toml,
    /// XML property list.
    Plist,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
            Format::Plist => "plist",
        })
    }
}

/// `<path>.backup`, next to the original.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}

/// Write through a temporary sibling and rename over the target.
///
/// Symlinks are followed: the file they point to is rewritten and the link
/// stays in place. An existing file keeps its permissions.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let permissions = fs::metadata(&target).ok().map(|meta| meta.permissions());

    let mut tmp = OsString::from(target.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    let result = match permissions {
        Some(permissions) => fs::set_permissions(&tmp, permissions),
        None => Ok(()),
    }
    .and_then(|()| fs::rename(&tmp, &target));
    result.inspect_err(|_| {
        let _ = fs::remove_file(&tmp);
    })
}

/// Copy `path` to its `.backup` sibling when it exists and is non-empty.
///
/// Returns the backup path when one was written. An existing backup is
/// overwritten, never versioned.
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>, DocumentError> {
    match fs::read(path) {
        Ok(bytes) if !bytes.is_empty() => write_backup(path, &bytes).map(Some),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DocumentError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_backup(path: &Path, bytes: &[u8]) -> Result<PathBuf, DocumentError> {
    let backup = backup_path(path);
    fs::write(&backup, bytes).map_err(|source| DocumentError::Backup {
        path: backup.clone(),
        source,
    })?;
    debug!(path = %backup.display(), "wrote backup");
    Ok(backup)
}

/// Keys already in `existing` win; `updates` fills in the rest.
pub fn merge_preserving(existing: Option<&Map>, updates: Map) -> Map {
    let mut merged = updates;
    if let Some(existing) = existing {
        for (key, value) in existing {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// A config file loaded for one read-modify-write cycle.
#[derive(Debug)]
pub struct Document {
    path: PathBuf,
    format: Format,
    root: Map,
    backup: Option<PathBuf>,
}

impl Document {
    /// Read, decode, and back up the file at `path`.
    ///
    /// A missing or blank file yields an empty document. Decode failures and
    /// non-mapping top levels are errors: nothing is written in that case.
    pub fn open(path: impl Into<PathBuf>, format: Format) -> Result<Self, DocumentError> {
        let path = path.into();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(DocumentError::Read { path, source }),
        };

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(e) => {
                return Err(DocumentError::Parse {
                    path,
                    format,
                    message: format!("not valid UTF-8: {e}"),
                })
            }
        };
        let root = if text.trim().is_empty() {
            Map::new()
        } else {
            match codec::decode(format, text) {
                Ok(Value::Map(map)) => map,
                Ok(_) => return Err(DocumentError::NotAMapping { path }),
                Err(message) => {
                    return Err(DocumentError::Parse {
                        path,
                        format,
                        message,
                    })
                }
            }
        };

        let backup = if bytes.is_empty() {
            None
        } else {
            Some(write_backup(&path, &bytes)?)
        };

        Ok(Self {
            path,
            format,
            root,
            backup,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Backup written by [`Document::open`], if the file had content.
    pub fn backup(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    pub fn root(&self) -> &Map {
        &self.root
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Look up a nested value by key path.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (last, parents) = path.split_last()?;
        let mut map = &self.root;
        for key in parents {
            map = map.get(*key)?.as_map()?;
        }
        map.get(*last)
    }

    /// Set a top-level scalar or value, keeping its position if present.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.root.insert(key.to_string(), value.into());
    }

    /// Remove a top-level key, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.root.shift_remove(key)
    }

    /// Remove a nested key; missing parents are not created.
    pub fn remove_path(&mut self, path: &[&str]) -> Option<Value> {
        let (last, parents) = path.split_last()?;
        let mut map = &mut self.root;
        for key in parents {
            match map.get_mut(*key) {
                Some(Value::Map(inner)) => map = inner,
                _ => return None,
            }
        }
        map.shift_remove(*last)
    }

    /// Overwrite-section: replace `key` wholesale.
    pub fn replace_section(&mut self, key: &str, section: Map) {
        self.root.insert(key.to_string(), Value::Map(section));
    }

    /// Overwrite a nested value, creating (or replacing non-map) parents.
    pub fn replace_path(&mut self, path: &[&str], value: impl Into<Value>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let map = section_at(&mut self.root, parents);
        map.insert((*last).to_string(), value.into());
    }

    /// Preserve-and-extend: merge `updates` under `key`, existing keys win.
    pub fn extend_preserving(&mut self, key: &str, updates: Map) {
        let merged = merge_preserving(self.root.get(key).and_then(Value::as_map), updates);
        self.root.insert(key.to_string(), Value::Map(merged));
    }

    /// Drop `key` when it holds an empty map.
    pub fn remove_if_empty(&mut self, key: &str) {
        if matches!(self.root.get(key), Some(Value::Map(map)) if map.is_empty()) {
            self.root.shift_remove(key);
        }
    }

    /// Encode in the original format.
    pub fn render(&self) -> Result<String, DocumentError> {
        codec::encode(self.format, &self.root).map_err(|message| DocumentError::Encode {
            format: self.format,
            message,
        })
    }

    /// Encode and write back, creating parent directories as needed.
    pub fn save(&self) -> Result<(), DocumentError> {
        let text = self.render()?;
        write_atomic(&self.path, text.as_bytes()).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), format = %self.format, "wrote document");
        Ok(())
    }
}

/// Walk (and create) nested maps along `path`.
fn section_at<'a>(root: &'a mut Map, path: &[&str]) -> &'a mut Map {
    let mut map = root;
    for key in path {
        let entry = map
            .entry((*key).to_string())
            .or_insert_with(|| Value::Map(Map::new()));
        if !matches!(entry, Value::Map(_)) {
            *entry = Value::Map(Map::new());
        }
        map = match entry {
            Value::Map(inner) => inner,
            _ => unreachable!("entry was just replaced with a map"),
        };
    }
    map
}
