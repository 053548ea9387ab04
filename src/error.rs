//! Unified error types for theme loading, document merging, and apply.

use std::fmt;
use std::path::PathBuf;

use crate::document::Format;

// ---------------------------------------------------------------------------
// ThemeError
// ---------------------------------------------------------------------------

/// Errors raised while building or loading a theme.
#[derive(Debug)]
pub enum ThemeError {
    /// A palette slot did not hold a `#rgb`/`#rrggbb` color.
    InvalidColor { slot: String, value: String },
    Io(std::io::Error),
    /// A theme document could not be decoded.
    Parse { path: PathBuf, message: String },
    /// The file extension does not name a supported theme format.
    UnsupportedFormat(PathBuf),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColor { slot, value } => {
                write!(f, "invalid color for `{slot}`: {value:?}")
            }
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            Self::UnsupportedFormat(path) => {
                write!(f, "unsupported theme file: {}", path.display())
            }
        }
    }
}

impl std::error::Error for ThemeError {}

impl From<std::io::Error> for ThemeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// DocumentError
// ---------------------------------------------------------------------------

/// Errors from the config merge/backup engine.
#[derive(Debug)]
pub enum DocumentError {
    /// The existing file exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The existing file could not be decoded in its format.
    Parse {
        path: PathBuf,
        format: Format,
        message: String,
    },
    /// The decoded top-level value is not a mapping.
    NotAMapping { path: PathBuf },
    /// The `.backup` sibling could not be written.
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The merged document could not be encoded.
    Encode { format: Format, message: String },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            Self::Parse {
                path,
                format,
                message,
            } => write!(f, "failed to parse {} as {format}: {message}", path.display()),
            Self::NotAMapping { path } => {
                write!(f, "{} does not contain a top-level mapping", path.display())
            }
            Self::Backup { path, source } => {
                write!(f, "failed to write backup {}: {source}", path.display())
            }
            Self::Encode { format, message } => write!(f, "failed to encode {format}: {message}"),
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DocumentError {}

// ---------------------------------------------------------------------------
// ToolError
// ---------------------------------------------------------------------------

/// Errors from external tool invocations.
#[derive(Debug)]
pub enum ToolError {
    /// The executable is not available on this system.
    NotFound(String),
    /// The process could not be started or awaited.
    Spawn { program: String, message: String },
    /// The process ran and reported failure.
    Failed(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(program) => write!(f, "`{program}` is not available"),
            Self::Spawn { program, message } => write!(f, "{program}: {message}"),
            Self::Failed(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for ToolError {}

// ---------------------------------------------------------------------------
// ApplyError
// ---------------------------------------------------------------------------

/// Failure of a single target's apply. Converted into an outcome by the
/// registry; never aborts the batch.
#[derive(Debug)]
pub enum ApplyError {
    NotInstalled,
    Document(DocumentError),
    Tool(ToolError),
    /// The target needs a curated asset for this theme and has no fallback.
    NoOfficialAsset { theme: String, instructions: String },
    Io { context: String, source: std::io::Error },
}

impl ApplyError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl fmt::Display for ApplyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled => write!(f, "not installed"),
            Self::Document(e) => write!(f, "{e}"),
            Self::Tool(e) => write!(f, "{e}"),
            Self::NoOfficialAsset {
                theme,
                instructions,
            } => {
                write!(f, "no official asset for `{theme}`")?;
                if !instructions.is_empty() {
                    write!(f, "\n{instructions}")?;
                }
                Ok(())
            }
            Self::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl std::error::Error for ApplyError {}

impl From<DocumentError> for ApplyError {
    fn from(e: DocumentError) -> Self {
        Self::Document(e)
    }
}

impl From<ToolError> for ApplyError {
    fn from(e: ToolError) -> Self {
        Self::Tool(e)
    }
}

// ---------------------------------------------------------------------------
// PreferencesError
// ---------------------------------------------------------------------------

/// Errors when loading or saving user preferences.
#[derive(Debug)]
pub enum PreferencesError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Invalid(msg) => write!(f, "invalid preferences: {msg}"),
        }
    }
}

impl std::error::Error for PreferencesError {}

impl From<std::io::Error> for PreferencesError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for PreferencesError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

// ---------------------------------------------------------------------------
// ControllerError
// ---------------------------------------------------------------------------

/// Errors that prevent the interactive controller from running at all.
#[derive(Debug)]
pub enum ControllerError {
    /// No themes to choose from.
    EmptyCatalog,
    /// Stdin/stderr are not an interactive terminal.
    NotATerminal,
    Terminal(std::io::Error),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "theme catalog is empty"),
            Self::NotATerminal => write!(f, "an interactive terminal is required"),
            Self::Terminal(e) => write!(f, "terminal: {e}"),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<std::io::Error> for ControllerError {
    fn from(e: std::io::Error) -> Self {
        Self::Terminal(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_error_display_invalid_color() {
        let e = ThemeError::InvalidColor {
            slot: "background".into(),
            value: "#12".into(),
        };
        assert_eq!(e.to_string(), "invalid color for `background`: \"#12\"");
    }

    #[test]
    fn document_error_display_not_a_mapping() {
        let e = DocumentError::NotAMapping {
            path: PathBuf::from("/tmp/settings.json"),
        };
        assert_eq!(
            e.to_string(),
            "/tmp/settings.json does not contain a top-level mapping"
        );
    }

    #[test]
    fn document_error_display_parse_names_format() {
        let e = DocumentError::Parse {
            path: PathBuf::from("a.toml"),
            format: Format::Toml,
            message: "expected `=`".into(),
        };
        assert_eq!(e.to_string(), "failed to parse a.toml as TOML: expected `=`");
    }

    #[test]
    fn tool_error_display_not_found() {
        assert_eq!(
            ToolError::NotFound("git".into()).to_string(),
            "`git` is not available"
        );
    }

    #[test]
    fn apply_error_no_official_asset_includes_instructions() {
        let e = ApplyError::NoOfficialAsset {
            theme: "Nord".into(),
            instructions: "install it".into(),
        };
        assert_eq!(e.to_string(), "no official asset for `Nord`\ninstall it");
    }

    #[test]
    fn apply_error_from_document_error() {
        let e: ApplyError = DocumentError::NotAMapping {
            path: PathBuf::from("x"),
        }
        .into();
        assert!(matches!(e, ApplyError::Document(_)));
    }

    #[test]
    fn apply_error_from_tool_error() {
        let e: ApplyError = ToolError::Failed("boom".into()).into();
        assert!(matches!(e, ApplyError::Tool(_)));
        assert_eq!(e.to_string(), "execution failed: boom");
    }

    #[test]
    fn preferences_error_from_io() {
        let e: PreferencesError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(e.to_string().starts_with("io: "));
    }

    #[test]
    fn controller_error_display_empty_catalog() {
        assert_eq!(
            ControllerError::EmptyCatalog.to_string(),
            "theme catalog is empty"
        );
    }
}
