//! Structured error types for configuration resolution.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // Input errors
    FileNotFound,
    ParseError,
    InvalidConfig,

    // Import graph errors
    CircularImport,
    GlobExpansionError,

    // Internal errors
    IoError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            ErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ErrorKind::ParseError => "PARSE_ERROR",
            ErrorKind::InvalidConfig => "INVALID_CONFIG",
            ErrorKind::CircularImport => "CIRCULAR_IMPORT",
            ErrorKind::GlobExpansionError => "GLOB_EXPANSION_ERROR",
            ErrorKind::IoError => "IO_ERROR",
        };
        write!(f, "{}", code)
    }
}

/// Errors raised while resolving a configuration file and its imports.
///
/// Every variant aborts the whole resolution. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The root file or an imported file does not exist.
    #[error("configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid configuration YAML.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An import re-enters a file that is already being resolved.
    #[error("circular import detected: {trail}")]
    CircularImport { trail: String },

    /// A glob pattern was malformed or its matches could not be listed.
    #[error("failed to expand import pattern '{pattern}': {message}")]
    GlobExpansion { pattern: String, message: String },

    /// A declaration is structurally valid YAML but cannot be interpreted.
    #[error("invalid configuration in {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    /// Context wrapper naming the import directive that failed.
    #[error("import '{spec}' from {}: {source}", from.display())]
    Import {
        from: PathBuf,
        spec: String,
        #[source]
        source: Box<ReaderError>,
    },
}

impl ReaderError {
    /// The error code of the underlying failure, looking through import context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReaderError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ReaderError::Io { .. } => ErrorKind::IoError,
            ReaderError::Parse { .. } => ErrorKind::ParseError,
            ReaderError::CircularImport { .. } => ErrorKind::CircularImport,
            ReaderError::GlobExpansion { .. } => ErrorKind::GlobExpansionError,
            ReaderError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            ReaderError::Import { source, .. } => source.kind(),
        }
    }

    /// Strip every `Import` wrapper and return the original failure.
    pub fn root_cause(&self) -> &ReaderError {
        let mut err = self;
        while let ReaderError::Import { source, .. } = err {
            err = source.as_ref();
        }
        err
    }

    /// The cycle trail, if this error is (or wraps) a circular import.
    pub fn cycle_trail(&self) -> Option<&str> {
        match self.root_cause() {
            ReaderError::CircularImport { trail } => Some(trail),
            _ => None,
        }
    }

    // Convenience constructors

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn glob(pattern: &str, err: impl fmt::Display) -> Self {
        Self::GlobExpansion {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

    pub fn within_import(self, from: impl Into<PathBuf>, spec: &str) -> Self {
        Self::Import {
            from: from.into(),
            spec: spec.to_string(),
            source: Box::new(self),
        }
    }
}

/// Result type for reader operations.
pub type ReaderResult<T> = std::result::Result<T, ReaderError>;
