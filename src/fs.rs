//! Filesystem access used by the config reader.
//!
//! The reader only ever reads. Two implementations are provided:
//! - [`OsFileSystem`] - the real disk, with glob expansion via the `glob` crate
//! - [`MemoryFileSystem`] - an in-memory file map for tests and embedders

use crate::error::{ReaderError, ReaderResult};
use crate::paths::{absolutize, normalize_path_components};
use glob::{MatchOptions, Pattern};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Glob semantics shared by both implementations: `*` never crosses a
/// path separator and dotfiles are matched like any other name.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Read-only filesystem operations needed to resolve imports.
pub trait FileSystem {
    /// Whether a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Expand an absolute glob pattern into the matching files.
    ///
    /// Order is unspecified; callers sort.
    fn glob(&self, pattern: &str) -> ReaderResult<Vec<PathBuf>>;

    /// Best-effort absolute, lexically normalized form of `path`.
    fn absolute(&self, path: &Path) -> io::Result<PathBuf>;
}

/// The process filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn glob(&self, pattern: &str) -> ReaderResult<Vec<PathBuf>> {
        let entries = glob::glob_with(pattern, MATCH_OPTIONS)
            .map_err(|e| ReaderError::glob(pattern, e))?;

        let mut matches = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| ReaderError::glob(pattern, e))?;
            if path.is_file() {
                matches.push(path);
            }
        }
        Ok(matches)
    }

    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path).map(|p| normalize_path_components(&p))
    }
}

/// In-memory filesystem keyed by absolute path.
///
/// Relative paths are interpreted against `cwd` (default `/`).
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: BTreeMap<PathBuf, String>,
    cwd: PathBuf,
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            cwd: PathBuf::from("/"),
        }
    }

    /// Build a filesystem from `(path, content)` pairs.
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<Path>,
        C: Into<String>,
    {
        let mut fs = Self::new();
        for (path, content) in files {
            fs.insert(path, content);
        }
        fs
    }

    /// Set the directory relative paths resolve against.
    pub fn with_cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = absolutize(Path::new("/"), cwd.as_ref());
        self
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = absolutize(&self.cwd, path.as_ref());
        self.files.insert(path, content.into());
    }

    /// Number of files held.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn key(&self, path: &Path) -> PathBuf {
        absolutize(&self.cwd, path)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(&self.key(path))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(&self.key(path)).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })
    }

    fn glob(&self, pattern: &str) -> ReaderResult<Vec<PathBuf>> {
        let pattern = Pattern::new(pattern).map_err(|e| ReaderError::glob(pattern, e))?;
        Ok(self
            .files
            .keys()
            .filter(|path| pattern.matches_path_with(path, MATCH_OPTIONS))
            .cloned()
            .collect())
    }

    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(self.key(path))
    }
}
