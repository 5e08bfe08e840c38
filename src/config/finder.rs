//! Root configuration file discovery.
//!
//! Walks from a start directory up to the filesystem root looking for the
//! first known config file name. `AQUA_CONFIG` overrides the search.

use crate::error::{ReaderError, ReaderResult};
use crate::fs::FileSystem;
use crate::paths::absolutize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names checked in each directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "aqua.yaml",
    "aqua.yml",
    ".aqua.yaml",
    ".aqua.yml",
    "aqua/aqua.yaml",
    ".aqua/aqua.yaml",
];

/// Locates the root configuration file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFinder {
    /// Explicit config path that bypasses the directory walk
    explicit: Option<PathBuf>,
}

impl ConfigFinder {
    /// Finder honoring `AQUA_CONFIG`.
    pub fn discover() -> Self {
        let explicit = std::env::var("AQUA_CONFIG")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        Self { explicit }
    }

    pub fn with_explicit(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Find the root config for `start_dir`.
    ///
    /// An explicit path is resolved against `start_dir` and must exist.
    pub fn find<F: FileSystem + ?Sized>(&self, fs: &F, start_dir: &Path) -> ReaderResult<PathBuf> {
        let start_dir = fs
            .absolute(start_dir)
            .unwrap_or_else(|_| start_dir.to_path_buf());

        if let Some(ref explicit) = self.explicit {
            let path = absolutize(&start_dir, explicit);
            if fs.exists(&path) {
                return Ok(path);
            }
            return Err(ReaderError::not_found(path));
        }

        for dir in start_dir.ancestors() {
            for name in CONFIG_FILE_NAMES {
                let candidate = dir.join(name);
                if fs.exists(&candidate) {
                    debug!(path = %candidate.display(), "Found configuration file");
                    return Ok(candidate);
                }
            }
        }

        Err(ReaderError::not_found(start_dir.join(CONFIG_FILE_NAMES[0])))
    }
}
