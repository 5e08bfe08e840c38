//! Import chain tracking for cycle detection.
//!
//! An [`ImportChain`] is the stack of files currently being resolved, root
//! first. Entering a file returns a new chain; the receiver is left as is,
//! so sibling imports each extend the same parent chain.

use crate::error::{ReaderError, ReaderResult};
use crate::fs::FileSystem;
use crate::paths::relative_to;
use std::path::{Path, PathBuf};

/// Separator between files in a rendered cycle trail.
pub const TRAIL_SEPARATOR: &str = " -> ";

/// Files on the active resolution stack.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportChain {
    paths: Vec<PathBuf>,
}

impl ImportChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `path`, failing with `CircularImport` if it is already on the chain.
    ///
    /// The path is made absolute through `fs`. If that fails the path is
    /// used as given, so entering never fails on path resolution.
    pub fn enter<F: FileSystem + ?Sized>(&self, fs: &F, path: &Path) -> ReaderResult<ImportChain> {
        let abs = fs.absolute(path).unwrap_or_else(|_| path.to_path_buf());

        let mut paths = self.paths.clone();
        let cyclic = paths.contains(&abs);
        paths.push(abs);

        if cyclic {
            return Err(ReaderError::CircularImport {
                trail: format_trail(&paths),
            });
        }
        Ok(ImportChain { paths })
    }

    /// The file most recently entered.
    pub fn current(&self) -> Option<&Path> {
        self.paths.last().map(PathBuf::as_path)
    }

    /// The file resolution started from.
    pub fn root(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Render this chain as a trail.
    pub fn trail(&self) -> String {
        format_trail(&self.paths)
    }
}

/// Render paths relative to the root file's directory, joined by `" -> "`.
///
/// Paths with no relative form against that directory are shown absolute.
pub fn format_trail(chain: &[PathBuf]) -> String {
    let Some(root) = chain.first() else {
        return String::new();
    };
    let root_dir = root.parent().unwrap_or(root);

    chain
        .iter()
        .map(|p| match relative_to(root_dir, p) {
            Some(rel) => rel.to_string_lossy().into_owned(),
            None => p.to_string_lossy().into_owned(),
        })
        .collect::<Vec<_>>()
        .join(TRAIL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    fn fs() -> MemoryFileSystem {
        MemoryFileSystem::new().with_cwd("/home/workspace/foo")
    }

    #[test]
    fn test_enter_appends_absolute_path() {
        let fs = fs();
        let chain = ImportChain::new().enter(&fs, Path::new("aqua.yaml")).unwrap();
        assert_eq!(chain.paths(), &[PathBuf::from("/home/workspace/foo/aqua.yaml")]);

        let chain = chain
            .enter(&fs, Path::new("/home/workspace/foo/imports/../b.yaml"))
            .unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.current(), Some(Path::new("/home/workspace/foo/b.yaml")));
        assert_eq!(chain.root(), Some(Path::new("/home/workspace/foo/aqua.yaml")));
    }

    #[test]
    fn test_enter_leaves_receiver_untouched() {
        let fs = fs();
        let parent = ImportChain::new().enter(&fs, Path::new("aqua.yaml")).unwrap();
        let a = parent.enter(&fs, Path::new("a.yaml")).unwrap();
        let b = parent.enter(&fs, Path::new("b.yaml")).unwrap();
        assert_eq!(parent.len(), 1);
        assert_eq!(a.trail(), "aqua.yaml -> a.yaml");
        assert_eq!(b.trail(), "aqua.yaml -> b.yaml");
    }

    #[test]
    fn test_self_import_cycle() {
        let fs = fs();
        let chain = ImportChain::new().enter(&fs, Path::new("aqua.yaml")).unwrap();
        let err = chain.enter(&fs, Path::new("aqua.yaml")).unwrap_err();
        assert_eq!(err.cycle_trail(), Some("aqua.yaml -> aqua.yaml"));
        assert_eq!(err.to_string(), "circular import detected: aqua.yaml -> aqua.yaml");
    }

    #[test]
    fn test_three_file_cycle() {
        let fs = fs();
        let chain = ImportChain::new()
            .enter(&fs, Path::new("aqua.yaml"))
            .and_then(|c| c.enter(&fs, Path::new("b.yaml")))
            .and_then(|c| c.enter(&fs, Path::new("c.yaml")))
            .unwrap();
        let err = chain.enter(&fs, Path::new("aqua.yaml")).unwrap_err();
        assert_eq!(
            err.cycle_trail(),
            Some("aqua.yaml -> b.yaml -> c.yaml -> aqua.yaml")
        );
    }

    #[test]
    fn test_trail_uses_subdirectories_and_parents() {
        let chain = vec![
            PathBuf::from("/home/workspace/foo/aqua.yaml"),
            PathBuf::from("/home/workspace/foo/imports/b.yaml"),
            PathBuf::from("/home/workspace/shared/c.yaml"),
        ];
        assert_eq!(
            format_trail(&chain),
            "aqua.yaml -> imports/b.yaml -> ../shared/c.yaml"
        );
    }

    #[test]
    fn test_trail_falls_back_to_absolute() {
        let chain = vec![
            PathBuf::from("/home/workspace/foo/aqua.yaml"),
            PathBuf::from("relative/b.yaml"),
        ];
        assert_eq!(format_trail(&chain), "aqua.yaml -> relative/b.yaml");
    }

    #[test]
    fn test_empty_trail() {
        assert_eq!(format_trail(&[]), "");
        assert!(ImportChain::new().is_empty());
    }
}
