//! Recursive configuration reader.
//!
//! Loads a root file, follows every `import` entry depth-first and merges
//! the imported packages and registries into one [`Config`]. Imports are
//! resolved against the importing file's directory. Glob imports are
//! expanded and sorted before each match is visited, and every concrete
//! path goes through [`ImportChain::enter`] before it is opened.

use super::chain::ImportChain;
use super::merge::{merge_imported, merge_registries};
use super::types::{Config, PackageEntry, RawConfig};
use crate::error::{ReaderError, ReaderResult};
use crate::fs::FileSystem;
use crate::paths::{absolutize, expand_home, has_glob_meta, is_home_relative};
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Process-level inputs for path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReaderParams {
    /// Directory substituted for a leading `~/` in import specs and local registry paths.
    pub home_dir: Option<PathBuf>,
}

impl ReaderParams {
    /// Home directory from `AQUA_HOME_DIR`, falling back to the user's home.
    pub fn discover() -> Self {
        let home_dir = std::env::var("AQUA_HOME_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);
        Self { home_dir }
    }

    pub fn with_home_dir(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: Some(home_dir.into()),
        }
    }
}

/// Per-file sub-configurations keyed by absolute path.
pub type FileConfigs = BTreeMap<PathBuf, Config>;

/// Collects side outputs of one top-level resolution.
#[derive(Debug, Default)]
struct Sink {
    /// Own content of every imported file, when resolving for update.
    files: Option<FileConfigs>,
    /// Every file visited, in depth-first order.
    visited: Vec<PathBuf>,
}

/// Reads a root configuration file and everything it imports.
#[derive(Debug, Clone)]
pub struct ConfigReader<F: FileSystem> {
    fs: F,
    params: ReaderParams,
}

impl<F: FileSystem> ConfigReader<F> {
    pub fn new(fs: F, params: ReaderParams) -> Self {
        Self { fs, params }
    }

    /// Resolve `root` into a single merged configuration.
    ///
    /// Every package carries the path of the file it was declared in.
    pub fn read(&self, root: &Path) -> ReaderResult<Config> {
        let mut sink = Sink::default();
        self.visit(&ImportChain::new(), root, &mut sink)
    }

    /// Resolve `root`, also returning each imported file's own content.
    ///
    /// The merged configuration is the same as [`read`](Self::read). The map
    /// holds, per imported file, only the registries and packages declared
    /// in that file, without provenance paths. The root file is never a key.
    pub fn read_for_update(&self, root: &Path) -> ReaderResult<(Config, FileConfigs)> {
        let mut sink = Sink {
            files: Some(FileConfigs::new()),
            ..Default::default()
        };
        let config = self.visit(&ImportChain::new(), root, &mut sink)?;
        Ok((config, sink.files.unwrap_or_default()))
    }

    /// Every file the resolution of `root` visits, root first, depth-first.
    pub fn visited_files(&self, root: &Path) -> ReaderResult<Vec<PathBuf>> {
        let mut sink = Sink::default();
        self.visit(&ImportChain::new(), root, &mut sink)?;
        Ok(sink.visited)
    }

    fn visit(&self, chain: &ImportChain, file: &Path, sink: &mut Sink) -> ReaderResult<Config> {
        let chain = chain.enter(&self.fs, file)?;
        let path = chain
            .current()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| file.to_path_buf());
        debug!(file = %path.display(), depth = chain.len(), "Reading configuration file");
        sink.visited.push(path.clone());

        let raw = self.load(&path)?;

        let mut own = Config::default();
        let mut merged = Config::default();

        for entry in raw.entries() {
            match entry.classify(&path)? {
                PackageEntry::Package(package) => {
                    own.packages.push(package.clone());
                    merged.packages.push(package.with_file_path(&path));
                }
                PackageEntry::Import(spec) => {
                    for target in self.resolve_import(&path, &spec)? {
                        let imported = self
                            .visit(&chain, &target, sink)
                            .map_err(|e| e.within_import(&path, &spec))?;
                        merge_imported(&mut merged, imported);
                    }
                }
            }
        }

        // A file's own registries override same-named ones from its imports
        for declared in raw.registries() {
            let registry = declared.resolve(&path, self.params.home_dir.as_deref())?;
            own.registries.insert(registry.name.clone(), registry);
        }
        merge_registries(&mut merged.registries, own.registries.clone());

        if chain.len() > 1
            && let Some(files) = sink.files.as_mut()
        {
            files.insert(path, own);
        }

        Ok(merged)
    }

    fn load(&self, path: &Path) -> ReaderResult<RawConfig> {
        if !self.fs.exists(path) {
            return Err(ReaderError::not_found(path));
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| ReaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        RawConfig::parse(path, &content)
    }

    /// Turn an import spec into the concrete files to visit, in visit order.
    fn resolve_import(&self, from: &Path, spec: &str) -> ReaderResult<Vec<PathBuf>> {
        let home_dir = self.params.home_dir.as_deref();
        if is_home_relative(spec) && home_dir.is_none() {
            warn!(file = %from.display(), import = spec, "Import is home-relative but no home directory is configured");
        }
        let expanded = expand_home(spec, home_dir).ok_or_else(|| {
            ReaderError::invalid(
                from,
                format!("import '{}' needs a home directory but none is configured", spec),
            )
        })?;
        let base = from.parent().unwrap_or_else(|| Path::new("/"));

        if !has_glob_meta(spec) {
            return Ok(vec![absolutize(base, &expanded)]);
        }

        // Metacharacters in the home or importing directory must match literally
        let expanded = match home_dir.filter(|_| is_home_relative(spec)) {
            Some(home) => {
                let home = PathBuf::from(Pattern::escape(&home.to_string_lossy()));
                expand_home(spec, Some(&home)).unwrap_or(expanded)
            }
            None => expanded,
        };
        let base = PathBuf::from(Pattern::escape(&base.to_string_lossy()));
        let pattern = absolutize(&base, &expanded);
        let pattern = pattern.to_string_lossy();

        let mut matches = self.fs.glob(&pattern)?;
        matches.sort();
        debug!(
            file = %from.display(),
            pattern = %pattern,
            matches = matches.len(),
            "Expanded import pattern"
        );
        Ok(matches)
    }
}
