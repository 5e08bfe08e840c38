//! Configuration types and structures.
//!
//! `Raw*` types mirror a single YAML file as written. The resolved
//! [`Registry`], [`Package`] and [`Config`] types are what the reader
//! hands back after defaulting and import merging.

use crate::error::{ReaderError, ReaderResult};
use crate::paths::{absolutize, expand_home};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Registry name used when a package does not name one.
pub const STANDARD_REGISTRY: &str = "standard";

/// Coordinates the `standard` shorthand expands to.
pub const STANDARD_REPO_OWNER: &str = "aquaproj";
pub const STANDARD_REPO_NAME: &str = "aqua-registry";
pub const STANDARD_REGISTRY_PATH: &str = "registry.yaml";

/// Kind of registry source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryType {
    /// Shorthand for the official registry, expanded to `GithubContent`.
    Standard,
    /// A registry file fetched from a GitHub repository at a ref.
    GithubContent,
    /// A registry file on local disk.
    Local,
}

impl std::fmt::Display for RegistryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryType::Standard => write!(f, "standard"),
            RegistryType::GithubContent => write!(f, "github_content"),
            RegistryType::Local => write!(f, "local"),
        }
    }
}

/// Registry declaration as written in a file.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRegistry {
    #[serde(rename = "type")]
    pub registry_type: RegistryType,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "ref")]
    pub reference: Option<String>,
    #[serde(default)]
    pub repo_owner: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Package entry as written in a file: either a package or an import.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPackage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Path or glob naming other config files to pull packages from.
    #[serde(default)]
    pub import: Option<String>,
}

/// One configuration file as written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub registries: Option<Vec<RawRegistry>>,
    #[serde(default)]
    pub packages: Option<Vec<Option<RawPackage>>>,
}

impl RawConfig {
    /// Parse YAML content. An empty document is an empty config.
    pub fn parse(path: &Path, content: &str) -> ReaderResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: Option<RawConfig> =
            serde_yaml::from_str(content).map_err(|source| ReaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(raw.unwrap_or_default())
    }

    pub fn registries(&self) -> &[RawRegistry] {
        self.registries.as_deref().unwrap_or_default()
    }

    /// Package entries in declaration order, skipping empty list items.
    pub fn entries(&self) -> impl Iterator<Item = &RawPackage> {
        self.packages.iter().flatten().flatten()
    }
}

/// A resolved registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "type")]
    pub registry_type: RegistryType,
    pub name: String,
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Registries keyed by name.
pub type Registries = BTreeMap<String, Registry>;

impl RawRegistry {
    /// Apply field defaulting for a registry declared in `file`.
    ///
    /// - `standard` expands to the official GitHub registry coordinates
    /// - `local` paths resolve against the declaring file's directory
    pub fn resolve(&self, file: &Path, home_dir: Option<&Path>) -> ReaderResult<Registry> {
        match self.registry_type {
            RegistryType::Standard => Ok(Registry {
                registry_type: RegistryType::GithubContent,
                name: self
                    .name
                    .clone()
                    .unwrap_or_else(|| STANDARD_REGISTRY.to_string()),
                reference: self.reference.clone(),
                repo_owner: Some(STANDARD_REPO_OWNER.to_string()),
                repo_name: Some(STANDARD_REPO_NAME.to_string()),
                path: Some(STANDARD_REGISTRY_PATH.to_string()),
            }),
            RegistryType::Local => {
                let name = self.required_name(file)?;
                let path = match self.path.as_deref() {
                    Some(raw) => {
                        let expanded = expand_home(raw, home_dir).ok_or_else(|| {
                            ReaderError::invalid(
                                file,
                                format!(
                                    "registry '{}' uses '{}' but no home directory is configured",
                                    name, raw
                                ),
                            )
                        })?;
                        let base = file.parent().unwrap_or_else(|| Path::new("/"));
                        Some(absolutize(base, &expanded).to_string_lossy().into_owned())
                    }
                    None => None,
                };
                Ok(Registry {
                    registry_type: RegistryType::Local,
                    name,
                    reference: self.reference.clone(),
                    repo_owner: None,
                    repo_name: None,
                    path,
                })
            }
            RegistryType::GithubContent => Ok(Registry {
                registry_type: RegistryType::GithubContent,
                name: self.required_name(file)?,
                reference: self.reference.clone(),
                repo_owner: self.repo_owner.clone(),
                repo_name: self.repo_name.clone(),
                path: self.path.clone(),
            }),
        }
    }

    fn required_name(&self, file: &Path) -> ReaderResult<String> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(ReaderError::invalid(
                file,
                format!("{} registry requires a name", self.registry_type),
            )),
        }
    }
}

/// A resolved package declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub registry: String,
    pub version: String,
    /// File the package was declared in. Absent in per-file update results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl Package {
    /// Stamp the declaring file.
    pub fn with_file_path(mut self, file: &Path) -> Self {
        self.file_path = Some(file.to_path_buf());
        self
    }
}

/// What a package list entry turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageEntry {
    Package(Package),
    Import(String),
}

impl RawPackage {
    /// Interpret this entry. `import` takes precedence over `name`.
    ///
    /// A `name@version` shorthand is split when no explicit version is set.
    /// Version strings are passed through unvalidated.
    pub fn classify(&self, file: &Path) -> ReaderResult<PackageEntry> {
        // An empty import is treated as absent
        if let Some(import) = self.import.as_deref().filter(|s| !s.is_empty()) {
            return Ok(PackageEntry::Import(import.to_string()));
        }

        let raw_name = match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => {
                return Err(ReaderError::invalid(
                    file,
                    "package entry requires either 'name' or 'import'",
                ));
            }
        };

        let (name, version) = match self.version.as_deref() {
            Some(version) if !version.is_empty() => (raw_name, version),
            _ => raw_name.split_once('@').unwrap_or((raw_name, "")),
        };

        Ok(PackageEntry::Package(Package {
            name: name.to_string(),
            registry: self
                .registry
                .clone()
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| STANDARD_REGISTRY.to_string()),
            version: version.to_string(),
            file_path: None,
        }))
    }
}

/// A resolved configuration: one file, or a root merged with its imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub registries: Registries,
    #[serde(default)]
    pub packages: Vec<Package>,
}

impl Config {
    /// Packages declared in `file`, according to their provenance.
    pub fn packages_declared_in<'a>(&'a self, file: &'a Path) -> impl Iterator<Item = &'a Package> {
        self.packages
            .iter()
            .filter(move |p| p.file_path.as_deref() == Some(file))
    }
}
