//! Pure path manipulation helpers.
//!
//! Nothing in this module touches the filesystem:
//! - Lexical normalization of `.` and `..` components
//! - Relative rendering of one absolute path against a base directory
//! - `~/` expansion against an explicitly supplied home directory
//! - Glob metacharacter detection for import specs

use std::path::{Component, Path, PathBuf};

/// Characters that turn an import spec into a glob pattern.
const GLOB_META: &[char] = &['*', '?', '['];

/// Resolve `.` and `..` components without consulting the filesystem.
pub fn normalize_path_components(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => {
                components.push(Component::Prefix(p));
            }
            Component::RootDir => {
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(Component::ParentDir),
            },
            Component::Normal(name) => {
                components.push(Component::Normal(name));
            }
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Make `path` absolute against `base` (when relative) and normalize it.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path_components(path)
    } else {
        normalize_path_components(&base.join(path))
    }
}

/// Render `target` relative to the directory `base`.
///
/// Both paths are expected to be absolute. Returns `None` when no relative
/// form exists, e.g. when the two paths live under different prefixes.
pub fn relative_to(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize_path_components(base);
    let target = normalize_path_components(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component> = base.components().collect();
    let target_parts: Vec<Component> = target.components().collect();

    // Prefix and root components must agree
    fn anchored(c: &Component) -> bool {
        matches!(c, Component::Prefix(_) | Component::RootDir)
    }
    let base_anchor: Vec<&Component> = base_parts.iter().take_while(|c| anchored(c)).collect();
    let target_anchor: Vec<&Component> = target_parts.iter().take_while(|c| anchored(c)).collect();
    if base_anchor != target_anchor {
        return None;
    }

    let common = base_parts
        .iter()
        .zip(target_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for part in &base_parts[common..] {
        match part {
            Component::Normal(_) => relative.push(".."),
            // a leftover `..` in the base cannot be walked back
            _ => return None,
        }
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Expand a leading `~` or `~/` using `home_dir`.
///
/// Returns `None` when the spec is home-relative but no home directory is
/// configured. Specs without the marker are returned unchanged.
pub fn expand_home(spec: &str, home_dir: Option<&Path>) -> Option<PathBuf> {
    let rest = if spec == "~" {
        ""
    } else if let Some(rest) = spec.strip_prefix("~/") {
        rest
    } else if let Some(rest) = spec.strip_prefix("~\\") {
        rest
    } else {
        return Some(PathBuf::from(spec));
    };

    let home = home_dir?;
    if rest.is_empty() {
        Some(home.to_path_buf())
    } else {
        Some(home.join(rest))
    }
}

/// Whether the spec starts with the home-directory marker.
pub fn is_home_relative(spec: &str) -> bool {
    spec == "~" || spec.starts_with("~/") || spec.starts_with("~\\")
}

/// Whether an import spec should be expanded as a glob pattern.
pub fn has_glob_meta(spec: &str) -> bool {
    spec.contains(GLOB_META)
}
