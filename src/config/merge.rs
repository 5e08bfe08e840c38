//! Merging of imported configurations into an importing one.
//!
//! Registries merge by key with the later assignment winning. Packages are
//! concatenated so the result keeps depth-first declaration order.

use super::types::{Config, Registries};

/// Insert every registry from `overlay` into `base`, replacing same-named entries.
pub fn merge_registries(base: &mut Registries, overlay: Registries) {
    for (name, registry) in overlay {
        base.insert(name, registry);
    }
}

/// Fold an imported sub-configuration into `base`.
///
/// The imported packages are appended after whatever `base` already holds.
pub fn merge_imported(base: &mut Config, imported: Config) {
    merge_registries(&mut base.registries, imported.registries);
    base.packages.extend(imported.packages);
}
