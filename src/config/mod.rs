//! Configuration reading with nested imports.
//!
//! A root `aqua.yaml` may pull packages from other files through `import`
//! entries in its package list:
//!
//! ```yaml
//! registries:
//! - type: standard
//!   ref: v2.5.0
//! packages:
//! - name: suzuki-shunsuke/ci-info@v1.0.0
//! - import: imports/*.yaml
//! ```
//!
//! ## Resolution
//! - Imports resolve against the importing file's directory, `~/` against the configured home
//! - Glob imports are expanded and visited in sorted order
//! - Packages keep depth-first declaration order and record their declaring file
//! - Registries merge by name; a file's own entries override its imports'
//!
//! ## Cycles
//! Every visited file is pushed onto an [`ImportChain`]. Re-entering a file
//! already on the chain fails with a trail such as
//! `aqua.yaml -> imports/b.yaml -> aqua.yaml`.
//!
//! ## Environment Variables
//! - `AQUA_CONFIG` - Explicit root config file (skips discovery)
//! - `AQUA_HOME_DIR` - Home directory used for `~/` expansion

pub mod chain;
mod finder;
mod merge;
mod reader;
mod types;

pub use chain::{ImportChain, format_trail};
pub use finder::{CONFIG_FILE_NAMES, ConfigFinder};
pub use merge::{merge_imported, merge_registries};
pub use reader::{ConfigReader, FileConfigs, ReaderParams};
pub use types::*;
