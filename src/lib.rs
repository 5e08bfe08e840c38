//! aqua config reader library
//!
//! Resolves a root `aqua.yaml` and its nested imports into one configuration.
//! This module exports the core components for testing and integration.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod fs;
pub mod paths;

pub use config::{Config, ConfigReader, FileConfigs, ImportChain, ReaderParams};
pub use error::{ErrorKind, ReaderError, ReaderResult};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
