//! Integration tests for read_for_update().
//!
//! The per-file map must hold each imported file's own declarations only,
//! while the merged config keeps provenance for every package.

use aqua_config_reader::config::{
    Config, ConfigReader, FileConfigs, Package, ReaderParams, Registry, RegistryType,
};
use aqua_config_reader::{ErrorKind, MemoryFileSystem};
use std::path::{Path, PathBuf};

const ROOT: &str = "/home/workspace/foo/aqua.yaml";
const INSTALLER: &str = "/home/workspace/foo/aqua-installer.yaml";

fn reader_with_files(files: &[(&str, &str)]) -> ConfigReader<MemoryFileSystem> {
    ConfigReader::new(
        MemoryFileSystem::from_files(files.iter().copied()),
        ReaderParams::default(),
    )
}

fn standard_registry() -> Registry {
    Registry {
        registry_type: RegistryType::GithubContent,
        name: "standard".to_string(),
        reference: Some("v2.5.0".to_string()),
        repo_owner: Some("aquaproj".to_string()),
        repo_name: Some("aqua-registry".to_string()),
        path: Some("registry.yaml".to_string()),
    }
}

#[test]
fn test_file_not_found() {
    let reader = reader_with_files(&[]);
    let err = reader.read_for_update(Path::new(ROOT)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn test_no_imports_yields_empty_map() {
    let reader = reader_with_files(&[(
        ROOT,
        r#"registries:
- type: standard
  ref: v2.5.0
- type: local
  name: local
  path: registry.yaml
packages:"#,
    )]);

    let (config, files) = reader.read_for_update(Path::new(ROOT)).unwrap();
    assert_eq!(config.registries.len(), 2);
    assert!(config.packages.is_empty());
    assert_eq!(files, FileConfigs::new());
}

#[test]
fn test_import_package() {
    let reader = reader_with_files(&[
        (
            ROOT,
            r#"registries:
- type: standard
  ref: v2.5.0
packages:
- name: suzuki-shunsuke/ci-info@v1.0.0
- import: aqua-installer.yaml
"#,
        ),
        (
            INSTALLER,
            r#"packages:
- name: aquaproj/aqua-installer@v1.0.0
"#,
        ),
    ]);

    let (config, files) = reader.read_for_update(Path::new(ROOT)).unwrap();

    // Merged view keeps provenance per declaring file
    assert_eq!(config.registries["standard"], standard_registry());
    assert_eq!(
        config.packages,
        vec![
            Package {
                name: "suzuki-shunsuke/ci-info".to_string(),
                registry: "standard".to_string(),
                version: "v1.0.0".to_string(),
                file_path: Some(PathBuf::from(ROOT)),
            },
            Package {
                name: "aquaproj/aqua-installer".to_string(),
                registry: "standard".to_string(),
                version: "v1.0.0".to_string(),
                file_path: Some(PathBuf::from(INSTALLER)),
            },
        ]
    );

    // The child entry holds only the child's own content, without provenance
    let mut expected = FileConfigs::new();
    expected.insert(
        PathBuf::from(INSTALLER),
        Config {
            registries: Default::default(),
            packages: vec![Package {
                name: "aquaproj/aqua-installer".to_string(),
                registry: "standard".to_string(),
                version: "v1.0.0".to_string(),
                file_path: None,
            }],
        },
    );
    assert_eq!(files, expected);

    // Root-declared packages are recoverable through provenance
    let root_names: Vec<&str> = config
        .packages_declared_in(Path::new(ROOT))
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(root_names, vec!["suzuki-shunsuke/ci-info"]);
}

#[test]
fn test_nested_imports_each_get_an_entry() {
    let reader = reader_with_files(&[
        (ROOT, "packages:\n- import: imports/*.yaml\n"),
        (
            "/home/workspace/foo/imports/a.yaml",
            "registries:\n- type: local\n  name: team\n  path: ../team-registry.yaml\npackages:\n- name: foo/a@v1\n  registry: team\n- import: ../shared/b.yaml\n",
        ),
        (
            "/home/workspace/foo/shared/b.yaml",
            "packages:\n- name: foo/b@v2\n",
        ),
    ]);

    let (config, files) = reader.read_for_update(Path::new(ROOT)).unwrap();
    assert_eq!(config.packages.len(), 2);
    assert_eq!(files.len(), 2);
    assert!(!files.contains_key(Path::new(ROOT)));

    let a = &files[Path::new("/home/workspace/foo/imports/a.yaml")];
    assert_eq!(a.packages.len(), 1);
    assert_eq!(a.packages[0].name, "foo/a");
    assert_eq!(a.packages[0].registry, "team");
    assert!(a.packages[0].file_path.is_none());
    assert_eq!(
        a.registries["team"].path.as_deref(),
        Some("/home/workspace/foo/team-registry.yaml")
    );

    let b = &files[Path::new("/home/workspace/foo/shared/b.yaml")];
    assert_eq!(b.packages.len(), 1);
    assert_eq!(b.packages[0].version, "v2");
    assert!(b.registries.is_empty());
}

#[test]
fn test_update_mode_matches_read() {
    let files = [
        (ROOT, "registries:\n- type: standard\n  ref: v2.5.0\npackages:\n- import: a.yaml\n- name: foo/root@v1\n"),
        ("/home/workspace/foo/a.yaml", "packages:\n- name: foo/a@v1\n"),
    ];
    let reader = reader_with_files(&files);
    let merged = reader.read(Path::new(ROOT)).unwrap();
    let (for_update, _) = reader.read_for_update(Path::new(ROOT)).unwrap();
    assert_eq!(merged, for_update);
}

#[test]
fn test_circular_import_self_reference() {
    let reader = reader_with_files(&[(
        ROOT,
        "registries:\n- type: standard\n  ref: v2.5.0\npackages:\n- import: aqua.yaml\n",
    )]);
    let err = reader.read_for_update(Path::new(ROOT)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CircularImport);
    assert!(err.to_string().contains("circular import detected"));
    assert!(err.to_string().contains("aqua.yaml -> aqua.yaml"));
}

#[test]
fn test_circular_import_two_files() {
    let reader = reader_with_files(&[
        (ROOT, "packages:\n- import: b.yaml\n"),
        ("/home/workspace/foo/b.yaml", "packages:\n- import: aqua.yaml\n"),
    ]);
    let err = reader.read_for_update(Path::new(ROOT)).unwrap_err();
    assert_eq!(err.cycle_trail(), Some("aqua.yaml -> b.yaml -> aqua.yaml"));
}
