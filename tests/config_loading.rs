use std::fs;

use tempfile::TempDir;

use qdexport::config::model::ConfigFile;
use qdexport::config::{default_config_path, load_and_validate, load_from_path};
use qdexport::errors::ExportError;

#[test]
fn defaults_are_sensible() {
    let cfg = ConfigFile::default();
    assert_eq!(cfg.compiler.path, "quarkdown");
    assert_eq!(cfg.export.output_dir, "output");
}

#[test]
fn parses_a_full_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Qdexport.toml");
    fs::write(
        &path,
        "[compiler]\npath = \"/opt/quarkdown/bin/qmd\"\n\n[export]\noutput_dir = \"dist\"\n",
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.compiler.path, "/opt/quarkdown/bin/qmd");
    assert_eq!(cfg.export.output_dir, "dist");
}

#[test]
fn partial_file_keeps_defaults_for_the_rest() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Qdexport.toml");
    fs::write(&path, "[compiler]\npath = \"qmd\"\n").unwrap();

    let cfg = load_and_validate(&path).unwrap();
    assert_eq!(cfg.compiler.path, "qmd");
    assert_eq!(cfg.export.output_dir, "output");
}

#[test]
fn empty_compiler_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Qdexport.toml");
    fs::write(&path, "[compiler]\npath = \"  \"\n").unwrap();

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, ExportError::ConfigError(_)));
}

#[test]
fn empty_output_dir_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Qdexport.toml");
    fs::write(&path, "[export]\noutput_dir = \"\"\n").unwrap();

    let err = load_and_validate(&path).unwrap_err();
    assert!(matches!(err, ExportError::ConfigError(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_from_path(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ExportError::IoError(_)));
}

#[test]
fn invalid_toml_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Qdexport.toml");
    fs::write(&path, "this is [[[ not toml").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, ExportError::TomlError(_)));
}

#[test]
fn default_config_file_name() {
    assert_eq!(default_config_path().to_string_lossy(), "Qdexport.toml");
}
