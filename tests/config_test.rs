//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE (global defines the real baseline)
//! - Global → Explicit file: UNION with negation support
//! - Any → Env vars: REPLACE (explicit user override)
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test explicit config merging with defaults.

use std::fs;

use tempfile::TempDir;

use tfunbind::config::Settings;
use tfunbind::domain::{Entry, ExistingPolicy, RuleAction};

#[test]
fn given_explicit_config_with_dirs_when_load_then_unions_with_defaults() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("unbind.toml");
    fs::write(
        &path,
        r#"
[rules]
excluded_dirs = ["obj"]
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    let dirs = &settings.rules.excluded_dirs;
    assert!(dirs.contains(&"obj".to_string()), "Should contain added 'obj'");
    assert!(dirs.contains(&"$tf".to_string()), "Should keep default '$tf'");
    assert_eq!(dirs.len(), 5);
}

#[test]
fn given_explicit_config_with_negation_when_load_then_removes_item() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("unbind.toml");
    fs::write(
        &path,
        r#"
[rules]
excluded_extensions = ["!pdb"]
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert!(!settings
        .rules
        .excluded_extensions
        .contains(&"pdb".to_string()));
    let table = settings.rules.marker_table().unwrap();
    assert_eq!(table.classify(&Entry::file("bin/App.pdb")), None);
}

#[test]
fn given_explicit_config_with_scalars_when_load_then_overrides() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("unbind.toml");
    fs::write(
        &path,
        "overwrite_existing = false\nmake_writable = false\n",
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).expect("load settings");

    // Assert
    assert_eq!(settings.existing_policy(), ExistingPolicy::Skip);
    assert!(!settings.make_writable);
    assert_eq!(settings.rules.excluded_dirs.len(), 4);
}

#[test]
fn given_extra_solution_extension_when_load_then_table_rewrites_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("unbind.toml");
    fs::write(&path, "[rules]\nsolution_extensions = [\"slnx\"]\n").unwrap();

    // Act
    let settings = Settings::load(Some(path.as_path())).unwrap();

    // Assert
    let table = settings.rules.marker_table().unwrap();
    assert!(matches!(
        table.classify(&Entry::file("App.slnx")),
        Some(RuleAction::Rewrite(_))
    ));
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let temp = TempDir::new().unwrap();

    let err = Settings::load(Some(temp.path().join("nope.toml").as_path())).unwrap_err();

    assert!(err.to_string().contains("config file not found"));
}

#[test]
fn given_malformed_config_when_load_then_config_error_names_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[rules\nexcluded_dirs = ").unwrap();

    // Act
    let err = Settings::load(Some(path.as_path())).unwrap_err();

    // Assert
    assert!(err.to_string().contains("broken.toml"));
}
