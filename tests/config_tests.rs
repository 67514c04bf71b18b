//! Configuration file tests.
//!
//! The CLI accepts either single-target flags or a JSON file describing
//! several output targets. These tests feed real files on disk through
//! [`Args::load_options`].

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;

use declbundle::cli::Args;
use declbundle::{CliError, DeclbundleError};

// ============================================================================
// Test Helpers
// ============================================================================

/// Creates a temporary directory for test isolation
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("declbundle.json");
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

fn args_for_config(config: &Path) -> Args {
    let config = config.to_str().expect("Non-UTF-8 temp path");
    Args::try_parse_from(["declbundle", "--config", config]).expect("Failed to parse arguments")
}

// ============================================================================
// Parsing
// ============================================================================

#[tokio::test]
async fn test_config_with_single_output_object() {
    let dir = temp_dir();
    let config = write_config(
        dir.path(),
        r#"{
            "rootDir": "ui/kit",
            "output": { "outDir": "dist", "rootModuleName": "myLib" }
        }"#,
    );

    let options = args_for_config(&config)
        .load_options()
        .await
        .expect("Failed to load options");

    assert_eq!(options.root_dir, PathBuf::from("ui/kit"));
    assert_eq!(options.output.len(), 1);
    assert_eq!(options.output[0].out_dir, PathBuf::from("dist"));
    assert_eq!(options.output[0].root_module_name, "myLib");
    assert!(!options.output[0].use_path_for_root_module_name);
    assert!(!options.output[0].retain_external_types);
    assert!(options.output[0].non_exported_external_libs.is_empty());
}

#[tokio::test]
async fn test_config_with_output_array() {
    let dir = temp_dir();
    let config = write_config(
        dir.path(),
        r#"{
            "rootDir": "ui/kit",
            "output": [
                { "outDir": "dist", "rootModuleName": "myLib" },
                {
                    "outDir": "dist-es",
                    "rootModuleName": "myLibEs",
                    "usePathForRootModuleName": true,
                    "nonExportedExternalLibs": ["csstype"]
                }
            ]
        }"#,
    );

    let options = args_for_config(&config)
        .load_options()
        .await
        .expect("Failed to load options");

    assert_eq!(options.output.len(), 2);
    assert_eq!(options.output[0].root_module_name, "myLib");
    assert_eq!(options.output[1].root_module_name, "myLibEs");
    assert!(options.output[1].use_path_for_root_module_name);
    assert_eq!(options.output[1].non_exported_external_libs, ["csstype"]);
}

#[tokio::test]
async fn test_config_accepts_legacy_field_names() {
    let dir = temp_dir();
    let config = write_config(
        dir.path(),
        r#"{
            "rootDir": "ui/kit",
            "output": {
                "outDir": "dist",
                "rootModuleName": "myLib",
                "needCopyExternalTypes": true,
                "nonExportedSymbolDistribution": [
                    { "sourceModule": "^internal/", "targetModule": "myLib" }
                ]
            }
        }"#,
    );

    let options = args_for_config(&config)
        .load_options()
        .await
        .expect("Failed to load options");

    let target = &options.output[0];
    assert!(target.retain_external_types);
    assert_eq!(target.symbol_redistribution.len(), 1);
    assert_eq!(target.symbol_redistribution[0].source_module, "^internal/");
    assert_eq!(target.symbol_redistribution[0].target_module, "myLib");
}

// ============================================================================
// Root Resolution
// ============================================================================

#[tokio::test]
async fn test_root_flag_wins_over_config_root() {
    let dir = temp_dir();
    let config = write_config(
        dir.path(),
        r#"{
            "rootDir": "ui/kit",
            "output": { "outDir": "dist", "rootModuleName": "myLib" }
        }"#,
    );
    let config = config.to_str().expect("Non-UTF-8 temp path");

    let args = Args::try_parse_from(["declbundle", "--config", config, "--root", "pkg/override"])
        .expect("Failed to parse arguments");
    let options = args.load_options().await.expect("Failed to load options");

    assert_eq!(options.root_dir, PathBuf::from("pkg/override"));
}

#[tokio::test]
async fn test_config_without_root_anywhere_is_rejected() {
    let dir = temp_dir();
    let config = write_config(
        dir.path(),
        r#"{ "output": { "outDir": "dist", "rootModuleName": "myLib" } }"#,
    );

    let err = args_for_config(&config)
        .load_options()
        .await
        .expect_err("Missing root should be rejected");

    match err {
        DeclbundleError::Cli(CliError::MissingArgument { argument }) => {
            assert_eq!(argument, "root");
        }
        other => panic!("Unexpected error: {other}"),
    }
}

// ============================================================================
// File Errors
// ============================================================================

#[tokio::test]
async fn test_unreadable_config_reports_path() {
    let dir = temp_dir();
    let missing = dir.path().join("missing.json");

    let err = args_for_config(&missing)
        .load_options()
        .await
        .expect_err("Missing file should be rejected");

    match err {
        DeclbundleError::Cli(CliError::ConfigFile { path, .. }) => assert_eq!(path, missing),
        other => panic!("Unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_malformed_config_reports_path() {
    let dir = temp_dir();
    let config = write_config(dir.path(), "not json at all");

    let err = args_for_config(&config)
        .load_options()
        .await
        .expect_err("Malformed file should be rejected");

    match err {
        DeclbundleError::Cli(CliError::ConfigFile { path, reason }) => {
            assert_eq!(path, config);
            assert!(!reason.is_empty());
        }
        other => panic!("Unexpected error: {other}"),
    }
}
