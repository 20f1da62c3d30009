use clap::Parser;
use dirdedup::cli::Cli;
use dirdedup::error::ExitCode;
use dirdedup::run_app;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// A tree with one removable copy, plus an empty config file so the
/// user's own configuration never leaks into the run.
fn setup() -> (TempDir, TempDir) {
    let tree = tempdir().unwrap();
    fs::write(tree.path().join("a.txt"), b"same").unwrap();
    fs::write(tree.path().join("a (1).txt"), b"same").unwrap();

    let conf = tempdir().unwrap();
    fs::write(conf.path().join("config.toml"), "").unwrap();
    (tree, conf)
}

fn cli(tree: &Path, conf: &TempDir, extra: &[&str]) -> Cli {
    let config = conf.path().join("config.toml");
    let mut args = vec![
        "dirdedup".to_string(),
        tree.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn test_run_removes_copy() {
    let (tree, conf) = setup();

    let code = run_app(cli(tree.path(), &conf, &["-q"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(tree.path().join("a.txt").exists());
    assert!(!tree.path().join("a (1).txt").exists());
}

#[test]
fn test_dry_run_leaves_files() {
    let (tree, conf) = setup();

    let code = run_app(cli(tree.path(), &conf, &["-q", "--dry-run"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(tree.path().join("a (1).txt").exists());
}

#[test]
fn test_json_output() {
    let (tree, conf) = setup();

    let code = run_app(cli(tree.path(), &conf, &["--output", "json", "-n"])).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(tree.path().join("a (1).txt").exists());
}

#[test]
fn test_config_file_applies() {
    let (tree, conf) = setup();
    fs::write(conf.path().join("config.toml"), "dry_run = true\n").unwrap();

    run_app(cli(tree.path(), &conf, &["-q"])).unwrap();

    assert!(tree.path().join("a (1).txt").exists());
}

#[test]
fn test_missing_root_maps_to_path_not_found() {
    let (tree, conf) = setup();
    let missing = tree.path().join("nope");

    let err = run_app(cli(&missing, &conf, &["-q"])).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::PathNotFound);
    assert_eq!(ExitCode::for_error(&err).as_i32(), 2);
}

#[test]
fn test_root_file_maps_to_path_not_found() {
    let (tree, conf) = setup();

    let err = run_app(cli(&tree.path().join("a.txt"), &conf, &["-q"])).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::PathNotFound);
}

#[test]
fn test_invalid_config_is_general_error() {
    let (tree, conf) = setup();
    fs::write(conf.path().join("config.toml"), "hash_algorithm = \"crc32\"\n").unwrap();

    let err = run_app(cli(tree.path(), &conf, &["-q"])).unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(tree.path().join("a (1).txt").exists());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let (tree, conf) = setup();
    fs::remove_file(conf.path().join("config.toml")).unwrap();

    let err = run_app(cli(tree.path(), &conf, &["-q"])).unwrap_err();

    assert!(format!("{err:#}").contains("configuration"));
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
}

#[test]
fn test_no_dry_run_flag_beats_config_file() {
    let (tree, conf) = setup();
    fs::write(conf.path().join("config.toml"), "dry_run = true\n").unwrap();

    run_app(cli(tree.path(), &conf, &["-q", "--no-dry-run"])).unwrap();

    assert!(!tree.path().join("a (1).txt").exists());
}
