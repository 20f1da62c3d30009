#![cfg(unix)]

use dirdedup::report::EventLog;
use dirdedup::scanner::{TreeWalker, WalkerConfig};
use std::fs;
use std::os::unix::fs::symlink;
use tempfile::tempdir;

#[test]
fn test_symlinks_skipped_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    symlink(dir.path().join("a.txt"), dir.path().join("a (1).txt")).unwrap();

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.total_files, 1);
    assert_eq!(stats.deleted_files, 0);
    assert!(fs::symlink_metadata(dir.path().join("a (1).txt")).is_ok());
}

#[test]
fn test_followed_symlink_removed_target_kept() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    symlink(dir.path().join("a.txt"), dir.path().join("a (1).txt")).unwrap();

    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = TreeWalker::new(dir.path(), config)
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.deleted_files, 1);
    assert!(dir.path().join("a.txt").exists());
    assert!(fs::symlink_metadata(dir.path().join("a (1).txt")).is_err());
}

#[test]
fn test_symlinked_directory_descended_only_when_following() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("x.txt"), b"x").unwrap();
    fs::write(outside.path().join("x (1).txt"), b"x").unwrap();
    symlink(outside.path(), dir.path().join("linked")).unwrap();

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();
    assert_eq!(stats.directories_scanned, 1);
    assert!(outside.path().join("x (1).txt").exists());

    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = TreeWalker::new(dir.path(), config)
        .run(&EventLog::new())
        .unwrap();
    assert_eq!(stats.directories_scanned, 2);
    assert_eq!(stats.deleted_files, 1);
    assert!(!outside.path().join("x (1).txt").exists());
}

#[test]
fn test_symlink_loop_does_not_hang() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    symlink(dir.path(), sub.join("back")).unwrap();

    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = TreeWalker::new(dir.path(), config)
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.directories_scanned, 2);
    assert_eq!(stats.directories_skipped, 0);
}

#[test]
fn test_normal_named_link_to_copy_named_file_keeps_bytes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("photo (1).jpg"), b"pixels").unwrap();
    symlink(dir.path().join("photo (1).jpg"), dir.path().join("photo.jpg")).unwrap();

    let log = EventLog::new();
    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = TreeWalker::new(dir.path(), config).run(&log).unwrap();

    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.deleted_files, 1);
    assert_eq!(log.deleted_paths(), vec![dir.path().join("photo.jpg")]);
    assert_eq!(fs::read(dir.path().join("photo (1).jpg")).unwrap(), b"pixels");
    assert!(fs::symlink_metadata(dir.path().join("photo.jpg")).is_err());
}

#[test]
fn test_link_sorted_first_never_outlives_real_file() {
    let dir = tempdir().unwrap();
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("data.bin"), b"same").unwrap();
    fs::write(dir.path().join("b copy.bin"), b"same").unwrap();
    symlink(outside.path().join("data.bin"), dir.path().join("a (1).bin")).unwrap();

    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = TreeWalker::new(dir.path(), config)
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 1);
    assert_eq!(fs::read(dir.path().join("b copy.bin")).unwrap(), b"same");
    assert!(fs::symlink_metadata(dir.path().join("a (1).bin")).is_err());
    assert!(outside.path().join("data.bin").exists());
}
