use dirdedup::report::{EventLog, ScanEvent};
use dirdedup::scanner::{HashAlgorithm, ScanError, TreeWalker, WalkerConfig};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn remaining(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_photo_copies_removed() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("photo.jpg"), b"jpeg bytes");
    write(&dir.path().join("photo (1).jpg"), b"jpeg bytes");
    write(&dir.path().join("photo (2).jpg"), b"jpeg bytes");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.deleted_files, 2);
    assert_eq!(stats.error_files, 0);
    assert_eq!(remaining(dir.path()), vec!["photo.jpg"]);
}

#[test]
fn test_copy_name_with_different_content_kept() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"X");
    write(&dir.path().join("a_copy.txt"), b"Y");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 0);
    assert_eq!(remaining(dir.path()), vec!["a.txt", "a_copy.txt"]);
}

#[test]
fn test_normal_names_lexicographically_first_survives() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("alpha.txt"), b"same");
    write(&dir.path().join("beta.txt"), b"same");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 1);
    assert_eq!(remaining(dir.path()), vec!["alpha.txt"]);
}

#[test]
fn test_normal_name_survives_regardless_of_order() {
    let dir = tempdir().unwrap();
    // The copy sorts first
    write(&dir.path().join("Report copy.txt"), b"quarterly");
    write(&dir.path().join("report.txt"), b"quarterly");
    // The copy sorts last
    write(&dir.path().join("zeta (1).txt"), b"z");
    write(&dir.path().join("zeta.txt"), b"z");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 2);
    assert_eq!(remaining(dir.path()), vec!["report.txt", "zeta.txt"]);
}

#[test]
fn test_localized_markers() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("报告.docx"), b"doc");
    write(&dir.path().join("报告 副本.docx"), b"doc");
    write(&dir.path().join("报告 副本 (2).docx"), b"doc");
    write(&dir.path().join("报告复制.docx"), b"doc");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 3);
    assert_eq!(remaining(dir.path()), vec!["报告.docx"]);
}

#[test]
fn test_custom_marker() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("Bericht.txt"), b"inhalt");
    write(&dir.path().join("Bericht Kopie.txt"), b"inhalt");
    write(&dir.path().join("Bericht Kopie (3).txt"), b"inhalt");

    let config = WalkerConfig::default().with_copy_markers(vec!["Kopie".to_string()]);
    let stats = TreeWalker::new(dir.path(), config)
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.deleted_files, 2);
    assert_eq!(remaining(dir.path()), vec!["Bericht.txt"]);
}

#[test]
fn test_second_run_deletes_nothing() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"one");
    write(&dir.path().join("a (1).txt"), b"one");
    write(&dir.path().join("b.txt"), b"one");
    write(&dir.path().join("c copy.txt"), b"two");

    let first = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();
    let second = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(first.deleted_files, 2);
    assert_eq!(second.deleted_files, 0);
    assert_eq!(second.total_files, 2);
    assert_eq!(remaining(dir.path()), vec!["a.txt", "c copy.txt"]);
}

#[test]
fn test_sibling_directories_are_independent() {
    let dir = tempdir().unwrap();
    for sub in ["left", "right"] {
        fs::create_dir(dir.path().join(sub)).unwrap();
        write(&dir.path().join(sub).join("data.bin"), b"identical");
    }
    write(&dir.path().join("data.bin"), b"identical");

    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&EventLog::new())
        .unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.deleted_files, 0);
    assert_eq!(stats.directories_scanned, 3);
    assert!(dir.path().join("left").join("data.bin").exists());
    assert!(dir.path().join("right").join("data.bin").exists());
}

#[test]
fn test_nested_directories_each_deduplicated() {
    let dir = tempdir().unwrap();
    let deep = dir.path().join("a").join("b").join("c");
    fs::create_dir_all(&deep).unwrap();
    write(&deep.join("x.txt"), b"deep");
    write(&deep.join("x (1).txt"), b"deep");

    let log = EventLog::new();
    let stats = TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&log)
        .unwrap();

    assert_eq!(stats.directories_scanned, 4);
    assert_eq!(log.deleted_paths(), vec![deep.join("x (1).txt")]);
}

#[test]
fn test_missing_root_reports_not_found() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does").join("not").join("exist");
    let log = EventLog::new();

    let result = TreeWalker::new(&missing, WalkerConfig::default()).run(&log);

    assert!(matches!(result, Err(ScanError::NotFound(_))));
    assert!(log.summary().is_none());
    assert!(!missing.exists());
}

#[test]
fn test_dry_run_reports_without_deleting() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("song.mp3"), b"audio");
    write(&dir.path().join("song (1).mp3"), b"audio");

    let log = EventLog::new();
    let config = WalkerConfig::default().with_dry_run(true);
    let stats = TreeWalker::new(dir.path(), config).run(&log).unwrap();

    assert!(stats.dry_run);
    assert_eq!(stats.deleted_files, 1);
    assert_eq!(stats.bytes_reclaimed, 5);
    assert!(log.deleted_paths().is_empty());
    assert_eq!(remaining(dir.path()), vec!["song (1).mp3", "song.mp3"]);
}

#[test]
fn test_all_hash_algorithms_agree() {
    for algorithm in [
        HashAlgorithm::Md5,
        HashAlgorithm::Blake3,
        HashAlgorithm::Sha256,
    ] {
        let dir = tempdir().unwrap();
        write(&dir.path().join("f.txt"), b"content");
        write(&dir.path().join("f (1).txt"), b"content");
        write(&dir.path().join("g (1).txt"), b"other");

        let config = WalkerConfig::default().with_hash_algorithm(algorithm);
        let stats = TreeWalker::new(dir.path(), config)
            .run(&EventLog::new())
            .unwrap();

        assert_eq!(stats.deleted_files, 1, "algorithm {algorithm}");
        assert_eq!(remaining(dir.path()), vec!["f.txt", "g (1).txt"]);
    }
}

#[test]
fn test_event_order() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("a (1).txt"), b"same");

    let log = EventLog::new();
    TreeWalker::new(dir.path(), WalkerConfig::default())
        .run(&log)
        .unwrap();

    let events = log.events();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], ScanEvent::DirectoryEntered { .. }));
    assert_eq!(
        events[1],
        ScanEvent::DuplicateFound {
            original: dir.path().join("a.txt"),
            duplicate: dir.path().join("a (1).txt"),
        }
    );
    assert_eq!(
        events[2],
        ScanEvent::FileDeleted {
            path: dir.path().join("a (1).txt"),
            size: 4,
        }
    );
    assert!(matches!(events[3], ScanEvent::Summary(_)));
}

#[test]
fn test_channel_sink_on_worker_thread() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("a copy.txt"), b"same");

    let root = dir.path().to_path_buf();
    let (tx, rx) = std::sync::mpsc::channel::<ScanEvent>();
    let worker = std::thread::spawn(move || {
        TreeWalker::new(&root, WalkerConfig::default()).run(&tx)
    });

    let events: Vec<ScanEvent> = rx.iter().collect();
    let stats = worker.join().unwrap().unwrap();

    assert_eq!(stats.deleted_files, 1);
    assert!(matches!(events.last(), Some(ScanEvent::Summary(s)) if *s == stats));
}
