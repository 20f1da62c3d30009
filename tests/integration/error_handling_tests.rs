use dirdedup::actions::{DeleteError, DeleteMode, DeleteResult, FileRemover};
use dirdedup::dedup::{DirectoryBatch, DirectoryDeduplicator};
use dirdedup::report::{EventLog, ScanEvent};
use dirdedup::scanner::{FileEntry, Hasher, NameClassifier, WalkerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::tempdir;

/// Refuses to remove one specific file, removes everything else.
struct RefuseOne {
    locked: PathBuf,
    attempts: Mutex<Vec<PathBuf>>,
}

impl FileRemover for RefuseOne {
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError> {
        self.attempts.lock().unwrap().push(path.to_path_buf());
        if path == self.locked {
            Err(DeleteError::PermissionDenied(path.to_path_buf()))
        } else {
            DeleteMode::Permanent.remove(path)
        }
    }
}

#[test]
fn test_removal_failure_counted_and_next_file_processed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("a (1).txt"), b"same").unwrap();
    fs::write(dir.path().join("a (2).txt"), b"same").unwrap();

    let remover = RefuseOne {
        locked: dir.path().join("a (1).txt"),
        attempts: Mutex::new(Vec::new()),
    };
    let classifier = NameClassifier::default();
    let log = EventLog::new();
    let dedup = DirectoryDeduplicator::new(Hasher::new(), &classifier, &remover, &log);

    let mut batch = DirectoryBatch::read(dir.path(), &WalkerConfig::default()).unwrap();
    let stats = dedup.process(&mut batch);

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.deleted_files, 1);
    assert_eq!(stats.error_files, 1);
    assert_eq!(remover.attempts.lock().unwrap().len(), 2);
    assert!(dir.path().join("a (1).txt").exists());
    assert!(!dir.path().join("a (2).txt").exists());
    assert_eq!(log.error_paths(), vec![dir.path().join("a (1).txt")]);

    // The file that stayed on disk stays in the batch
    let names: Vec<_> = batch.entries().iter().map(FileEntry::display_name).collect();
    assert_eq!(names, vec!["a (1).txt", "a.txt"]);
}

#[test]
fn test_vanished_file_is_an_error_not_a_deletion() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("a (1).txt"), b"same").unwrap();
    fs::write(dir.path().join("b (1).txt"), b"gone soon").unwrap();

    let mut batch = DirectoryBatch::read(dir.path(), &WalkerConfig::default()).unwrap();
    // Removed between listing and hashing
    fs::remove_file(dir.path().join("b (1).txt")).unwrap();

    let classifier = NameClassifier::default();
    let log = EventLog::new();
    let dedup = DirectoryDeduplicator::new(Hasher::new(), &classifier, &DeleteMode::Permanent, &log);
    let stats = dedup.process(&mut batch);

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.deleted_files, 1);
    assert_eq!(stats.error_files, 1);
    assert_eq!(log.error_paths(), vec![dir.path().join("b (1).txt")]);
    let message = log
        .events()
        .into_iter()
        .find_map(|e| match e {
            ScanEvent::Error { message, .. } => Some(message),
            _ => None,
        })
        .unwrap();
    assert!(message.contains("not found"), "{message}");
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_counted_once_and_kept() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    // Dangling links cannot be opened; one normal name, one copy name
    symlink(dir.path().join("missing"), dir.path().join("broken.txt")).unwrap();
    symlink(dir.path().join("missing"), dir.path().join("broken (1).txt")).unwrap();

    let log = EventLog::new();
    let config = WalkerConfig::default().with_follow_symlinks(true);
    let stats = dirdedup::scanner::TreeWalker::new(dir.path(), config)
        .run(&log)
        .unwrap();

    assert_eq!(stats.total_files, 3);
    assert_eq!(stats.error_files, 2);
    assert_eq!(stats.deleted_files, 0);
    let mut errors = log.error_paths();
    errors.sort();
    assert_eq!(
        errors,
        vec![
            dir.path().join("broken (1).txt"),
            dir.path().join("broken.txt")
        ]
    );
    assert!(fs::symlink_metadata(dir.path().join("broken.txt")).is_ok());
    assert!(fs::symlink_metadata(dir.path().join("broken (1).txt")).is_ok());
}
