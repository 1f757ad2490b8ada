use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use crate::tests::test_config;
use crate::writer::file::FileLogWriter;
use crate::{NoopReporter, RotateCallback};

const FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// 29 chars, 30 bytes on disk with the newline.
fn line(i: usize) -> String {
    format!("{i:02}-{}", "x".repeat(26))
}

fn writer_with_threshold(
    dir: &TempDir,
    threshold: u64,
    rotate_callback: RotateCallback,
) -> FileLogWriter {
    let mut config = test_config(dir.path());
    config.rotation_max_bytes = threshold;
    FileLogWriter::new(&config, rotate_callback, Arc::new(NoopReporter))
}

#[test]
fn test_rotation_after_threshold_exceeded() {
    let dir = TempDir::new().unwrap();
    let rotations = Arc::new(AtomicUsize::new(0));
    let counter = rotations.clone();
    let callback: RotateCallback = Box::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        vec!["ROTATED".to_string()]
    });
    let writer = writer_with_threshold(&dir, 100, callback);

    for i in 1..=5 {
        writer.enqueue_raw(line(i));
    }
    assert!(writer.wait_for_flush_timeout(FLUSH_TIMEOUT));

    // Line 4 pushes the active file to 120 bytes, past the 100-byte
    // threshold: exactly one rotation.
    assert_eq!(rotations.load(Ordering::SeqCst), 1);

    let backup = fs::read_to_string(dir.path().join("logs").join("Data.log")).unwrap();
    let expected_backup: String = (1..=4).map(|i| line(i) + "\n").collect();
    assert_eq!(backup, expected_backup);
    assert!(!backup.contains("ROTATED"));

    let active = fs::read_to_string(dir.path().join("logs").join("Data1.log")).unwrap();
    assert_eq!(active, format!("ROTATED\n{}\n", line(5)));
}

#[test]
fn test_at_most_two_files_ever() {
    let dir = TempDir::new().unwrap();
    let writer = writer_with_threshold(&dir, 50, Box::new(Vec::new));

    for i in 0..40 {
        writer.enqueue_raw(line(i));
    }
    assert!(writer.wait_for_flush_timeout(FLUSH_TIMEOUT));

    let files: Vec<_> = fs::read_dir(dir.path().join("logs"))
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(files.len(), 2);
    assert!(files.contains(&"Data.log".into()));
    assert!(files.contains(&"Data1.log".into()));
}

#[test]
fn test_rotation_callback_lines_open_new_file() {
    let dir = TempDir::new().unwrap();
    let callback: RotateCallback =
        Box::new(|| vec!["state: connected".to_string(), "version: 4.0".to_string()]);
    let writer = writer_with_threshold(&dir, 60, callback);

    for i in 0..3 {
        writer.enqueue_raw(line(i));
    }
    assert!(writer.wait_for_flush_timeout(FLUSH_TIMEOUT));

    // Third line crossed the threshold; the new active file starts with
    // the callback's snapshot.
    let active = fs::read_to_string(dir.path().join("logs").join("Data1.log")).unwrap();
    assert!(active.starts_with("state: connected\nversion: 4.0\n"));
}

#[test]
fn test_fifo_holds_across_rotation() {
    let dir = TempDir::new().unwrap();
    let writer = writer_with_threshold(&dir, 100, Box::new(Vec::new));

    let lines: Vec<String> = (0..9).map(line).collect();
    for l in &lines {
        writer.enqueue_raw(l.clone());
    }
    assert!(writer.wait_for_flush_timeout(FLUSH_TIMEOUT));

    // Concatenating backup then active yields the original order with
    // nothing lost or reordered.
    let logs = dir.path().join("logs");
    let mut all = String::new();
    // 9 lines * 30 bytes rotate at lines 4 and 8, so Data.log holds the
    // middle generation and Data1.log the newest.
    for name in ["Data1.log", "Data.log"] {
        let path = logs.join(name);
        if path.exists() {
            all.push_str(&fs::read_to_string(path).unwrap());
        }
    }
    let written: Vec<&str> = all.lines().collect();
    let expected: Vec<&str> = lines[4..].iter().map(String::as_str).collect();
    assert_eq!(written, expected);
}
