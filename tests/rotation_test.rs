//! End-to-end rotation through a logger: size-triggered rotation, retention
//! and compressed backups.

use flate2::read::GzDecoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use teelog::{JsonSink, Level, Logger, RotatingFile, RotationPolicy};
use tempfile::TempDir;

fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    entries.sort();
    entries
}

fn gunzip(path: &Path) -> String {
    let mut text = String::new();
    GzDecoder::new(fs::File::open(path).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    text
}

#[test]
fn test_retains_seven_compressed_backups() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let policy = RotationPolicy::default()
        .with_max_size(100)
        .with_max_backups(7)
        .with_compress(true);

    let mut file = RotatingFile::new(&path, policy);
    for n in 0..21 {
        let chunk = format!("{n:02}{}\n", "x".repeat(57));
        assert_eq!(chunk.len(), 60);
        file.write_all(chunk.as_bytes()).unwrap();
    }
    drop(file);

    let entries = dir_entries(temp_dir.path());
    let backups: Vec<&PathBuf> = entries.iter().filter(|p| **p != path).collect();
    assert_eq!(backups.len(), 7, "{entries:?}");
    assert!(backups
        .iter()
        .all(|p| p.extension().is_some_and(|ext| ext == "gz")));

    // Backup names sort chronologically; the newest holds the second to last chunk
    let newest = backups.last().unwrap();
    assert!(gunzip(newest).starts_with("19"));
    assert!(fs::read_to_string(&path).unwrap().starts_with("20"));
}

#[test]
fn test_logger_rotates_json_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("svc.log");
    let policy = RotationPolicy::default()
        .with_max_size(512)
        .with_max_backups(0)
        .with_max_age(Duration::ZERO)
        .with_compress(false);

    let logger = Logger::builder()
        .level(Level::Debug)
        .sink(JsonSink::new(RotatingFile::new(&path, policy)))
        .build();
    for n in 0..50_i64 {
        logger.info().int("n", n).str("pad", "y".repeat(40)).msg("tick");
    }
    drop(logger);

    let mut seen = Vec::new();
    for entry in dir_entries(temp_dir.path()) {
        let contents = fs::read_to_string(&entry).unwrap();
        assert!(contents.len() <= 512, "{} is {} bytes", entry.display(), contents.len());
        for line in contents.lines() {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            seen.push(record["n"].as_i64().unwrap());
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..50).collect::<Vec<_>>(), "no record lost across rotations");
}

#[test]
fn test_expired_backups_are_removed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.log");
    let stale = temp_dir.path().join("app-2001-01-01T00-00-00.000.log.gz");
    let unrelated = temp_dir.path().join("notes.txt");
    fs::write(&stale, b"old").unwrap();
    fs::write(&unrelated, b"keep me").unwrap();

    let policy = RotationPolicy::default().with_max_age(Duration::from_secs(24 * 60 * 60));
    let report = RotatingFile::new(&path, policy).cleanup().unwrap();

    assert_eq!(report.removed, 1);
    assert!(!stale.exists());
    assert!(unrelated.exists());
}
