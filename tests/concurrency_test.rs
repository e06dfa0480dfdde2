//! Concurrent logging through shared handles never interleaves records.

mod common;

use common::json_logger;
use std::collections::HashSet;
use std::thread;
use teelog::{JsonSink, Level, Logger, RotatingFile, RotationPolicy};
use tempfile::TempDir;

#[test]
fn test_hundred_threads_produce_hundred_lines() {
    let (logger, out) = json_logger(Level::Info);

    thread::scope(|scope| {
        for n in 0..100_u64 {
            let logger = logger.clone();
            scope.spawn(move || {
                logger
                    .info()
                    .uint("worker", n)
                    .str("payload", "z".repeat(200))
                    .msg("done");
            });
        }
    });

    let records = out.records();
    assert_eq!(records.len(), 100);
    let workers: HashSet<u64> = records
        .iter()
        .map(|record| record["worker"].as_u64().unwrap())
        .collect();
    assert_eq!(workers.len(), 100);
}

#[test]
fn test_concurrent_writes_to_rotating_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("busy.log");
    let policy = RotationPolicy::default()
        .with_max_size(4096)
        .with_max_backups(0)
        .with_compress(false);
    let logger = Logger::builder()
        .sink(JsonSink::new(RotatingFile::new(&path, policy)))
        .build();

    thread::scope(|scope| {
        for t in 0..8_i64 {
            let logger = &logger;
            scope.spawn(move || {
                for i in 0..25_i64 {
                    logger.warn().int("thread", t).int("i", i).msg("busy");
                }
            });
        }
    });
    drop(logger);

    let mut total = 0;
    for entry in std::fs::read_dir(temp_dir.path()).unwrap() {
        let contents = std::fs::read_to_string(entry.unwrap().path()).unwrap();
        for line in contents.lines() {
            let record: serde_json::Value = serde_json::from_str(line).unwrap();
            assert_eq!(record["message"], "busy");
            total += 1;
        }
    }
    assert_eq!(total, 200);
}

#[test]
fn test_set_level_while_logging() {
    let (logger, out) = json_logger(Level::Info);

    thread::scope(|scope| {
        let writer = logger.clone();
        scope.spawn(move || {
            for _ in 0..200 {
                writer.debug().msg("maybe");
                writer.error().msg("always");
            }
        });
        scope.spawn(|| {
            for n in 0..200 {
                logger.set_level(if n % 2 == 0 { Level::Debug } else { Level::Info });
            }
        });
    });

    let records = out.records();
    let errors = records.iter().filter(|r| r["level"] == "error").count();
    assert_eq!(errors, 200);
    assert!(records.iter().all(|r| r["level"] == "error" || r["level"] == "debug"));
}
