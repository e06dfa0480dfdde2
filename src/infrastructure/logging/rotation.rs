//! Log file rotation and cleanup
//!
//! Provides a size-triggered rotating file writer:
//! - The active file is rotated before a write would push it past the size limit
//! - Rotated files are renamed with a timestamp for archival
//! - A background pass prunes backups by count and age, and gzips the rest

use chrono::{Local, NaiveDateTime, SubsecRound, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::errors::LogError;
use crate::domain::models::RotationConfig;

/// Bytes per megabyte of `max_size`
pub const MEGABYTE: u64 = 1024 * 1024;

/// Timestamp embedded in backup names: `app-2024-05-01T10-20-30.456.log`
pub const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

/// Suffix appended to compressed backups
pub const COMPRESS_SUFFIX: &str = ".gz";

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Size, count and age limits for a rotating file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum file size in bytes before rotation
    pub max_size: u64,
    /// Rotated files to keep; 0 keeps all
    pub max_backups: usize,
    /// Age after which rotated files are deleted; zero keeps them forever
    pub max_age: Duration,
    /// Gzip rotated files
    pub compress: bool,
    /// Stamp backups with local time instead of UTC
    pub local_time: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from(&RotationConfig::default())
    }
}

impl From<&RotationConfig> for RotationPolicy {
    fn from(config: &RotationConfig) -> Self {
        Self {
            max_size: config.max_size_mb.saturating_mul(MEGABYTE),
            max_backups: config.max_backups,
            max_age: Duration::from_secs(config.max_age_days.saturating_mul(SECONDS_PER_DAY)),
            compress: config.compress,
            local_time: config.local_time,
        }
    }
}

impl RotationPolicy {
    /// Override the size limit, in bytes
    #[must_use]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size = bytes;
        self
    }

    #[must_use]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = age;
        self
    }

    #[must_use]
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// Outcome of one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub compressed: usize,
}

/// File writer that rotates itself by size
///
/// The file is opened on the first write, so constructing a writer never
/// fails. Parent directories are created as needed.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    file: Option<File>,
    size: u64,
    /// Stamp of the newest backup; later backups are always stamped after it
    last_stamp: Option<NaiveDateTime>,
    mill: Option<Mill>,
}

impl RotatingFile {
    /// Create a rotating writer
    ///
    /// # Arguments
    /// * `path` - Active log file; backups are placed next to it
    /// * `policy` - Size, count and age limits
    pub fn new(path: impl Into<PathBuf>, policy: RotationPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
            file: None,
            size: 0,
            last_stamp: None,
            mill: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes written to the active file, including what it held when opened
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Close the active file, move it to a timestamped backup and open a
    /// fresh one. Backups are pruned and compressed in the background.
    ///
    /// # Errors
    /// Returns an error if the file cannot be renamed or reopened
    pub fn rotate(&mut self) -> io::Result<()> {
        self.close_file()?;
        self.open_new()?;
        self.trigger_cleanup();
        Ok(())
    }

    /// Run the prune/compress pass synchronously
    ///
    /// # Returns
    /// How many backups were removed and compressed
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be read
    pub fn cleanup(&self) -> io::Result<CleanupReport> {
        cleanup_backups(&self.path, &self.policy)
    }

    /// Rotated files next to the active one, newest first
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be read
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        Ok(list_backups(&self.path)?
            .into_iter()
            .map(|backup| backup.path)
            .collect())
    }

    fn close_file(&mut self) -> io::Result<()> {
        match self.file.take() {
            Some(mut file) => file.flush(),
            None => Ok(()),
        }
    }

    fn open_existing_or_new(&mut self, write_len: u64) -> io::Result<()> {
        self.trigger_cleanup();

        let metadata = match fs::metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return self.open_new(),
            Err(err) => return Err(err),
        };

        if metadata.len() + write_len >= self.policy.max_size {
            return self.rotate();
        }

        match OpenOptions::new().append(true).open(&self.path) {
            Ok(file) => {
                self.file = Some(file);
                self.size = metadata.len();
                Ok(())
            }
            // An unreadable old file is moved aside rather than appended to
            Err(_) => self.open_new(),
        }
    }

    fn open_new(&mut self) -> io::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        if self.path.exists() {
            let (backup, stamp) = backup_path(&self.path, self.next_stamp()?)?;
            fs::rename(&self.path, &backup)?;
            self.last_stamp = Some(stamp);
            info!(
                old_path = %self.path.display(),
                new_path = %backup.display(),
                "rotated log file"
            );
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.file = Some(file);
        self.size = 0;
        Ok(())
    }

    /// Current time, moved past the newest existing backup
    ///
    /// Retention orders backups by the stamp in their names, so stamps must
    /// grow with every rotation even when the clock does not advance.
    fn next_stamp(&self) -> io::Result<NaiveDateTime> {
        let last = match self.last_stamp {
            Some(stamp) => Some(stamp),
            None => list_backups(&self.path)?.first().map(|backup| backup.stamp),
        };
        let now = self.policy.now().trunc_subsecs(3);
        Ok(match last {
            Some(last) if now <= last => last + chrono::Duration::milliseconds(1),
            _ => now,
        })
    }

    fn trigger_cleanup(&mut self) {
        if self.policy.max_backups == 0 && self.policy.max_age.is_zero() && !self.policy.compress {
            return;
        }
        let mill = self
            .mill
            .get_or_insert_with(|| Mill::spawn(self.path.clone(), self.policy));
        mill.trigger();
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len() as u64;
        if len > self.policy.max_size {
            return Err(LogError::WriteTooLarge {
                len: buf.len(),
                max: self.policy.max_size,
            }
            .into());
        }

        if self.file.is_none() {
            self.open_existing_or_new(len)?;
        }

        if self.size + len > self.policy.max_size {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file is not open"))?;
        let written = file.write(buf)?;
        self.size += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for RotatingFile {
    fn drop(&mut self) {
        if let Err(err) = self.close_file() {
            warn!(path = %self.path.display(), error = %err, "failed to flush log file");
        }
        if let Some(mill) = self.mill.take() {
            mill.shutdown();
        }
    }
}

/// Background thread running cleanup passes after rotations
#[derive(Debug)]
struct Mill {
    trigger: SyncSender<()>,
    handle: Option<JoinHandle<()>>,
}

impl Mill {
    fn spawn(path: PathBuf, policy: RotationPolicy) -> Self {
        // One pending request is enough: a queued pass sees every backup
        let (trigger, requests) = mpsc::sync_channel(1);
        let handle = thread::Builder::new()
            .name("teelog-mill".to_string())
            .spawn(move || run_mill(&path, &policy, &requests))
            .map_err(|err| warn!(error = %err, "failed to spawn cleanup thread"))
            .ok();
        Self { trigger, handle }
    }

    fn trigger(&self) {
        match self.trigger.try_send(()) {
            Ok(()) | Err(TrySendError::Full(())) => {}
            Err(TrySendError::Disconnected(())) => {
                debug!("cleanup thread is gone, skipping cleanup");
            }
        }
    }

    fn shutdown(self) {
        drop(self.trigger);
        if let Some(handle) = self.handle {
            if handle.join().is_err() {
                warn!("cleanup thread panicked");
            }
        }
    }
}

fn run_mill(path: &Path, policy: &RotationPolicy, requests: &Receiver<()>) {
    while requests.recv().is_ok() {
        match cleanup_backups(path, policy) {
            Ok(report) => {
                if report.removed > 0 || report.compressed > 0 {
                    info!(
                        removed = report.removed,
                        compressed = report.compressed,
                        "cleaned up rotated log files"
                    );
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to clean up rotated log files");
            }
        }
    }
}

/// A rotated file recognised by its name
#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    /// Name without the compression suffix
    base_name: String,
    stamp: NaiveDateTime,
    compressed: bool,
}

/// Split `dir/app.log` into (`app-`, `.log`)
fn name_parts(path: &Path) -> io::Result<(String, String)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LogError::InvalidFilePath(path.display().to_string()))?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    Ok((format!("{stem}-"), ext))
}

fn backup_path(path: &Path, now: NaiveDateTime) -> io::Result<(PathBuf, NaiveDateTime)> {
    let (prefix, ext) = name_parts(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut stamp = now;
    loop {
        let candidate = dir.join(format!("{prefix}{}{ext}", stamp.format(BACKUP_TIME_FORMAT)));
        let compressed = gz_path(&candidate);
        if !candidate.exists() && !compressed.exists() {
            return Ok((candidate, stamp));
        }
        // Same millisecond as an earlier rotation
        stamp += chrono::Duration::milliseconds(1);
    }
}

fn gz_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

fn parse_stamp(name: &str, prefix: &str, ext: &str) -> Option<NaiveDateTime> {
    let stamp = name.strip_prefix(prefix)?.strip_suffix(ext)?;
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT).ok()
}

fn list_backups(path: &Path) -> io::Result<Vec<Backup>> {
    let (prefix, ext) = name_parts(path)?;
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => dir.to_path_buf(),
        None => PathBuf::from("."),
    };

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut backups = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        let (base_name, compressed) = match name.strip_suffix(COMPRESS_SUFFIX) {
            Some(base) => (base.to_string(), true),
            None => (name.clone(), false),
        };
        if let Some(stamp) = parse_stamp(&base_name, &prefix, &ext) {
            backups.push(Backup {
                path: entry.path(),
                base_name,
                stamp,
                compressed,
            });
        }
    }

    backups.sort_by(|a, b| b.stamp.cmp(&a.stamp));
    Ok(backups)
}

/// Remove backups beyond the count and age limits, then compress the rest
fn cleanup_backups(path: &Path, policy: &RotationPolicy) -> io::Result<CleanupReport> {
    let mut report = CleanupReport::default();
    let mut files = list_backups(path)?;
    let mut remove = Vec::new();

    if policy.max_backups > 0 && files.len() > policy.max_backups {
        // A backup and its compressed twin count once
        let mut preserved = HashSet::new();
        let mut remaining = Vec::with_capacity(files.len());
        for backup in files {
            preserved.insert(backup.base_name.clone());
            if preserved.len() > policy.max_backups {
                remove.push(backup);
            } else {
                remaining.push(backup);
            }
        }
        files = remaining;
    }

    if !policy.max_age.is_zero() {
        let cutoff = chrono::Duration::from_std(policy.max_age)
            .ok()
            .and_then(|age| policy.now().checked_sub_signed(age));
        if let Some(cutoff) = cutoff {
            let (expired, remaining): (Vec<_>, Vec<_>) =
                files.into_iter().partition(|backup| backup.stamp < cutoff);
            remove.extend(expired);
            files = remaining;
        }
    }

    for backup in &remove {
        match fs::remove_file(&backup.path) {
            Ok(()) => {
                debug!(path = %backup.path.display(), "deleted old log file");
                report.removed += 1;
            }
            Err(e) => warn!(path = %backup.path.display(), error = %e, "failed to delete old log file"),
        }
    }

    if policy.compress {
        for backup in files.iter().filter(|backup| !backup.compressed) {
            match compress_file(&backup.path) {
                Ok(dst) => {
                    debug!(path = %dst.display(), "compressed log file");
                    report.compressed += 1;
                }
                Err(e) => warn!(path = %backup.path.display(), error = %e, "failed to compress log file"),
            }
        }
    }

    Ok(report)
}

fn compress_file(src: &Path) -> io::Result<PathBuf> {
    let dst = gz_path(src);
    let mut input = File::open(src)?;

    let written = File::create(&dst).and_then(|output| {
        let mut encoder = GzEncoder::new(output, Compression::default());
        io::copy(&mut input, &mut encoder)?;
        encoder.finish()?.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&dst);
        return Err(err);
    }

    fs::remove_file(src)?;
    Ok(dst)
}
