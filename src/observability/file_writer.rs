//! Append-only line writer with size-based rotation.
//!
//! Keeps trace files from growing without bound: once the active file passes
//! its size limit it is renamed to `<stem>.<utc timestamp>.<ext>` and a fresh
//! file is started. Only the newest backups are kept.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default size that triggers rotation (10 MB).
pub const DEFAULT_ROTATE_BYTES: u64 = 10 * 1024 * 1024;

/// Default number of rotated backups kept next to the active file.
pub const DEFAULT_BACKUPS: usize = 3;

struct Active {
    file: File,
    size: u64,
}

/// Thread-safe rotating writer.
///
/// The file is opened lazily on the first write, so construction never
/// touches the filesystem.
pub struct RotatingWriter {
    path: PathBuf,
    rotate_bytes: u64,
    backups: usize,
    active: Mutex<Option<Active>>,
}

impl RotatingWriter {
    /// Creates a writer with the default limits.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_ROTATE_BYTES, DEFAULT_BACKUPS)
    }

    /// Creates a writer rotating after `rotate_bytes` and keeping `backups`
    /// old files.
    #[must_use]
    pub const fn with_limits(path: PathBuf, rotate_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            rotate_bytes,
            backups,
            active: Mutex::new(None),
        }
    }

    /// Path of the active file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error from opening, renaming, or writing,
    /// or an error if a previous writer panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut active = self
            .active
            .lock()
            .map_err(|e| io::Error::other(format!("writer lock poisoned: {e}")))?;

        if active.as_ref().is_some_and(|a| a.size >= self.rotate_bytes) {
            *active = None;
            self.rotate()?;
        }

        if active.is_none() {
            *active = Some(self.open()?);
        }
        let Some(current) = active.as_mut() else {
            return Err(io::Error::other("trace file unavailable"));
        };

        writeln!(current.file, "{line}")?;
        current.file.flush()?;
        current.size += line.len() as u64 + 1;
        Ok(())
    }

    fn open(&self) -> io::Result<Active> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let size = file.metadata()?.len();

        if size >= self.rotate_bytes {
            drop(file);
            self.rotate()?;
            return self.open_fresh();
        }

        Ok(Active { file, size })
    }

    fn open_fresh(&self) -> io::Result<Active> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(Active { file, size: 0 })
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.6f");
        let backup = self.backup_path(&stamp.to_string());

        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }

        self.prune()
    }

    fn backup_path(&self, stamp: &str) -> PathBuf {
        let (stem, ext) = self.stem_and_extension();
        self.path.with_file_name(format!("{stem}.{stamp}.{ext}"))
    }

    fn stem_and_extension(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .map_or_else(|| "trace".to_string(), |s| s.to_string_lossy().into_owned());
        let ext = self
            .path
            .extension()
            .map_or_else(|| "log".to_string(), |s| s.to_string_lossy().into_owned());
        (stem, ext)
    }

    /// Backups of the active file, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let Some(dir) = self.path.parent() else {
            return Ok(Vec::new());
        };
        let (stem, ext) = self.stem_and_extension();
        let prefix = format!("{stem}.");
        let suffix = format!(".{ext}");
        let active_name = self.path.file_name();

        let mut backups: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.file_name() != active_name)
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
            })
            .collect();

        backups.sort();
        Ok(backups)
    }

    fn prune(&self) -> io::Result<()> {
        let backups = self.backups()?;
        let excess = backups.len().saturating_sub(self.backups);

        for old in &backups[..excess] {
            if let Err(e) = fs::remove_file(old) {
                tracing::debug!(path = %old.display(), error = %e, "could not remove old trace file");
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("path", &self.path)
            .field("rotate_bytes", &self.rotate_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}
