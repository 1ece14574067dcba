//! Advisory locking for the work-unit document.
//!
//! Mutations take an exclusive `fs2` lock on a sidecar `<document>.lock`
//! file. Acquisition never blocks indefinitely: it polls with
//! `try_lock_exclusive` and backs off exponentially for a bounded number of
//! attempts, then fails with `LockTimeout`.
//!
//! Advisory locks are cooperative - every writer must go through
//! [`FileLock::acquire`] for the locking to be effective.

use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::errors::{Result, WorkflowError};

/// Retry schedule for lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockPolicy {
    /// Total attempts, including the first one.
    pub attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for LockPolicy {
    fn default() -> Self {
        Self {
            attempts: 10,
            initial_backoff: Duration::from_millis(25),
            max_backoff: Duration::from_millis(400),
        }
    }
}

impl LockPolicy {
    /// Delay to wait after the given failed attempt (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }
}

/// An exclusive lock held for the lifetime of the value.
///
/// Dropping the guard releases the lock, so early returns and `?` inside a
/// transaction never leave the document locked.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Lock the sidecar file guarding `document`, retrying per `policy`.
    pub fn acquire(document: &Path, policy: &LockPolicy) -> Result<Self> {
        let path = lock_path(document)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| WorkflowError::io(parent, e))?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| WorkflowError::io(&path, e))?;

        let attempts = policy.attempts.max(1);
        for attempt in 0..attempts {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    tracing::debug!(lock = %path.display(), attempt, "acquired document lock");
                    return Ok(Self { file, path });
                }
                Err(err) if is_contended(&err) => {
                    if attempt + 1 < attempts {
                        let delay = policy.backoff(attempt);
                        tracing::debug!(
                            lock = %path.display(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "document lock busy, backing off"
                        );
                        thread::sleep(delay);
                    }
                }
                Err(err) => return Err(WorkflowError::io(&path, err)),
            }
        }

        tracing::warn!(lock = %path.display(), attempts, "gave up waiting for document lock");
        Err(WorkflowError::LockTimeout {
            path: document.to_path_buf(),
            attempts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            tracing::warn!(
                lock = %self.path.display(),
                error = %err,
                "failed to release document lock"
            );
        }
    }
}

/// `spec/work-units.json` -> `spec/work-units.json.lock`
pub fn lock_path(document: &Path) -> Result<PathBuf> {
    let name = document.file_name().ok_or_else(|| {
        WorkflowError::io(
            document,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "document path has no file name"),
        )
    })?;
    let mut lock_name = OsString::from(name);
    lock_name.push(".lock");
    Ok(document.with_file_name(lock_name))
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == fs2::lock_contended_error().kind()
}
