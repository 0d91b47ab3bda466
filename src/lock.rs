//! Single-instance lock file.
//!
//! The lock lives in `$XDG_RUNTIME_DIR` (falling back to `/tmp`). It is opened
//! without truncation so a second instance probing the lock never wipes the
//! PID the first one wrote; the content is only replaced after the exclusive
//! lock has been acquired.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::logger::Log;

pub fn default_lock_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("photoframe.lock")
}

/// Held for the lifetime of the running frame.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    /// Try to take the lock. `Ok(None)` means another instance holds it.
    pub fn acquire(path: &Path) -> Result<Option<Self>> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open lock file {}", path.display()))?;

        if file.try_lock_exclusive().is_err() {
            return Ok(None);
        }

        file.set_len(0).context("failed to reset lock file")?;
        writeln!(file, "{}", std::process::id()).context("failed to write lock file")?;
        file.flush().context("failed to flush lock file")?;

        Ok(Some(Self {
            file,
            path: path.to_path_buf(),
        }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded in a lock file, if it holds one.
    pub fn read_pid(path: &Path) -> Option<u32> {
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }

    /// Unlock and remove the file.
    pub fn release(self) {
        let _ = FileExt::unlock(&self.file);
        drop(self.file);
        match fs::remove_file(&self.path) {
            Ok(()) => Log::log_decorated("Lock file removed successfully"),
            Err(e) => Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e)),
        }
    }
}
