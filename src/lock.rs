//! File-based locking around config modifications.
//!
//! Uses flock-style advisory locking so two `ipshield allowlist` invocations
//! cannot interleave their read-modify-write of the same config file.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// A guard that holds an exclusive lock next to a config file.
/// The lock is released when the guard is dropped.
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    /// Attempt to acquire an exclusive lock for `config_path`.
    /// Returns an error if another instance holds it.
    pub fn acquire(config_path: &Path) -> Result<Self> {
        let lock_path = lock_path_for(config_path);
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        // create+read+write without truncate avoids a race between create and lock
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&lock_path, std::fs::Permissions::from_mode(0o600))
                .context("Failed to set lock file permissions")?;
        }

        file.try_lock_exclusive().map_err(|_| {
            anyhow::anyhow!(
                "Another ipshield process is modifying {:?}.\n\
                 If you believe this is an error, remove the lock file: {:?}",
                config_path,
                lock_path
            )
        })?;

        Ok(Self {
            _file: file,
            path: lock_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `<config>.lock`, next to the config file.
pub fn lock_path_for(config_path: &Path) -> PathBuf {
    let mut name = OsString::from(config_path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
