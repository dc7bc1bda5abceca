//! Atomic I/O operations with file locking

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::{Error, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename so concurrent readers never observe a
/// partially written file.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    write_impl(path, content, false)
}

/// Write content atomically, holding an exclusive advisory lock on the
/// temp file while it is being filled.
///
/// Used for the config file, which may be rewritten by migration and by
/// operator-triggered updates from another process.
pub fn write_atomic_locked(path: &Path, content: &[u8]) -> Result<()> {
    write_impl(path, content, true)
}

fn write_impl(path: &Path, content: &[u8], lock: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    // Temp file in the same directory, so the rename stays on one filesystem.
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    if lock {
        temp_file
            .lock_exclusive()
            .map_err(|_| Error::LockFailed {
                path: path.to_path_buf(),
            })?;
    }

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| Error::io(&temp_path, e))?;

    if lock {
        FileExt::unlock(&temp_file).map_err(|_| Error::LockFailed {
            path: path.to_path_buf(),
        })?;
    }

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    tracing::debug!(?path, bytes = content.len(), locked = lock, "Atomic write");

    Ok(())
}
