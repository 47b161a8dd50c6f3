//! Append-mode C stream for engine file logging

use crate::error::{Result, VlcError};
use std::fs::OpenOptions;
use std::os::fd::IntoRawFd;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;

/// An open `FILE *` in append mode, closed on drop
///
/// The file is created if missing and never truncated.
#[derive(Debug)]
pub struct LogFile {
    stream: NonNull<libc::FILE>,
    path: PathBuf,
}

// The stream is only written by the engine and closed by the owner.
unsafe impl Send for LogFile {}
unsafe impl Sync for LogFile {}

impl LogFile {
    /// Open `path` for appending
    ///
    /// # Errors
    ///
    /// `InvalidLogTarget` for an empty path or a directory, `LogTarget` when
    /// the open itself fails (missing parent, permissions, ...).
    pub fn open_append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() || path.is_dir() {
            return Err(VlcError::InvalidLogTarget(path.to_path_buf()));
        }

        let target_err = |source| VlcError::LogTarget {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(target_err)?;

        let fd = file.into_raw_fd();
        let stream = unsafe { libc::fdopen(fd, c"a".as_ptr()) };
        let Some(stream) = NonNull::new(stream) else {
            let source = std::io::Error::last_os_error();
            unsafe {
                libc::close(fd);
            }
            return Err(target_err(source));
        };

        Ok(LogFile {
            stream,
            path: path.to_path_buf(),
        })
    }

    pub fn as_ptr(&self) -> *mut libc::FILE {
        self.stream.as_ptr()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LogFile {
    fn drop(&mut self) {
        let rc = unsafe { libc::fclose(self.stream.as_ptr()) };
        if rc != 0 {
            tracing::warn!(
                "Closing log file {:?} failed: {}",
                self.path,
                std::io::Error::last_os_error()
            );
        }
    }
}
