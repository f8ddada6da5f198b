//! Single-file fetch: streaming GET written straight to the target path.
//!
//! This is a data-returning boundary: every failure becomes a
//! [`DownloadOutcome`] with `success = false`, never an `Err` that could
//! unwind into sibling workers.

use crate::job::{DownloadOutcome, FileDescriptor};
use crate::pathsafe;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Error from one transfer attempt, split by layer so the outcome message
/// names the failing category.
#[derive(Debug)]
pub(super) enum FetchError {
    /// Curl transport failure (timeout, DNS, connection reset, ...).
    Transfer(curl::Error),
    /// HTTP response with a non-2xx status.
    Http(u32),
    /// Local filesystem failure (unsafe path, mkdir, open, write).
    Storage(std::io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transfer(e) => write!(f, "transfer failed: {}", e),
            FetchError::Http(status) => write!(f, "transfer failed: HTTP {}", status),
            FetchError::Storage(e) => write!(f, "storage failed: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transfer(e) => Some(e),
            FetchError::Http(_) => None,
            FetchError::Storage(e) => Some(e),
        }
    }
}

/// Downloads one descriptor into `dest_root` and reports the result as data.
pub(super) fn fetch(
    descriptor: &FileDescriptor,
    dest_root: &Path,
    auth_token: Option<&str>,
    timeout: Duration,
    verbose: bool,
) -> DownloadOutcome {
    match fetch_inner(descriptor, dest_root, auth_token, timeout) {
        Ok(()) => DownloadOutcome {
            relative_path: descriptor.relative_path.clone(),
            success: true,
            message: verbose.then(|| format!("downloaded: {}", descriptor.relative_path)),
        },
        Err(e) => DownloadOutcome {
            relative_path: descriptor.relative_path.clone(),
            success: false,
            message: Some(format!("{}: {}", descriptor.relative_path, e)),
        },
    }
}

/// GET with streaming write: each chunk from curl's write callback goes
/// straight to the target file, so memory stays O(chunk), not O(file).
fn fetch_inner(
    descriptor: &FileDescriptor,
    dest_root: &Path,
    auth_token: Option<&str>,
    timeout: Duration,
) -> Result<(), FetchError> {
    if !pathsafe::is_safe_relative_path(&descriptor.relative_path) {
        return Err(FetchError::Storage(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "unsafe relative path (absolute or contains '..')",
        )));
    }

    let target = dest_root.join(&descriptor.relative_path);
    if let Some(parent) = target.parent() {
        // Idempotent under races with other workers creating shared ancestors.
        std::fs::create_dir_all(parent).map_err(FetchError::Storage)?;
    }

    // Truncate: a re-run always re-downloads and overwrites, never appends.
    let file = File::create(&target).map_err(FetchError::Storage)?;
    let mut writer = BufWriter::new(file);
    let mut storage_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(&descriptor.source_url)
        .map_err(FetchError::Transfer)?;
    easy.follow_location(true).map_err(FetchError::Transfer)?;
    easy.connect_timeout(CONNECT_TIMEOUT)
        .map_err(FetchError::Transfer)?;
    // Hard wall-clock timeout so a hung transfer cannot pin a worker.
    easy.timeout(timeout).map_err(FetchError::Transfer)?;

    if let Some(token) = auth_token {
        let mut list = curl::easy::List::new();
        list.append(&format!("Authorization: Bearer {}", token))
            .map_err(FetchError::Transfer)?;
        easy.http_headers(list).map_err(FetchError::Transfer)?;
    }

    let perform_result = {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| match writer.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    // Returning a short write makes curl stop with a write
                    // error; the io::Error is recovered below.
                    storage_error = Some(e);
                    Ok(0)
                }
            })
            .map_err(FetchError::Transfer)?;
        transfer.perform()
    };

    if let Err(e) = perform_result {
        drop(writer);
        let _ = std::fs::remove_file(&target);
        if e.is_write_error() {
            if let Some(io_err) = storage_error.take() {
                return Err(FetchError::Storage(io_err));
            }
        }
        return Err(FetchError::Transfer(e));
    }

    if let Err(e) = writer.flush() {
        let _ = std::fs::remove_file(&target);
        return Err(FetchError::Storage(e));
    }
    drop(writer);

    let status = easy.response_code().map_err(FetchError::Transfer)?;
    if status < 200 || status >= 300 {
        // The body already written is an error page, not the file.
        let _ = std::fs::remove_file(&target);
        return Err(FetchError::Http(status));
    }

    Ok(())
}
