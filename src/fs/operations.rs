//! Blocking file operations
//!
//! Chunked copy and write loops that poll a cancellation token between
//! chunks and report byte-level progress to a caller-supplied sink.

use crate::cancel::CancellationToken;
use crate::error::{IoResultExt, Result, TransferError};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Statistics for one completed copy or write
#[derive(Debug, Clone, Default)]
pub struct TransferStats {
    /// Bytes transferred
    pub bytes: u64,
    /// Wall-clock duration of the transfer
    pub duration: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
}

impl TransferStats {
    /// Calculate throughput from bytes and duration
    pub fn calculate_throughput(&mut self) {
        if self.duration.as_secs_f64() > 0.0 {
            self.throughput = self.bytes as f64 / self.duration.as_secs_f64();
        }
    }
}

/// Options for file copy operations
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Replace the target if it already exists
    pub overwrite: bool,
    /// Buffer size for the chunked read/write loop
    pub buffer_size: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            buffer_size: 256 * 1024,
        }
    }
}

/// Options for file write operations
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Replace the target if it already exists
    pub overwrite: bool,
    /// Chunk size the in-memory payload is written in
    pub chunk_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            overwrite: false,
            chunk_size: 64 * 1024,
        }
    }
}

/// Map a raw I/O error at `path` onto the typed error taxonomy
pub fn map_io_error(path: &Path, err: std::io::Error) -> TransferError {
    use std::io::ErrorKind;

    match err.kind() {
        ErrorKind::NotFound => TransferError::NotFound(path.to_path_buf()),
        ErrorKind::AlreadyExists => TransferError::AlreadyExists(path.to_path_buf()),
        ErrorKind::PermissionDenied => TransferError::PermissionDenied(path.to_path_buf()),
        ErrorKind::InvalidInput => TransferError::InvalidPath(path.display().to_string()),
        _ => {
            #[cfg(unix)]
            if let Some(code) = err.raw_os_error() {
                if code == libc::ENOTEMPTY {
                    return TransferError::NotEmpty(path.to_path_buf());
                }
                if code == libc::EBUSY {
                    return TransferError::Busy(path.to_path_buf());
                }
            }
            TransferError::io(path, err)
        }
    }
}

/// Create a directory at `path`
///
/// With `recursive` set, missing parents are created and an existing
/// directory is not an error; without it, both conditions map onto the
/// error taxonomy (`NotFound` for a missing parent, `AlreadyExists` for a
/// present target).
pub fn ensure_directory(path: &Path, recursive: bool) -> Result<()> {
    let result = if recursive {
        fs::create_dir_all(path)
    } else {
        fs::create_dir(path)
    };
    result.map_err(|e| map_io_error(path, e))
}

fn open_target(path: &Path, overwrite: bool) -> Result<File> {
    let result = if overwrite {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    };
    result.map_err(|e| map_io_error(path, e))
}

/// Copy `source` to `target` in buffered chunks
///
/// The cancellation token is polled before every chunk; on cancellation the
/// partially written target is left in place and `Cancelled` is returned.
/// The progress sink receives `(bytes_so_far, total_bytes)` after each chunk.
pub fn copy_file_chunked(
    source: &Path,
    target: &Path,
    options: &CopyOptions,
    cancel: &CancellationToken,
    mut progress: impl FnMut(u64, u64),
) -> Result<TransferStats> {
    let start = Instant::now();

    let input = File::open(source).map_err(|e| map_io_error(source, e))?;
    let total = input.metadata().with_path(source)?.len();
    let mut reader = BufReader::with_capacity(options.buffer_size, input);

    let output = open_target(target, options.overwrite)?;
    let mut writer = BufWriter::with_capacity(options.buffer_size, output);

    let mut buffer = vec![0u8; options.buffer_size];
    let mut copied = 0u64;

    loop {
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }

        let read = reader.read(&mut buffer).map_err(|e| map_io_error(source, e))?;
        if read == 0 {
            break;
        }

        writer
            .write_all(&buffer[..read])
            .map_err(|e| map_io_error(target, e))?;
        copied += read as u64;
        progress(copied, total);
    }

    writer.flush().map_err(|e| map_io_error(target, e))?;

    let mut stats = TransferStats {
        bytes: copied,
        duration: start.elapsed(),
        throughput: 0.0,
    };
    stats.calculate_throughput();
    Ok(stats)
}

/// Write an in-memory payload to `path` in chunks
///
/// Same cancellation and progress contract as [`copy_file_chunked`].
pub fn write_file_chunked(
    path: &Path,
    contents: &[u8],
    options: &WriteOptions,
    cancel: &CancellationToken,
    mut progress: impl FnMut(u64, u64),
) -> Result<TransferStats> {
    let start = Instant::now();
    let total = contents.len() as u64;

    let output = open_target(path, options.overwrite)?;
    let mut writer = BufWriter::with_capacity(options.chunk_size, output);

    let mut written = 0u64;
    for chunk in contents.chunks(options.chunk_size.max(1)) {
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }

        writer.write_all(chunk).map_err(|e| map_io_error(path, e))?;
        written += chunk.len() as u64;
        progress(written, total);
    }

    writer.flush().map_err(|e| map_io_error(path, e))?;

    let mut stats = TransferStats {
        bytes: written,
        duration: start.elapsed(),
        throughput: 0.0,
    };
    stats.calculate_throughput();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_roundtrip() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        let payload = vec![0xA5u8; 700 * 1024];
        fs::write(&source, &payload).unwrap();

        let token = CancellationToken::new();
        let mut updates = Vec::new();
        let stats = copy_file_chunked(
            &source,
            &target,
            &CopyOptions::default(),
            &token,
            |done, total| updates.push((done, total)),
        )
        .unwrap();

        assert_eq!(stats.bytes, payload.len() as u64);
        assert_eq!(fs::read(&target).unwrap(), payload);
        // Monotonic progress ending at the full size
        assert!(updates.windows(2).all(|w| w[0].0 <= w[1].0));
        assert_eq!(updates.last().unwrap(), &(stats.bytes, stats.bytes));
    }

    #[test]
    fn test_copy_refuses_existing_target() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        fs::write(&source, b"new").unwrap();
        fs::write(&target, b"old").unwrap();

        let err = copy_file_chunked(
            &source,
            &target,
            &CopyOptions::default(),
            &CancellationToken::new(),
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, TransferError::AlreadyExists(_)));
        assert_eq!(fs::read(&target).unwrap(), b"old");
    }

    #[test]
    fn test_copy_overwrite() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        fs::write(&source, b"new contents").unwrap();
        fs::write(&target, b"old").unwrap();

        let options = CopyOptions {
            overwrite: true,
            ..Default::default()
        };
        copy_file_chunked(&source, &target, &options, &CancellationToken::new(), |_, _| {})
            .unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"new contents");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let err = copy_file_chunked(
            &dir.path().join("absent"),
            &dir.path().join("dst"),
            &CopyOptions::default(),
            &CancellationToken::new(),
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, TransferError::NotFound(_)));
    }

    #[test]
    fn test_copy_cancelled() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        fs::write(&source, b"data").unwrap();

        let token = CancellationToken::new();
        token.cancel();

        let err = copy_file_chunked(
            &source,
            &dir.path().join("dst.bin"),
            &CopyOptions::default(),
            &token,
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, TransferError::Cancelled));
    }

    #[test]
    fn test_copy_cancelled_mid_transfer_leaves_partial_target() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src.bin");
        let target = dir.path().join("dst.bin");
        let payload = vec![0xEEu8; 256 * 1024];
        fs::write(&source, &payload).unwrap();

        let token = CancellationToken::new();
        let cancel_from_sink = token.clone();
        let options = CopyOptions {
            overwrite: false,
            buffer_size: 64 * 1024,
        };

        // Trip the token after the first chunk lands; the loop must stop at
        // its next checkpoint instead of finishing the copy.
        let mut chunks_seen = 0u32;
        let err = copy_file_chunked(&source, &target, &options, &token, |_, _| {
            chunks_seen += 1;
            cancel_from_sink.cancel();
        })
        .unwrap_err();

        assert!(matches!(err, TransferError::Cancelled));
        assert_eq!(chunks_seen, 1);

        // The partially written target stays in place
        let written = fs::metadata(&target).unwrap().len();
        assert!(written < payload.len() as u64);
    }

    #[test]
    fn test_write_chunked() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.bin");
        let payload = vec![0x3Cu8; 256 * 1024];

        let options = WriteOptions {
            overwrite: false,
            chunk_size: 16 * 1024,
        };
        let mut updates = Vec::new();
        let stats = write_file_chunked(
            &path,
            &payload,
            &options,
            &CancellationToken::new(),
            |done, total| updates.push((done, total)),
        )
        .unwrap();

        assert_eq!(stats.bytes, payload.len() as u64);
        assert_eq!(fs::read(&path).unwrap(), payload);
        assert_eq!(updates.len(), payload.len() / options.chunk_size);
    }

    #[test]
    fn test_ensure_directory() {
        let dir = TempDir::new().unwrap();

        let nested = dir.path().join("a/b/c");
        ensure_directory(&nested, true).unwrap();
        assert!(nested.is_dir());

        // Recursive creation of an existing directory is not an error
        ensure_directory(&nested, true).unwrap();

        let err = ensure_directory(&nested, false).unwrap_err();
        assert!(matches!(err, TransferError::AlreadyExists(_)));

        let err = ensure_directory(&dir.path().join("x/y/z"), false).unwrap_err();
        assert!(matches!(err, TransferError::NotFound(_)));
    }
}
