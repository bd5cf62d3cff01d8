//! Synchronous file-system primitives consumed by job bodies
//!
//! Everything here is plain blocking I/O: directory creation, buffered
//! chunked copy and write loops, and the mapping from raw I/O errors to the
//! typed [`TransferError`](crate::error::TransferError) taxonomy. The
//! scheduler core calls into this module and nothing else touches the disk.

mod operations;

pub use operations::{
    copy_file_chunked, ensure_directory, map_io_error, write_file_chunked, CopyOptions,
    TransferStats, WriteOptions,
};
