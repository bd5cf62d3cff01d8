//! # TransferPool - Priority-Scheduled Bulk File Transfers
//!
//! TransferPool is a concurrent job-execution engine for bulk file-system
//! operations: directory creation, file writes, and file copies run in
//! parallel across a worker pool while respecting priority, bounding
//! retries, and reporting fine-grained lifecycle events to a single
//! observer.
//!
//! ## Features
//!
//! - **Priority scheduling**: higher-priority jobs are always served first;
//!   equal priorities keep arrival order (stable ordering)
//! - **Bounded retries**: failed jobs are requeued until a configurable
//!   retry budget is exhausted, then abandoned with a notification
//! - **Cooperative cancellation**: per-job tokens polled between I/O chunks,
//!   plus a service-wide stop that never interrupts in-flight work
//! - **Dynamic pool sizing**: grow or shrink the worker pool at runtime
//! - **Wide observer contract**: ~25 fire-and-forget notifications covering
//!   job, queue, worker, and service lifecycles, with ready-made `tracing`
//!   and channel-backed implementations
//!
//! ## Quick Start
//!
//! ```no_run
//! use transferpool::prelude::*;
//! use std::sync::Arc;
//!
//! let service = TransferService::with_observer(
//!     TransferConfig::default(),
//!     Arc::new(LoggingObserver::new()),
//! );
//!
//! service.start(4).unwrap();
//! service
//!     .enqueue(Job::directory_creation("/data/out", true).with_priority(10))
//!     .unwrap();
//! service
//!     .enqueue(Job::file_copy("/data/in/a.bin", "/data/out/a.bin", Default::default()))
//!     .unwrap();
//!
//! service.complete_adding();
//! service.join();
//! ```
//!
//! ## Consuming events as a stream
//!
//! ```no_run
//! use transferpool::prelude::*;
//! use std::sync::Arc;
//!
//! let (sender, events) = EventSender::unbounded();
//! let service = TransferService::with_observer(TransferConfig::default(), Arc::new(sender));
//!
//! std::thread::spawn(move || {
//!     for event in events.iter() {
//!         println!("{event:?}");
//!     }
//! });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod core;
pub mod error;
pub mod fs;
pub mod job;
pub mod observer;

// Re-export commonly used types
pub use cancel::CancellationToken;
pub use config::TransferConfig;
pub use crate::core::TransferService;
pub use error::{Result, TransferError};
pub use job::{Job, JobInfo, JobKind, JobKindName};
pub use observer::{EventSender, LoggingObserver, NullObserver, TransferEvent, TransferObserver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use transferpool::prelude::*;
    //! ```

    pub use crate::cancel::CancellationToken;
    pub use crate::config::TransferConfig;
    pub use crate::core::TransferService;
    pub use crate::error::{Result, TransferError};
    pub use crate::fs::{CopyOptions, TransferStats, WriteOptions};
    pub use crate::job::{
        DirectoryCreationJob, DirectoryListener, FileCopyJob, FileCopyListener, FileWriteJob,
        FileWriteListener, Job, JobInfo, JobKind, JobKindName,
    };
    pub use crate::observer::{
        EventSender, LoggingObserver, NullObserver, TransferEvent, TransferObserver,
    };
}
