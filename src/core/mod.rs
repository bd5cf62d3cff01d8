//! Scheduler core: priority queue, worker pool, and the transfer service

mod order;
pub(crate) mod pool;
pub(crate) mod queue;
pub mod service;

pub use service::TransferService;
