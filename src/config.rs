//! Service configuration

/// Configuration for a [`TransferService`](crate::core::service::TransferService)
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Number of worker threads spawned when `start(0)` is called
    pub workers: usize,
    /// Maximum execution attempts per job before it is abandoned
    ///
    /// Every job is executed at least once regardless of this bound, so `0`
    /// behaves the same as `1`: one attempt, no requeues.
    pub max_retries: u32,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransferConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.max_retries, 3);
    }
}
