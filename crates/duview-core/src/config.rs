//! Explorer configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Files reporting more than this many bytes are left out of every total.
pub const MAX_FILE_SIZE: u64 = 1 << 40;

/// Interval at which a busy indicator polls a running scan.
pub const BUSY_TICK: Duration = Duration::from_millis(100);

const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

/// Configuration for an explorer session.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct ExplorerConfig {
    /// Number of sorted children revealed per page of a directory.
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,

    /// How long a scan may run before callers are told it is still busy.
    #[builder(default = "Duration::from_millis(500)")]
    #[serde(default = "default_busy_grace")]
    pub busy_grace: Duration,
}

fn default_page_size() -> NonZeroUsize {
    DEFAULT_PAGE_SIZE
}

fn default_busy_grace() -> Duration {
    Duration::from_millis(500)
}

impl ExplorerConfig {
    /// Create a new config builder.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            page_size: default_page_size(),
            busy_grace: default_busy_grace(),
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_config_builder() {
        let config = ExplorerConfig::builder()
            .page_size(pages(25))
            .busy_grace(Duration::from_millis(50))
            .build()
            .unwrap();

        assert_eq!(config.page_size.get(), 25);
        assert_eq!(config.busy_grace, Duration::from_millis(50));
    }

    #[test]
    fn test_config_defaults() {
        let config = ExplorerConfig::builder().build().unwrap();
        assert_eq!(config, ExplorerConfig::default());
        assert_eq!(config.page_size.get(), 100);
        assert_eq!(config.busy_grace, Duration::from_millis(500));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let result = serde_json::from_str::<ExplorerConfig>(r#"{"page_size": 0}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_fills_defaults() {
        let config: ExplorerConfig = serde_json::from_str(r#"{"page_size": 7}"#).unwrap();
        assert_eq!(config.page_size.get(), 7);
        assert_eq!(config.busy_grace, Duration::from_millis(500));
    }

    #[test]
    fn test_size_cap_is_one_tebibyte() {
        assert_eq!(MAX_FILE_SIZE, 1_099_511_627_776);
    }
}
