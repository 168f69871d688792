//! Core configuration values and their normalization rules.
//!
//! # Invariants
//! - Listing limits are always within `1..=LISTING_LIMIT_MAX`.
//! - Logging stays disabled unless a `LoggingConfig` is supplied.

use crate::logging::default_log_level;
use std::path::PathBuf;

const LISTING_DEFAULT_LIMIT: u32 = 10;
const LISTING_LIMIT_MAX: u32 = 50;

/// Page sizing for listing screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingConfig {
    pub limit: u32,
}

impl ListingConfig {
    pub fn new(limit: Option<u32>) -> Self {
        Self {
            limit: normalize_listing_limit(limit),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// File logging settings passed to `init_logging`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    /// Uses the build-mode default level.
    pub fn default_for(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: log_dir.into(),
        }
    }
}

/// Settings assembled by the embedding application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    pub listing: ListingConfig,
    pub logging: Option<LoggingConfig>,
}

/// Normalizes a requested page size: default 10, capped at 50.
pub fn normalize_listing_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => LISTING_DEFAULT_LIMIT,
        Some(value) if value > LISTING_LIMIT_MAX => LISTING_LIMIT_MAX,
        Some(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_listing_limit, ListingConfig, LoggingConfig};

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_listing_limit(None), 10);
        assert_eq!(normalize_listing_limit(Some(0)), 10);
        assert_eq!(normalize_listing_limit(Some(25)), 25);
        assert_eq!(normalize_listing_limit(Some(500)), 50);
        assert_eq!(ListingConfig::default().limit, 10);
    }

    #[test]
    fn logging_config_uses_build_default_level() {
        let config = LoggingConfig::default_for("/tmp/folio-logs");
        assert!(config.level == "debug" || config.level == "info");
    }
}
