//! Bucket Configuration
//!
//! One [`BucketConfig`] per log table controls how that table's pool is
//! shaped: how many buckets rotate in parallel, how many records each
//! bucket absorbs before rotation, and the retention class stamped onto
//! every bucket minted for it.
//!
//! The configured set is supplied at startup and is static for the process
//! lifetime. Changing `pool_size` or `max_record_count` requires
//! `BucketAllocator::clear_cache()` so the next write re-bootstraps the
//! pools under the new shape.
//!
//! ## Usage
//!
//! ```ignore
//! use lectern_allocator::BucketConfig;
//!
//! // The stock three-table setup.
//! let configs = BucketConfig::default_set();
//!
//! // Or a hand-rolled stream with tighter buckets.
//! let config = BucketConfig {
//!     table: lectern_core::GENERIC_LOG_TABLE.to_string(),
//!     max_record_count: 10_000,
//!     pool_size: 4,
//!     retention: lectern_core::RetentionPolicy::Week,
//! };
//! ```

use lectern_core::{
    LogContext, RetentionPolicy, GENERIC_LOG_TABLE, LEARNSPACE_LOG_TABLE, WORKSPACE_LOG_TABLE,
};
use serde::{Deserialize, Serialize};

/// Static configuration for one logical log stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Target log table.
    pub table: String,

    /// Capacity of each bucket instance before it is rotated out.
    #[serde(default = "default_max_record_count")]
    pub max_record_count: u32,

    /// Number of parallel bucket instances kept per table.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Retention class stamped onto every bucket minted for this table.
    #[serde(default = "default_retention")]
    pub retention: RetentionPolicy,
}

impl BucketConfig {
    /// The context classification of this config's table, if the table is
    /// one of the well-known log tables.
    pub fn context(&self) -> Option<LogContext> {
        LogContext::for_table(&self.table)
    }

    /// Whether a write under `context` lands in this config's table. The
    /// generic stream applies to every context; workspace and learnspace
    /// streams apply only to their own.
    pub fn applies_to(&self, context: LogContext) -> bool {
        match self.context() {
            Some(LogContext::Generic) => true,
            Some(own) => own == context,
            None => false,
        }
    }

    /// The stock configuration: one stream per well-known log table.
    pub fn default_set() -> Vec<BucketConfig> {
        vec![
            BucketConfig {
                table: GENERIC_LOG_TABLE.to_string(),
                max_record_count: default_max_record_count(),
                pool_size: default_pool_size(),
                retention: RetentionPolicy::Week,
            },
            BucketConfig {
                table: WORKSPACE_LOG_TABLE.to_string(),
                max_record_count: default_max_record_count(),
                pool_size: default_pool_size(),
                retention: RetentionPolicy::Fortnight,
            },
            BucketConfig {
                table: LEARNSPACE_LOG_TABLE.to_string(),
                max_record_count: default_max_record_count(),
                pool_size: default_pool_size(),
                retention: RetentionPolicy::Month,
            },
        ]
    }
}

fn default_max_record_count() -> u32 {
    100_000
}

fn default_pool_size() -> u32 {
    8
}

fn default_retention() -> RetentionPolicy {
    RetentionPolicy::Week
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_stream_applies_to_every_context() {
        let config = BucketConfig {
            table: GENERIC_LOG_TABLE.to_string(),
            max_record_count: 10,
            pool_size: 2,
            retention: RetentionPolicy::Week,
        };

        assert!(config.applies_to(LogContext::Generic));
        assert!(config.applies_to(LogContext::Workspace));
        assert!(config.applies_to(LogContext::Learnspace));
    }

    #[test]
    fn scoped_streams_apply_only_to_their_context() {
        let config = BucketConfig {
            table: WORKSPACE_LOG_TABLE.to_string(),
            max_record_count: 10,
            pool_size: 2,
            retention: RetentionPolicy::Fortnight,
        };

        assert!(config.applies_to(LogContext::Workspace));
        assert!(!config.applies_to(LogContext::Generic));
        assert!(!config.applies_to(LogContext::Learnspace));
    }

    #[test]
    fn unrecognized_table_applies_nowhere() {
        let config = BucketConfig {
            table: "not_a_real_table".to_string(),
            max_record_count: 10,
            pool_size: 2,
            retention: RetentionPolicy::Week,
        };

        assert!(!config.applies_to(LogContext::Generic));
        assert!(!config.applies_to(LogContext::Workspace));
    }

    #[test]
    fn default_set_covers_all_well_known_tables() {
        let configs = BucketConfig::default_set();
        let tables: Vec<&str> = configs.iter().map(|c| c.table.as_str()).collect();

        assert_eq!(
            tables,
            vec![GENERIC_LOG_TABLE, WORKSPACE_LOG_TABLE, LEARNSPACE_LOG_TABLE]
        );
    }

    #[test]
    fn serde_fills_defaults() {
        let config: BucketConfig =
            serde_json::from_str(r#"{"table":"generic_log_statement_by_plugin"}"#).unwrap();

        assert_eq!(config.max_record_count, 100_000);
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.retention, RetentionPolicy::Week);
    }
}
