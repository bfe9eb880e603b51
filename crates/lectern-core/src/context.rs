//! Logging Contexts
//!
//! Every plugin log write arrives tagged with a context that determines which
//! log tables it lands in:
//!
//! - **Generic**: the plugin-wide log stream, applicable to every write.
//! - **Workspace**: logs scoped to an authoring workspace.
//! - **Learnspace**: logs scoped to a published learnspace.
//!
//! A workspace-scoped write goes to both the workspace table and the generic
//! table; a generic write goes only to the generic table. The context also
//! selects which round-robin cursor the allocator advances.

use serde::{Deserialize, Serialize};

/// Table backing the plugin-wide log stream. Applies to every context.
pub const GENERIC_LOG_TABLE: &str = "generic_log_statement_by_plugin";

/// Table backing workspace-scoped plugin logs.
pub const WORKSPACE_LOG_TABLE: &str = "workspace_log_statement_by_plugin";

/// Table backing learnspace-scoped plugin logs.
pub const LEARNSPACE_LOG_TABLE: &str = "learnspace_log_statement_by_plugin";

/// The scope a log write is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogContext {
    Generic,
    Workspace,
    Learnspace,
}

impl LogContext {
    /// Classify a log table by its well-known name.
    ///
    /// Returns `None` for tables this subsystem does not manage; callers
    /// that need a hard failure wrap the miss in their own error type.
    pub fn for_table(table: &str) -> Option<LogContext> {
        match table {
            GENERIC_LOG_TABLE => Some(LogContext::Generic),
            WORKSPACE_LOG_TABLE => Some(LogContext::Workspace),
            LEARNSPACE_LOG_TABLE => Some(LogContext::Learnspace),
            _ => None,
        }
    }

    /// The table this context writes to in addition to the generic table.
    pub fn table(&self) -> &'static str {
        match self {
            LogContext::Generic => GENERIC_LOG_TABLE,
            LogContext::Workspace => WORKSPACE_LOG_TABLE,
            LogContext::Learnspace => LEARNSPACE_LOG_TABLE,
        }
    }
}
