//! Plugin Log Statements
//!
//! A log statement is one record emitted by a plugin. The three variants
//! share their core fields (plugin id, level, message, timestamp) and differ
//! only in the scope id they carry, so they are modeled as a tagged sum type
//! keyed by logging context rather than separate record types.

use crate::context::LogContext;
use serde::{Deserialize, Serialize};

/// Severity of a log statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// One plugin log record, tagged by the context it was emitted under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "context", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogStatement {
    Generic {
        plugin_id: String,
        level: LogLevel,
        message: String,
        logged_at_ms: i64,
    },
    Workspace {
        plugin_id: String,
        workspace_id: String,
        level: LogLevel,
        message: String,
        logged_at_ms: i64,
    },
    Learnspace {
        plugin_id: String,
        learnspace_id: String,
        level: LogLevel,
        message: String,
        logged_at_ms: i64,
    },
}

impl LogStatement {
    /// The logging context this statement was emitted under, which decides
    /// the tables it is routed to.
    pub fn context(&self) -> LogContext {
        match self {
            LogStatement::Generic { .. } => LogContext::Generic,
            LogStatement::Workspace { .. } => LogContext::Workspace,
            LogStatement::Learnspace { .. } => LogContext::Learnspace,
        }
    }

    pub fn plugin_id(&self) -> &str {
        match self {
            LogStatement::Generic { plugin_id, .. }
            | LogStatement::Workspace { plugin_id, .. }
            | LogStatement::Learnspace { plugin_id, .. } => plugin_id,
        }
    }

    pub fn level(&self) -> LogLevel {
        match self {
            LogStatement::Generic { level, .. }
            | LogStatement::Workspace { level, .. }
            | LogStatement::Learnspace { level, .. } => *level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_context_matches_variant() {
        let statement = LogStatement::Workspace {
            plugin_id: "plugin-1".to_string(),
            workspace_id: "ws-9".to_string(),
            level: LogLevel::Info,
            message: "asset compiled".to_string(),
            logged_at_ms: 1_700_000_000_000,
        };

        assert_eq!(statement.context(), LogContext::Workspace);
        assert_eq!(statement.plugin_id(), "plugin-1");
        assert_eq!(statement.level(), LogLevel::Info);
    }

    #[test]
    fn serde_tags_by_context() {
        let statement = LogStatement::Generic {
            plugin_id: "plugin-2".to_string(),
            level: LogLevel::Error,
            message: "sandbox timeout".to_string(),
            logged_at_ms: 1_700_000_000_001,
        };

        let json = serde_json::to_string(&statement).unwrap();
        assert!(json.contains("\"context\":\"GENERIC\""));

        let restored: LogStatement = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, statement);
    }
}
