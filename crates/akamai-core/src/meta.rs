//! Per-operation metadata
//!
//! Every orchestrator call (configure, create, read, update, delete) runs
//! with an [`OperationMeta`]. It carries a random operation id so all log
//! lines produced by one call, across sub-providers and API requests, can
//! be correlated.
//!
//! The meta object is for correlation only. It carries no deadline and no
//! cancellation.

use tracing::Span;

/// Metadata for one orchestrator operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMeta {
    operation_id: String,
}

impl OperationMeta {
    /// Create metadata with a fresh random operation id
    pub fn new() -> Self {
        Self {
            operation_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Create metadata with a caller-chosen operation id
    pub fn with_id(operation_id: impl Into<String>) -> Self {
        Self {
            operation_id: operation_id.into(),
        }
    }

    /// The operation id
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Tracing span for work done on behalf of `resource` in this operation
    pub fn span(&self, resource: &str) -> Span {
        tracing::info_span!(
            "operation",
            operation_id = %self.operation_id,
            resource = %resource,
        )
    }
}

impl Default for OperationMeta {
    fn default() -> Self {
        Self::new()
    }
}
