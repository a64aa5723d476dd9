//! Service and store error types.

use std::fmt;

use thiserror::Error;

/// The remote operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
    List,
    ListByAuthor,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
            Operation::ListByAuthor => "list_by_author",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store-level errors reported by `PostStore` implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store connection failed: {0}")]
    Connection(String),

    #[error("Store operation failed: {0}")]
    Query(String),

    #[error("Document decode failed: {0}")]
    Decode(String),

    #[error("Write conflict: {0}")]
    Conflict(String),
}

/// Failures returned to callers of `PostService`.
///
/// `NotFound` and `Persistence` are both persistence-class failures; the
/// split only lets the transport pick a more precise status.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{operation}: post {id} not found")]
    NotFound { operation: Operation, id: String },

    #[error("{operation} failed{}: {source}", for_subject(.subject))]
    Persistence {
        operation: Operation,
        subject: Option<String>,
        #[source]
        source: StoreError,
    },

    #[error("{operation} cancelled")]
    Cancelled { operation: Operation },
}

fn for_subject(subject: &Option<String>) -> String {
    subject
        .as_deref()
        .map(|s| format!(" for {s}"))
        .unwrap_or_default()
}

impl ServiceError {
    pub fn persistence(
        operation: Operation,
        subject: Option<&str>,
        source: StoreError,
    ) -> Self {
        ServiceError::Persistence {
            operation,
            subject: subject.map(str::to_owned),
            source,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ServiceError::NotFound { operation, .. }
            | ServiceError::Persistence { operation, .. }
            | ServiceError::Cancelled { operation } => *operation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            ServiceError::NotFound { .. } | ServiceError::Persistence { .. }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ServiceError::Cancelled { .. })
    }
}
