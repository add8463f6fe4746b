//! Error types for outline model operations

use thiserror::Error;

/// Which kind of entity a failed lookup referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Bookmark,
    Parent,
    Sibling,
    Link,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Bookmark => write!(f, "Bookmark"),
            EntityKind::Parent => write!(f, "Parent bookmark"),
            EntityKind::Sibling => write!(f, "Sibling bookmark"),
            EntityKind::Link => write!(f, "Link"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlineError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Invalid destination: page {page} is outside 1..={page_count}")]
    InvalidDestination { page: u32, page_count: u32 },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid link target: {0}")]
    InvalidTarget(String),
}

impl OutlineError {
    /// Lookup failure for an entity of the given kind
    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        OutlineError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Check whether this is a lookup failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, OutlineError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, OutlineError>;
