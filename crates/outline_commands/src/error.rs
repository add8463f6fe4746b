//! Error types for navigation commands

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Outline error: {0}")]
    Outline(#[from] outline_model::OutlineError),

    #[error("Command already executed: {0}")]
    AlreadyExecuted(String),

    #[error("Command has not been executed: {0}")]
    NotExecuted(String),

    #[error("Undo stack is empty")]
    UndoStackEmpty,

    #[error("Redo stack is empty")]
    RedoStackEmpty,
}

pub type Result<T> = std::result::Result<T, CommandError>;
