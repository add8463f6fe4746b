//! Outline Commands - undoable navigation commands and history
//!
//! Every user-visible change to a document's outline or page links is wrapped
//! in a [`NavigationCommand`] built by the [`CommandFactory`]. Commands pair a
//! forward change with its exact inverse; the [`OutlineEditor`] records them
//! in an [`UndoManager`].

mod command;
mod error;
mod bookmark_commands;
mod link_commands;
mod factory;
mod undo;
mod executor;

pub use command::*;
pub use error::*;
pub use bookmark_commands::*;
pub use link_commands::*;
pub use factory::*;
pub use undo::*;
pub use executor::*;
