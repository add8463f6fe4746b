//! Outline Model - document outline (bookmark tree) and page links
//!
//! Bookmarks live in a flat id-keyed table with explicit parent/children id
//! lists, owned by a [`BookmarkService`] that keeps the tree consistent after
//! every operation. Page links are a flat sibling list owned by a
//! [`LinkService`]. Both are scoped to one open document through
//! [`OutlineDocument`].

mod id;
mod error;
mod bookmark;
mod tree;
mod service;
mod link;
mod document;
mod settings;

pub use id::*;
pub use error::*;
pub use bookmark::*;
pub use tree::*;
pub use service::*;
pub use link::*;
pub use document::*;
pub use settings::*;
