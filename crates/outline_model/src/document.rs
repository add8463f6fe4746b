//! Per-document navigation state
//!
//! One `OutlineDocument` exists per open document: created when the document
//! is opened, dropped when it is closed.

use crate::{BookmarkService, LinkService, OutlineSettings};

/// The outline and page links of one open document
#[derive(Debug, Clone)]
pub struct OutlineDocument {
    pub bookmarks: BookmarkService,
    pub links: LinkService,
    settings: OutlineSettings,
}

impl OutlineDocument {
    /// Create empty navigation state for a document with `page_count` pages
    pub fn new(page_count: u32) -> Self {
        Self::with_settings(page_count, OutlineSettings::default())
    }

    pub fn with_settings(page_count: u32, settings: OutlineSettings) -> Self {
        Self {
            bookmarks: BookmarkService::with_settings(page_count, &settings),
            links: LinkService::new(page_count),
            settings,
        }
    }

    pub fn settings(&self) -> &OutlineSettings {
        &self.settings
    }

    pub fn page_count(&self) -> u32 {
        self.bookmarks.page_count()
    }

    /// Propagate a new page count from the host document to both services
    pub fn set_page_count(&mut self, page_count: u32) {
        self.bookmarks.set_page_count(page_count);
        self.links.set_page_count(page_count);
    }
}
