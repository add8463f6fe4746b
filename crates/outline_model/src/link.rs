//! Page links - clickable regions on a page that jump somewhere
//!
//! Links sit beside the outline and share its command contract, but they are
//! flat: one ordered list per document, no nesting.

use crate::{Destination, EntityKind, LinkId, OutlineError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Target of a page link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// Jump to a page inside the document
    Page(Destination),
    /// Open an external URI
    Uri(String),
}

impl LinkTarget {
    pub fn page(page_number: u32) -> Self {
        LinkTarget::Page(Destination::page(page_number))
    }

    pub fn uri(uri: impl Into<String>) -> Self {
        LinkTarget::Uri(uri.into())
    }

    /// Check if this link points inside the document
    pub fn is_internal(&self) -> bool {
        matches!(self, LinkTarget::Page(_))
    }

    /// Validate the target against the document's page count
    pub fn validate(&self, page_count: u32) -> Result<()> {
        match self {
            LinkTarget::Page(destination) => destination.validate(page_count),
            LinkTarget::Uri(uri) => {
                if uri.trim().is_empty() {
                    return Err(OutlineError::InvalidTarget("URI cannot be empty".into()));
                }
                let lower = uri.trim_start().to_lowercase();
                if ["javascript:", "data:", "vbscript:"]
                    .iter()
                    .any(|scheme| lower.starts_with(scheme))
                {
                    return Err(OutlineError::InvalidTarget(format!(
                        "unsafe protocol in {uri}"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Clickable area on a page, in points from the page's top-left corner
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LinkRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A link annotation on one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub id: LinkId,
    /// 1-based page the link sits on
    pub page_number: u32,
    pub rect: LinkRect,
    pub target: LinkTarget,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// Parameters for creating a link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLink {
    pub page_number: u32,
    pub rect: LinkRect,
    pub target: LinkTarget,
}

impl NewLink {
    pub fn new(page_number: u32, rect: LinkRect, target: LinkTarget) -> Self {
        Self {
            page_number,
            rect,
            target,
        }
    }
}

/// A partial link update. Only `Some` fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkUpdate {
    pub page_number: Option<u32>,
    pub rect: Option<LinkRect>,
    pub target: Option<LinkTarget>,
}

impl LinkUpdate {
    /// An update that resets every editable field to the values in `link`
    pub fn from_link(link: &PageLink) -> Self {
        Self {
            page_number: Some(link.page_number),
            rect: Some(link.rect),
            target: Some(link.target.clone()),
        }
    }
}

/// Owns the page links of one open document
#[derive(Debug, Clone, Default)]
pub struct LinkService {
    links: Vec<PageLink>,
    page_count: u32,
}

impl LinkService {
    pub fn new(page_count: u32) -> Self {
        Self {
            links: Vec::new(),
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Update the page bound. Existing links are not re-validated.
    pub fn set_page_count(&mut self, page_count: u32) {
        self.page_count = page_count;
    }

    fn check_page(&self, page_number: u32) -> Result<()> {
        Destination::page(page_number).validate(self.page_count)
    }

    fn position(&self, id: LinkId) -> Result<usize> {
        self.links
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| OutlineError::not_found(EntityKind::Link, id))
    }

    /// Get a link by id
    pub fn get_link(&self, id: LinkId) -> Option<PageLink> {
        self.links.iter().find(|l| l.id == id).cloned()
    }

    /// Every link in insertion order
    pub fn links(&self) -> Vec<PageLink> {
        self.links.clone()
    }

    /// Links placed on `page_number`
    pub fn links_for_page(&self, page_number: u32) -> Vec<PageLink> {
        self.links
            .iter()
            .filter(|l| l.page_number == page_number)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.links.len()
    }

    /// Create a link
    pub fn create_link(&mut self, params: NewLink) -> Result<PageLink> {
        self.check_page(params.page_number)?;
        params.target.validate(self.page_count)?;

        let now = Utc::now();
        let link = PageLink {
            id: LinkId::new(),
            page_number: params.page_number,
            rect: params.rect,
            target: params.target,
            created_at: now,
            modified_at: now,
        };
        self.links.push(link.clone());

        tracing::debug!(
            target: "outline::links",
            id = %link.id,
            page = link.page_number,
            "link created"
        );
        Ok(link)
    }

    /// Merge the supplied fields into a link
    pub fn update_link(&mut self, id: LinkId, update: LinkUpdate) -> Result<PageLink> {
        let index = self.position(id)?;
        if let Some(page_number) = update.page_number {
            self.check_page(page_number)?;
        }
        if let Some(target) = &update.target {
            target.validate(self.page_count)?;
        }

        let link = &mut self.links[index];
        if let Some(page_number) = update.page_number {
            link.page_number = page_number;
        }
        if let Some(rect) = update.rect {
            link.rect = rect;
        }
        if let Some(target) = update.target {
            link.target = target;
        }
        link.modified_at = Utc::now();

        tracing::debug!(target: "outline::links", %id, "link updated");
        Ok(link.clone())
    }

    /// Delete a link. Returns its former position and the removed link.
    pub fn delete_link(&mut self, id: LinkId) -> Result<(usize, PageLink)> {
        let index = self.position(id)?;
        let link = self.links.remove(index);
        tracing::debug!(target: "outline::links", %id, "link deleted");
        Ok((index, link))
    }

    /// Put a deleted link back at `index` (clamped to the list length)
    pub fn restore_link(&mut self, index: usize, link: PageLink) -> Result<()> {
        if self.links.iter().any(|l| l.id == link.id) {
            return Err(OutlineError::InvariantViolation(format!(
                "link {} already exists",
                link.id
            )));
        }
        let index = index.min(self.links.len());
        tracing::debug!(target: "outline::links", id = %link.id, index, "link restored");
        self.links.insert(index, link);
        Ok(())
    }

    /// Replace every link with externally supplied records
    pub fn import_links(&mut self, links: Vec<PageLink>) -> Result<()> {
        let mut seen = std::collections::HashSet::with_capacity(links.len());
        if let Some(dup) = links.iter().find(|l| !seen.insert(l.id)) {
            return Err(OutlineError::InvariantViolation(format!(
                "duplicate link id {} in import",
                dup.id
            )));
        }
        tracing::debug!(target: "outline::links", count = links.len(), "links imported");
        self.links = links;
        Ok(())
    }

    /// Flat snapshot for external serialization
    pub fn export_links(&self) -> Vec<PageLink> {
        self.links.clone()
    }
}
