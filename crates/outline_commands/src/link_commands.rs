//! Link commands for creating, editing, and removing page links

use crate::command::missing_capture;
use crate::{CommandOutput, Result};
use outline_model::{EntityKind, LinkId, LinkService, LinkUpdate, NewLink, OutlineError, PageLink};
use serde::{Deserialize, Serialize};

/// Create a page link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateLink {
    pub params: NewLink,
    created_id: Option<LinkId>,
    /// Position and link removed by undo, re-inserted verbatim on redo
    #[serde(default)]
    removed: Option<(usize, PageLink)>,
}

impl CreateLink {
    pub fn new(params: NewLink) -> Self {
        Self {
            params,
            created_id: None,
            removed: None,
        }
    }

    pub fn created_id(&self) -> Option<LinkId> {
        self.created_id
    }

    pub(crate) fn execute(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        if let Some((index, link)) = &self.removed {
            service.restore_link(*index, link.clone())?;
            let link = link.clone();
            self.removed = None;
            return Ok(CommandOutput::Link(link));
        }
        let link = service.create_link(self.params.clone())?;
        self.created_id = Some(link.id);
        Ok(CommandOutput::Link(link))
    }

    pub(crate) fn undo(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        let id = self.created_id.ok_or_else(|| missing_capture("Create Link"))?;
        let (index, link) = service.delete_link(id)?;
        self.removed = Some((index, link.clone()));
        Ok(CommandOutput::Link(link))
    }
}

/// Edit a page link's page, area or target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateLink {
    pub id: LinkId,
    pub update: LinkUpdate,
    previous: Option<PageLink>,
}

impl UpdateLink {
    pub fn new(id: LinkId, update: LinkUpdate) -> Self {
        Self {
            id,
            update,
            previous: None,
        }
    }

    pub(crate) fn execute(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        let previous = service
            .get_link(self.id)
            .ok_or_else(|| OutlineError::not_found(EntityKind::Link, self.id))?;
        let link = service.update_link(self.id, self.update.clone())?;
        self.previous = Some(previous);
        Ok(CommandOutput::Link(link))
    }

    pub(crate) fn undo(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        let previous = self
            .previous
            .as_ref()
            .ok_or_else(|| missing_capture("Edit Link"))?;
        let link = service.update_link(self.id, LinkUpdate::from_link(previous))?;
        Ok(CommandOutput::Link(link))
    }
}

/// Delete a page link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteLink {
    pub id: LinkId,
    removed: Option<(usize, PageLink)>,
}

impl DeleteLink {
    pub fn new(id: LinkId) -> Self {
        Self { id, removed: None }
    }

    pub(crate) fn execute(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        let (index, link) = service.delete_link(self.id)?;
        self.removed = Some((index, link.clone()));
        Ok(CommandOutput::Link(link))
    }

    pub(crate) fn undo(&mut self, service: &mut LinkService) -> Result<CommandOutput> {
        let (index, link) = self
            .removed
            .clone()
            .ok_or_else(|| missing_capture("Delete Link"))?;
        service.restore_link(index, link.clone())?;
        Ok(CommandOutput::Link(link))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CommandFactory;
    use outline_model::{LinkRect, LinkTarget, OutlineDocument};

    fn strip(links: Vec<PageLink>) -> Vec<PageLink> {
        links
            .into_iter()
            .map(|mut link| {
                link.modified_at = link.created_at;
                link
            })
            .collect()
    }

    fn setup() -> (OutlineDocument, LinkId) {
        let mut doc = OutlineDocument::new(5);
        let id = doc
            .links
            .create_link(NewLink::new(1, LinkRect::new(0.0, 0.0, 50.0, 10.0), LinkTarget::page(3)))
            .unwrap()
            .id;
        (doc, id)
    }

    #[test]
    fn test_create_link_undo_redo() {
        let (mut doc, _) = setup();
        let mut cmd = CommandFactory::new().create_link(NewLink::new(
            2,
            LinkRect::default(),
            LinkTarget::uri("https://example.com"),
        ));

        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.links.count(), 2);
        let created = doc.links.links()[1].clone();

        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.links.count(), 1);

        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.links.get_link(created.id), Some(created));
    }

    #[test]
    fn test_update_link_undo() {
        let (mut doc, id) = setup();
        let before = strip(doc.links.export_links());
        let mut cmd = CommandFactory::new().update_link(
            id,
            LinkUpdate {
                page_number: Some(4),
                target: Some(LinkTarget::uri("https://example.org")),
                ..LinkUpdate::default()
            },
        );

        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.links.get_link(id).unwrap().page_number, 4);
        cmd.undo(&mut doc).unwrap();
        assert_eq!(strip(doc.links.export_links()), before);
    }

    #[test]
    fn test_delete_link_undo() {
        let (mut doc, id) = setup();
        let before = doc.links.export_links();
        let mut cmd = CommandFactory::new().delete_link(id);

        cmd.execute(&mut doc).unwrap();
        assert_eq!(doc.links.count(), 0);
        cmd.undo(&mut doc).unwrap();
        assert_eq!(doc.links.export_links(), before);
    }

    #[test]
    fn test_invalid_link_edit_fails_cleanly() {
        let (mut doc, id) = setup();
        let mut cmd = CommandFactory::new().update_link(
            id,
            LinkUpdate {
                page_number: Some(99),
                ..LinkUpdate::default()
            },
        );
        assert!(cmd.execute(&mut doc).is_err());
        assert_eq!(doc.links.get_link(id).unwrap().page_number, 1);
    }
}
