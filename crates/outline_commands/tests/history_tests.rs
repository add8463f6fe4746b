//! Integration tests for the outline editor
//!
//! Random command sequences run through the editor must keep the outline
//! structurally sound, and undoing all of them must restore the outline the
//! sequence started from.

use outline_commands::{CommandError, NavigationCommand, OutlineEditor};
use outline_model::{
    BookmarkId, BookmarkNode, BookmarkUpdate, LinkRect, LinkTarget, NewBookmark, NewLink,
    OutlineError, PageLink,
};
use proptest::prelude::*;

const PAGES: u32 = 12;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Export with `modified_at` folded into `created_at`; moves and edits touch it
fn snapshot(editor: &OutlineEditor) -> (Vec<BookmarkNode>, Vec<PageLink>) {
    let bookmarks = editor
        .document()
        .bookmarks
        .export_bookmarks()
        .into_iter()
        .map(|mut node| {
            node.modified_at = node.created_at;
            node
        })
        .collect();
    let links = editor
        .document()
        .links
        .export_links()
        .into_iter()
        .map(|mut link| {
            link.modified_at = link.created_at;
            link
        })
        .collect();
    (bookmarks, links)
}

fn assert_sound(editor: &OutlineEditor) {
    let tree = editor.document().bookmarks.tree();
    if let Err(err) = tree.validate() {
        panic!("outline became malformed: {err}");
    }
}

/// A small outline to start from: Intro, Part 1 (Ch 1, Ch 2 (Sec 2.1)), Appendix
fn seeded_editor() -> OutlineEditor {
    let mut editor = OutlineEditor::new(PAGES);
    let bookmarks = &mut editor.document_mut().bookmarks;
    let _intro = bookmarks.create(NewBookmark::new("Intro").to_page(1)).unwrap();
    let part = bookmarks.create(NewBookmark::new("Part 1").to_page(2)).unwrap().id;
    bookmarks
        .create(NewBookmark::new("Ch 1").under(part).to_page(3))
        .unwrap();
    let ch2 = bookmarks
        .create(NewBookmark::new("Ch 2").under(part).to_page(5))
        .unwrap()
        .id;
    bookmarks
        .create(NewBookmark::new("Sec 2.1").under(ch2).to_page(6))
        .unwrap();
    bookmarks
        .create(NewBookmark::new("Appendix").to_page(11))
        .unwrap();
    editor
        .document_mut()
        .links
        .create_link(NewLink::new(1, LinkRect::new(72.0, 90.0, 120.0, 12.0), LinkTarget::page(5)))
        .unwrap();
    editor
}

/// Abstract operation; indexes pick existing entries modulo their count
#[derive(Debug, Clone)]
enum Op {
    Create { parent: Option<usize>, after: Option<usize>, page: u32 },
    Rename { target: usize, title: String },
    Delete { target: usize },
    Move { target: usize, parent: Option<usize>, after: Option<usize> },
    Up { target: usize },
    Down { target: usize },
    Indent { target: usize },
    Outdent { target: usize },
    Toggle { target: usize },
    DeleteAll,
    CreateLink { page: u32 },
    DeleteLink { target: usize },
    /// Aim at a deleted id when one exists, else at an id that never existed
    Stale { target: usize, action: u8 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let index = 0usize..16;
    prop_oneof![
        4 => (
            proptest::option::of(index.clone()),
            proptest::option::of(index.clone()),
            0u32..=PAGES + 2,
        )
            .prop_map(|(parent, after, page)| Op::Create { parent, after, page }),
        2 => (index.clone(), "[a-z]{1,8}")
            .prop_map(|(target, title)| Op::Rename { target, title }),
        2 => index.clone().prop_map(|target| Op::Delete { target }),
        3 => (
            index.clone(),
            proptest::option::of(index.clone()),
            proptest::option::of(index.clone()),
        )
            .prop_map(|(target, parent, after)| Op::Move { target, parent, after }),
        2 => index.clone().prop_map(|target| Op::Up { target }),
        2 => index.clone().prop_map(|target| Op::Down { target }),
        2 => index.clone().prop_map(|target| Op::Indent { target }),
        2 => index.clone().prop_map(|target| Op::Outdent { target }),
        1 => index.clone().prop_map(|target| Op::Toggle { target }),
        1 => Just(Op::DeleteAll),
        1 => (1u32..=PAGES).prop_map(|page| Op::CreateLink { page }),
        1 => index.clone().prop_map(|target| Op::DeleteLink { target }),
        3 => (index, any::<u8>()).prop_map(|(target, action)| Op::Stale { target, action }),
    ]
}

/// Add the editor's live bookmark ids to `seen`
fn remember(editor: &OutlineEditor, seen: &mut Vec<BookmarkId>) {
    for node in editor.document().bookmarks.bookmarks() {
        if !seen.contains(&node.id) {
            seen.push(node.id);
        }
    }
}

fn pick(ids: &[BookmarkId], index: usize) -> Option<BookmarkId> {
    (!ids.is_empty()).then(|| ids[index % ids.len()])
}

/// Turn an abstract op into a command against the editor's current state.
///
/// `seen` holds every bookmark id observed so far, live or since deleted.
fn build(editor: &OutlineEditor, op: &Op, seen: &[BookmarkId]) -> Option<NavigationCommand> {
    let commands = editor.commands();
    let ids: Vec<BookmarkId> = editor
        .document()
        .bookmarks
        .bookmarks()
        .iter()
        .map(|n| n.id)
        .collect();
    let choose = |index: &Option<usize>| index.and_then(|i| pick(&ids, i));

    let command = match op {
        Op::Create { parent, after, page } => {
            let mut params = NewBookmark::new("new");
            if let Some(parent_id) = choose(parent) {
                params = params.under(parent_id);
            }
            if let Some(sibling_id) = choose(after) {
                params = params.after(sibling_id);
            }
            if *page > 0 {
                params = params.to_page(*page);
            }
            commands.create_bookmark(params)
        }
        Op::Rename { target, title } => {
            commands.rename_bookmark(pick(&ids, *target)?, title.clone())
        }
        Op::Delete { target } => commands.delete_bookmark(pick(&ids, *target)?),
        Op::Move { target, parent, after } => {
            commands.move_bookmark(pick(&ids, *target)?, choose(parent), choose(after))
        }
        Op::Up { target } => commands.move_up(pick(&ids, *target)?),
        Op::Down { target } => commands.move_down(pick(&ids, *target)?),
        Op::Indent { target } => commands.indent(pick(&ids, *target)?),
        Op::Outdent { target } => commands.outdent(pick(&ids, *target)?),
        Op::Toggle { target } => commands.toggle_expanded(pick(&ids, *target)?),
        Op::DeleteAll => commands.delete_all_bookmarks(),
        Op::CreateLink { page } => commands.create_link(NewLink::new(
            *page,
            LinkRect::default(),
            LinkTarget::uri("https://example.com"),
        )),
        Op::DeleteLink { target } => {
            let links = editor.document().links.links();
            if links.is_empty() {
                return None;
            }
            commands.delete_link(links[target % links.len()].id)
        }
        Op::Stale { target, action } => {
            let gone: Vec<BookmarkId> = seen
                .iter()
                .copied()
                .filter(|id| !ids.contains(id))
                .collect();
            let stale = pick(&gone, *target).unwrap_or_else(BookmarkId::new);
            match action % 7 {
                0 => commands.delete_bookmark(stale),
                1 => commands.rename_bookmark(stale, "ghost"),
                2 => commands.move_bookmark(stale, None, None),
                3 => match pick(&ids, *target) {
                    Some(live) => commands.move_bookmark(live, Some(stale), None),
                    None => commands.indent(stale),
                },
                4 => commands.toggle_expanded(stale),
                5 => commands.outdent(stale),
                _ => commands.create_bookmark(NewBookmark::new("orphan").under(stale)),
            }
        }
    };
    Some(command)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_commands_keep_outline_sound(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut editor = seeded_editor();
        let mut seen = Vec::new();
        for op in &ops {
            remember(&editor, &mut seen);
            let before = snapshot(&editor);
            let undo_len = editor.history().undo_len();
            let Some(command) = build(&editor, op, &seen) else { continue };
            if editor.execute(command).is_err() {
                // A rejected command leaves no trace
                prop_assert_eq!(snapshot(&editor), before);
                prop_assert_eq!(editor.history().undo_len(), undo_len);
            }
            assert_sound(&editor);
        }
    }

    #[test]
    fn prop_undo_all_restores_start(ops in proptest::collection::vec(op_strategy(), 1..40)) {
        let mut editor = seeded_editor();
        let start = snapshot(&editor);
        let mut seen = Vec::new();

        for op in &ops {
            remember(&editor, &mut seen);
            if let Some(command) = build(&editor, op, &seen) {
                let _ = editor.execute(command);
            }
        }
        let end = snapshot(&editor);

        while editor.can_undo() {
            editor.undo().unwrap();
            assert_sound(&editor);
        }
        prop_assert_eq!(snapshot(&editor), start);

        while editor.can_redo() {
            editor.redo().unwrap();
            assert_sound(&editor);
        }
        prop_assert_eq!(snapshot(&editor), end);
    }
}

#[test]
fn test_reorganise_chapter_and_undo() {
    init_tracing();
    let mut editor = seeded_editor();
    let start = snapshot(&editor);
    let bookmarks = &editor.document().bookmarks;
    let appendix = bookmarks.find_by_title("appendix")[0].id;
    let part = bookmarks.find_by_title("Part 1")[0].id;

    let cmd = editor.commands().move_bookmark(appendix, Some(part), None);
    editor.execute(cmd).unwrap();
    let cmd = editor.commands().move_up(appendix);
    editor.execute(cmd).unwrap();
    let cmd = editor.commands().rename_bookmark(appendix, "Ch 1.5");
    editor.execute(cmd).unwrap();

    let children: Vec<String> = editor
        .document()
        .bookmarks
        .children(part)
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(children, vec!["Ch 1", "Ch 1.5", "Ch 2"]);
    assert_eq!(editor.undo_label(), Some("Rename Bookmark"));

    editor.undo().unwrap();
    assert_eq!(editor.undo_label(), Some("Move Bookmark Up"));
    editor.undo().unwrap();
    editor.undo().unwrap();
    assert_eq!(snapshot(&editor), start);
    assert!(!editor.can_undo());
    assert_eq!(editor.redo_label(), Some("Move Bookmark"));
}

#[test]
fn test_delete_subtree_undo_restores_children() {
    init_tracing();
    let mut editor = seeded_editor();
    let start = snapshot(&editor);
    let part = editor.document().bookmarks.find_by_title("Part 1")[0].id;

    let cmd = editor.commands().delete_bookmark(part);
    editor.execute(cmd).unwrap();
    assert_eq!(editor.document().bookmarks.count(), 2);

    editor.undo().unwrap();
    assert_eq!(snapshot(&editor), start);
    assert_eq!(editor.document().bookmarks.descendants(part).len(), 3);
}

#[test]
fn test_cycle_is_rejected_and_not_recorded() {
    init_tracing();
    let mut editor = seeded_editor();
    let start = snapshot(&editor);
    let part = editor.document().bookmarks.find_by_title("Part 1")[0].id;
    let section = editor.document().bookmarks.find_by_title("Sec 2.1")[0].id;

    let cmd = editor.commands().move_bookmark(part, Some(section), None);
    let err = editor.execute(cmd).unwrap_err();
    assert!(matches!(
        err,
        CommandError::Outline(OutlineError::InvariantViolation(_))
    ));
    assert!(!editor.can_undo());
    assert_eq!(snapshot(&editor), start);
}

#[test]
fn test_undo_failure_keeps_command_on_stack() {
    init_tracing();
    let mut editor = seeded_editor();
    let appendix = editor.document().bookmarks.find_by_title("Appendix")[0].id;

    let cmd = editor.commands().rename_bookmark(appendix, "Annex");
    editor.execute(cmd).unwrap();

    // The recorded destination (page 11) no longer fits once pages are dropped
    editor.document_mut().set_page_count(4);
    let err = editor.undo().unwrap_err();
    assert!(matches!(
        err,
        CommandError::Outline(OutlineError::InvalidDestination { page: 11, page_count: 4 })
    ));
    assert!(editor.can_undo());
    assert_eq!(editor.undo_label(), Some("Rename Bookmark"));

    editor.document_mut().set_page_count(PAGES);
    editor.undo().unwrap();
    assert_eq!(editor.document().bookmarks.bookmark(appendix).unwrap().title, "Appendix");
}

#[test]
fn test_new_command_clears_redo() {
    init_tracing();
    let mut editor = seeded_editor();
    let intro = editor.document().bookmarks.find_by_title("Intro")[0].id;

    let cmd = editor.commands().toggle_expanded(intro);
    editor.execute(cmd).unwrap();
    editor.undo().unwrap();
    assert!(editor.can_redo());

    let cmd = editor
        .commands()
        .update_bookmark(intro, BookmarkUpdate::destination(None));
    editor.execute(cmd).unwrap();
    assert!(!editor.can_redo());
    assert!(matches!(editor.redo(), Err(CommandError::RedoStackEmpty)));
}

#[test]
fn test_import_then_undo_brings_back_outline() {
    init_tracing();
    let mut editor = seeded_editor();
    let start = editor.document().bookmarks.export_bookmarks();

    let mut other = OutlineEditor::new(PAGES);
    other
        .document_mut()
        .bookmarks
        .create(NewBookmark::new("Only"))
        .unwrap();
    let incoming = other.document().bookmarks.export_bookmarks();

    let cmd = editor.commands().import_bookmarks(incoming.clone());
    editor.execute(cmd).unwrap();
    assert_eq!(editor.document().bookmarks.export_bookmarks(), incoming);

    editor.undo().unwrap();
    assert_eq!(editor.document().bookmarks.export_bookmarks(), start);
}

#[test]
fn test_commands_on_deleted_bookmark_are_rejected() {
    init_tracing();
    let mut editor = seeded_editor();
    let chapter = editor.document().bookmarks.find_by_title("Ch 2")[0].id;
    let intro = editor.document().bookmarks.find_by_title("Intro")[0].id;
    let cmd = editor.commands().delete_bookmark(chapter);
    editor.execute(cmd).unwrap();
    let after_delete = snapshot(&editor);

    let commands = editor.commands();
    let attempts = [
        commands.delete_bookmark(chapter),
        commands.rename_bookmark(chapter, "back"),
        commands.move_bookmark(intro, Some(chapter), None),
        commands.indent(chapter),
        commands.toggle_expanded(chapter),
        commands.create_bookmark(NewBookmark::new("orphan").under(chapter)),
    ];
    for cmd in attempts {
        let err = editor.execute(cmd).unwrap_err();
        assert!(matches!(err, CommandError::Outline(ref e) if e.is_not_found()), "{err}");
        assert_eq!(snapshot(&editor), after_delete);
        assert_sound(&editor);
    }
    assert_eq!(editor.history().undo_len(), 1);
    assert_eq!(editor.undo_label(), Some("Delete Bookmark"));
}
