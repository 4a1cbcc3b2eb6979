//! Integration tests: notebook session (sn-editor ↔ sn-core ↔ sn-render).
//!
//! Drives a `Session` with normalized input events against a `MemoryStore`
//! seeded from a JSON fixture, draining commits through a `CommitQueue`.
//!
//! Fixture layout (all cards 300×200):
//! - `fx_quote`   text  at (100, 100)
//! - `fx_cover`   image at (500, 100)
//! - `fx_summary` text  at (100, 400)
//! - `fx_link`    quote.right → cover.left

use pretty_assertions::assert_eq;
use sn_core::{
    CanvasBounds, CanvasConfig, ConnectionId, InteractionState, MemoryStore, NoteId, NoteKind,
    NotePatch, NoteStore, Point, Side,
};
use sn_editor::{
    Commit, CommitOutcome, CommitQueue, Effect, Effects, InputEvent, Modifiers, NotifyLevel,
    Session, execute,
};
use sn_render::Primitive;

const FIXTURE: &str = include_str!("fixtures/notebook.json");

fn setup() -> (MemoryStore, Session) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = MemoryStore::new(CanvasConfig::default());
    let ids = store.load_json(FIXTURE).unwrap();
    let snapshot = store.fetch_notebook(ids[0]).unwrap();
    (store, Session::new(snapshot, CanvasConfig::default()))
}

fn id(name: &str) -> NoteId {
    NoteId::intern(name)
}

fn down(s: &mut Session, x: f64, y: f64) -> Effects {
    s.handle(&InputEvent::PointerDown { x, y })
}

fn move_to(s: &mut Session, x: f64, y: f64) -> Effects {
    s.handle(&InputEvent::PointerMove { x, y })
}

fn up(s: &mut Session, x: f64, y: f64) -> Effects {
    s.handle(&InputEvent::PointerUp { x, y })
}

fn key(s: &mut Session, key: &str, modifiers: Modifiers) -> Effects {
    s.handle(&InputEvent::Key {
        key: key.into(),
        modifiers,
    })
}

/// Run every commit in `effects` (and their follow-ups) to completion.
fn drain(store: &mut MemoryStore, session: &mut Session, effects: Effects) -> Vec<Effect> {
    let mut queue = CommitQueue::new();
    let mut surfaced = queue.absorb(effects);
    surfaced.extend(queue.run(store, session));
    surfaced
}

fn only_commit(effects: Effects) -> Commit {
    let mut iter = effects.into_iter();
    match (iter.next(), iter.next()) {
        (Some(Effect::Commit(c)), None) => c,
        other => panic!("expected a single commit, got {other:?}"),
    }
}

fn has_drag_line(list: &[Primitive]) -> bool {
    list.iter().any(|p| matches!(p, Primitive::DragLine { .. }))
}

// ─── Drag & resize ───────────────────────────────────────────────────────

#[test]
fn drag_commits_on_release_and_defers_bounds() {
    let (mut store, mut session) = setup();
    let quote = id("fx_quote");
    assert_eq!(
        session.bounds(),
        CanvasBounds {
            width: 1400.0,
            height: 900.0
        }
    );

    assert!(down(&mut session, 150.0, 110.0).is_empty());
    move_to(&mut session, 1950.0, 1010.0);
    assert_eq!(session.note(quote).unwrap().origin(), Point::new(1900.0, 1000.0));
    // Not recomputed mid-gesture.
    assert_eq!(session.bounds().width, 1400.0);

    let commit = only_commit(up(&mut session, 1950.0, 1010.0));
    assert_eq!(
        commit,
        Commit::UpdateNote {
            note: quote,
            patch: NotePatch::position(1900.0, 1000.0),
        }
    );
    assert_eq!(
        session.bounds(),
        CanvasBounds {
            width: 2500.0,
            height: 1500.0
        }
    );

    let mut queue = CommitQueue::new();
    queue.absorb([Effect::Commit(commit)]);
    assert!(queue.run(&mut store, &mut session).is_empty());
    let stored = store.fetch_notebook(session.notebook().id).unwrap();
    assert_eq!(stored.notebook.note(quote).unwrap().origin(), Point::new(1900.0, 1000.0));
}

#[test]
fn drag_past_origin_clamps_to_zero() {
    let (_, mut session) = setup();
    down(&mut session, 150.0, 110.0);
    move_to(&mut session, 30.0, 5.0);
    let commit = only_commit(up(&mut session, 30.0, 5.0));
    assert_eq!(
        commit,
        Commit::UpdateNote {
            note: id("fx_quote"),
            patch: NotePatch::position(0.0, 0.0),
        }
    );
}

#[test]
fn resize_never_goes_below_floor() {
    let (_, mut session) = setup();
    down(&mut session, 395.0, 295.0);
    assert!(matches!(session.interaction(), InteractionState::Resizing { .. }));
    move_to(&mut session, 0.0, 0.0);
    let commit = only_commit(up(&mut session, 0.0, 0.0));
    assert_eq!(
        commit,
        Commit::UpdateNote {
            note: id("fx_quote"),
            patch: NotePatch::size(200.0, 150.0),
        }
    );
}

#[test]
fn pointer_down_during_drag_is_ignored() {
    let (_, mut session) = setup();
    down(&mut session, 150.0, 110.0);
    let before = *session.interaction();

    // Right anchor of the cover card.
    down(&mut session, 800.0, 200.0);
    assert_eq!(*session.interaction(), before);
    assert!(matches!(
        only_commit(up(&mut session, 150.0, 110.0)),
        Commit::UpdateNote { .. }
    ));
    assert!(session.interaction().is_idle());
}

// ─── Connections ─────────────────────────────────────────────────────────

#[test]
fn connect_inserts_edge_once_acknowledged() {
    let (mut store, mut session) = setup();
    let (quote, summary) = (id("fx_quote"), id("fx_summary"));

    // Bottom anchor of the quote card.
    down(&mut session, 250.0, 300.0);
    move_to(&mut session, 252.0, 398.0);
    let frame = session.render();
    assert!(frame.contains(&Primitive::DragLine {
        from: Point::new(250.0, 300.0),
        to: Point::new(252.0, 398.0),
    }));
    assert!(frame.contains(&Primitive::Anchor {
        note: summary,
        side: Side::Top,
        point: Point::new(250.0, 400.0),
        highlighted: true,
    }));

    let effects = up(&mut session, 252.0, 398.0);
    assert_eq!(
        effects.as_slice(),
        &[Effect::Commit(Commit::CreateConnection {
            notebook: session.notebook().id,
            from: quote,
            to: summary,
            from_side: Side::Bottom,
            to_side: Side::Top,
        })]
    );
    assert_eq!(session.graph().len(), 1);
    assert!(!has_drag_line(&session.render()));

    assert!(drain(&mut store, &mut session, effects).is_empty());
    assert_eq!(session.graph().len(), 2);
    assert!(
        session
            .graph()
            .find((quote, summary, Side::Bottom, Side::Top))
            .is_some()
    );
}

#[test]
fn duplicate_connect_warns_without_commit() {
    let (_, mut session) = setup();
    down(&mut session, 400.0, 200.0);
    let effects = up(&mut session, 498.0, 201.0);
    match effects.as_slice() {
        [Effect::Notify(n)] => {
            assert_eq!(n.level, NotifyLevel::Warning);
            assert_eq!(n.message, "connection already exists");
        }
        other => panic!("expected a warning, got {other:?}"),
    }
    assert_eq!(session.graph().len(), 1);
}

#[test]
fn release_on_own_anchor_creates_nothing() {
    let (_, mut session) = setup();
    down(&mut session, 400.0, 200.0);
    move_to(&mut session, 250.0, 300.0);
    assert!(up(&mut session, 250.0, 300.0).is_empty());
    assert!(session.interaction().is_idle());
}

#[test]
fn escape_abandons_connect_gesture() {
    let (_, mut session) = setup();
    down(&mut session, 400.0, 200.0);
    move_to(&mut session, 450.0, 260.0);
    assert!(has_drag_line(&session.render()));

    assert!(key(&mut session, "Escape", Modifiers::NONE).is_empty());
    assert!(session.interaction().is_idle());
    assert!(!has_drag_line(&session.render()));
    assert!(up(&mut session, 500.0, 200.0).is_empty());
}

#[test]
fn hovered_connection_deletes_on_delete_key() {
    let (mut store, mut session) = setup();
    let link = ConnectionId::intern("fx_link");

    move_to(&mut session, 450.0, 204.0);
    assert_eq!(session.hovered_connection(), Some(link));
    assert!(session.render().contains(&Primitive::DeleteMarker {
        connection: link,
        center: Point::new(450.0, 200.0),
    }));

    let effects = key(&mut session, "Delete", Modifiers::NONE);
    assert_eq!(
        effects.as_slice(),
        &[Effect::Commit(Commit::DeleteConnection { connection: link })]
    );
    assert!(session.graph().is_empty());

    assert!(drain(&mut store, &mut session, effects).is_empty());
    let stored = store.fetch_notebook(session.notebook().id).unwrap();
    assert!(stored.connections.is_empty());
}

#[test]
fn delete_key_without_hover_does_nothing() {
    let (_, mut session) = setup();
    move_to(&mut session, 450.0, 210.0);
    assert_eq!(session.hovered_connection(), None);
    assert!(key(&mut session, "Delete", Modifiers::NONE).is_empty());
    assert_eq!(session.graph().len(), 1);
}

#[test]
fn deleting_endpoint_hides_connection_before_refresh() {
    let (mut store, mut session) = setup();
    let effects = session.delete_note(id("fx_cover"));
    assert_eq!(
        effects.as_slice(),
        &[Effect::Commit(Commit::DeleteNote {
            note: id("fx_cover")
        })]
    );

    let rendered: Vec<_> = session
        .render()
        .into_iter()
        .filter(|p| matches!(p, Primitive::Connection { .. }))
        .collect();
    assert!(rendered.is_empty());
    // Dangling, not eagerly removed.
    assert_eq!(session.graph().len(), 1);

    assert!(drain(&mut store, &mut session, effects).is_empty());
    assert!(session.graph().is_empty());
    assert_eq!(session.notes().len(), 2);
}

// ─── Editing ─────────────────────────────────────────────────────────────

#[test]
fn edit_saves_with_command_enter() {
    let (mut store, mut session) = setup();
    let quote = id("fx_quote");

    session.handle(&InputEvent::DoubleClick { x: 200.0, y: 200.0 });
    assert_eq!(session.editing().map(|e| e.note), Some(quote));

    // Drag entry is suspended while editing.
    down(&mut session, 150.0, 110.0);
    assert!(session.interaction().is_idle());
    assert!(up(&mut session, 150.0, 110.0).is_empty());

    session.handle(&InputEvent::EditText {
        text: "Edited".into(),
    });
    assert!(key(&mut session, "Enter", Modifiers::NONE).is_empty());
    assert!(session.editing().is_some());

    let effects = key(&mut session, "Enter", Modifiers::CTRL);
    assert_eq!(
        effects.as_slice(),
        &[Effect::Commit(Commit::UpdateNote {
            note: quote,
            patch: NotePatch::content("Edited"),
        })]
    );
    assert!(session.editing().is_none());
    assert_eq!(session.note(quote).unwrap().content, "Edited");

    assert!(drain(&mut store, &mut session, effects).is_empty());
    let stored = store.fetch_notebook(session.notebook().id).unwrap();
    assert_eq!(stored.notebook.note(quote).unwrap().content, "Edited");
}

#[test]
fn escape_discards_edit() {
    let (_, mut session) = setup();
    let quote = id("fx_quote");
    session.on_double_click(quote);
    session.set_edit_text("scratch");
    assert!(key(&mut session, "Escape", Modifiers::NONE).is_empty());
    assert!(session.editing().is_none());
    assert_eq!(session.note(quote).unwrap().content, "The map is not the territory.");
}

#[test]
fn image_notes_are_not_editable() {
    let (_, mut session) = setup();
    session.handle(&InputEvent::DoubleClick { x: 650.0, y: 200.0 });
    assert!(session.editing().is_none());
}

#[test]
fn delete_key_is_text_while_editing() {
    let (_, mut session) = setup();
    session.on_double_click(id("fx_summary"));
    move_to(&mut session, 450.0, 204.0);
    assert!(key(&mut session, "Delete", Modifiers::NONE).is_empty());
    assert_eq!(session.graph().len(), 1);
}

// ─── Paste ───────────────────────────────────────────────────────────────

#[test]
fn pasted_text_is_trimmed_and_placed_by_planner() {
    let (_, mut session) = setup();
    let effects = session.handle(&InputEvent::PasteText {
        text: "  hello  ".into(),
    });
    assert_eq!(
        only_commit(effects),
        Commit::CreateNote {
            notebook: session.notebook().id,
            kind: NoteKind::Text,
            content: "hello".into(),
            position: Some(Point::new(100.0, 600.0)),
        }
    );
    assert!(session.on_paste_text("   \n").is_empty());
}

#[test]
fn paste_is_ignored_while_editing() {
    let (_, mut session) = setup();
    session.on_double_click(id("fx_quote"));
    assert!(session.on_paste_text("hello").is_empty());
    assert!(session.on_paste_image(vec![1, 2, 3], "image/png").is_empty());
}

#[test]
fn pasted_image_uploads_then_creates_note() {
    let (mut store, mut session) = setup();
    let effects = session.on_paste_image(vec![1, 2, 3], "image/png");
    assert!(matches!(
        effects.as_slice(),
        [Effect::Commit(Commit::UploadImage { position, .. })] if *position == Point::new(100.0, 600.0)
    ));

    assert!(drain(&mut store, &mut session, effects).is_empty());
    assert_eq!(session.notes().len(), 4);
    let created = session.notes().last().unwrap();
    assert_eq!(created.kind, NoteKind::Image);
    assert_eq!(created.origin(), Point::new(100.0, 600.0));
    assert!(created.content.starts_with("memory://screenshots/"));
    assert_eq!(store.blob(&created.content), Some(&[1u8, 2, 3][..]));
}

#[test]
fn failed_upload_notifies_and_creates_nothing() {
    let (mut store, mut session) = setup();
    let effects = session.on_paste_image(vec![1], "text/plain");
    let surfaced = drain(&mut store, &mut session, effects);
    match surfaced.as_slice() {
        [Effect::Notify(n)] => assert_eq!(n.level, NotifyLevel::Error),
        other => panic!("expected an error notification, got {other:?}"),
    }
    assert_eq!(session.notes().len(), 3);
}

// ─── Write-behind races ──────────────────────────────────────────────────

#[test]
fn late_update_ack_does_not_stomp_newer_drag() {
    let (mut store, mut session) = setup();
    let quote = id("fx_quote");

    down(&mut session, 150.0, 110.0);
    move_to(&mut session, 250.0, 110.0);
    let first = only_commit(up(&mut session, 250.0, 110.0));

    down(&mut session, 250.0, 110.0);
    move_to(&mut session, 350.0, 110.0);
    let second = only_commit(up(&mut session, 350.0, 110.0));

    // Acks arrive out of order.
    let late = execute(&mut store, second);
    assert!(session.apply_outcome(late).is_empty());
    let stale = execute(&mut store, first);
    assert!(session.apply_outcome(stale).is_empty());

    assert_eq!(session.note(quote).unwrap().origin(), Point::new(300.0, 100.0));
    // The store keeps whichever write landed last.
    let stored = store.fetch_notebook(session.notebook().id).unwrap();
    assert_eq!(stored.notebook.note(quote).unwrap().origin(), Point::new(200.0, 100.0));
}

#[test]
fn refresh_mid_drag_keeps_dragged_geometry() {
    let (mut store, mut session) = setup();
    let (quote, summary) = (id("fx_quote"), id("fx_summary"));

    down(&mut session, 150.0, 110.0);
    move_to(&mut session, 170.0, 130.0);
    store
        .update_note(summary, &NotePatch::content("Revised"))
        .unwrap();

    let fetched = CommitOutcome::Fetched(store.fetch_notebook(session.notebook().id));
    assert!(session.apply_outcome(fetched).is_empty());

    assert_eq!(session.note(quote).unwrap().origin(), Point::new(120.0, 120.0));
    assert_eq!(session.note(summary).unwrap().content, "Revised");
    assert!(matches!(session.interaction(), InteractionState::Dragging { .. }));
}

#[test]
fn failed_commit_keeps_local_state() {
    let (mut store, mut session) = setup();
    let summary = id("fx_summary");
    store.delete_note(summary).unwrap();

    down(&mut session, 150.0, 410.0);
    move_to(&mut session, 650.0, 710.0);
    let effects = up(&mut session, 650.0, 710.0);
    let surfaced = drain(&mut store, &mut session, effects);

    match surfaced.as_slice() {
        [Effect::Notify(n)] => {
            assert_eq!(n.level, NotifyLevel::Warning);
            assert!(n.message.contains("not found"), "{}", n.message);
        }
        other => panic!("expected a warning, got {other:?}"),
    }
    assert_eq!(session.note(summary).unwrap().origin(), Point::new(600.0, 700.0));
}

// ─── Lifecycle ───────────────────────────────────────────────────────────

#[test]
fn open_fetches_notebook() {
    let (mut store, _) = setup();
    let nb = store.list_notebooks().unwrap()[0].id;
    let (mut session, effects) = Session::open(nb, CanvasConfig::default());
    assert!(session.notes().is_empty());

    assert!(drain(&mut store, &mut session, effects).is_empty());
    assert_eq!(session.notebook().name, "Reading list");
    assert_eq!(session.notes().len(), 3);
    assert_eq!(session.graph().len(), 1);
}

#[test]
fn deleted_notebook_navigates_to_list() {
    let (mut store, mut session) = setup();
    store.delete_notebook(session.notebook().id).unwrap();
    let effects = session.refresh();
    assert_eq!(
        drain(&mut store, &mut session, effects),
        vec![Effect::NavigateToList]
    );
}
