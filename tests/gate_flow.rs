mod common;

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use tempfile::tempdir;

use common::{app_with, memory_session, settle, ScriptedTransport};
use gated_explorer::session::{FileStorage, Identity, SessionContext, SessionStore};
use gated_explorer::tui::{render_headless, snapshot, App};
use gated_explorer::views::{DatasetKind, GateState, Route, Screen};
use gated_explorer::ExplorerConfig;

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key(KeyEvent::from(KeyCode::Char(c)));
    }
}

#[tokio::test]
async fn test_first_render_without_identity_is_gate() {
    let (_, session) = memory_session();
    let characters = Arc::new(ScriptedTransport::new("characters"));
    let app = app_with(
        session,
        characters.clone(),
        Arc::new(ScriptedTransport::new("launches")),
        "/characters?page=2",
    );

    assert_eq!(app.screen(), Screen::Gate);
    assert_eq!(app.gate().state(), GateState::Unauthenticated);
    assert_eq!(characters.call_count(), 0);
}

#[tokio::test]
async fn test_submission_unlocks_list_and_survives_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let session = SessionContext::mount(SessionStore::new(Arc::new(FileStorage::new(&path))));
    let characters = Arc::new(ScriptedTransport::new("characters"));
    let mut app = app_with(
        session,
        characters.clone(),
        Arc::new(ScriptedTransport::new("launches")),
        "/",
    );

    type_text(&mut app, "  ana ");
    app.handle_key(KeyEvent::from(KeyCode::Tab));
    type_text(&mut app, "eng");
    app.handle_key(KeyEvent::from(KeyCode::Enter));

    assert_eq!(
        app.screen(),
        Screen::List { dataset: DatasetKind::Characters, page: 1 }
    );
    settle(&mut app).await;
    assert_eq!(characters.call_count(), 1);

    // A fresh mount from the same storage file is a simulated reload.
    let reloaded = SessionContext::mount(SessionStore::new(Arc::new(FileStorage::new(&path))));
    assert_eq!(reloaded.current(), Identity::new("ana", "eng"));
}

#[tokio::test]
async fn test_empty_field_keeps_gate_and_storage() {
    let (store, session) = memory_session();
    let characters = Arc::new(ScriptedTransport::new("characters"));
    let mut app = app_with(
        session,
        characters.clone(),
        Arc::new(ScriptedTransport::new("launches")),
        "/characters",
    );

    type_text(&mut app, "ana");
    app.handle_key(KeyEvent::from(KeyCode::Enter));

    assert_eq!(app.screen(), Screen::Gate);
    assert!(app.gate().error().is_some());
    assert!(store.load().is_none());
    assert_eq!(characters.call_count(), 0);
}

#[tokio::test]
async fn test_edit_my_info_updates_identity() {
    let (store, session) = memory_session();
    session.sign_in("ana", "eng");
    let mut app = app_with(
        session,
        Arc::new(ScriptedTransport::new("characters")),
        Arc::new(ScriptedTransport::new("launches")),
        "/characters",
    );
    settle(&mut app).await;

    app.handle_key(KeyEvent::from(KeyCode::Char('e')));
    assert_eq!(app.screen(), Screen::Gate);
    assert!(app.gate().is_editing());

    app.handle_key(KeyEvent::from(KeyCode::Tab));
    for _ in 0.."eng".len() {
        app.handle_key(KeyEvent::from(KeyCode::Backspace));
    }
    type_text(&mut app, "lead");
    app.handle_key(KeyEvent::from(KeyCode::Enter));

    assert_eq!(store.load(), Identity::new("ana", "lead"));
    assert!(matches!(app.screen(), Screen::List { .. }));
}

#[tokio::test]
async fn test_escape_cancels_edit_without_changes() {
    let (store, session) = memory_session();
    session.sign_in("ana", "eng");
    let mut app = app_with(
        session,
        Arc::new(ScriptedTransport::new("characters")),
        Arc::new(ScriptedTransport::new("launches")),
        "/characters",
    );

    app.handle_key(KeyEvent::from(KeyCode::Char('e')));
    type_text(&mut app, "zzz");
    app.handle_key(KeyEvent::from(KeyCode::Esc));

    assert!(matches!(app.screen(), Screen::List { .. }));
    assert!(!app.should_quit());
    assert_eq!(store.load(), Identity::new("ana", "eng"));
}

#[tokio::test]
async fn test_gate_snapshot_shows_form() {
    let (_, session) = memory_session();
    let app = app_with(
        session,
        Arc::new(ScriptedTransport::new("characters")),
        Arc::new(ScriptedTransport::new("launches")),
        "/launches",
    );

    let text = snapshot(&app, 90, 24).unwrap();
    assert!(text.contains("Who are you?"));
    assert!(text.contains("Display name"));
    assert!(text.contains("Job title"));
}

#[tokio::test]
async fn test_headless_render_never_has_identity() {
    let text = render_headless(&ExplorerConfig::default(), Route::parse("/characters"), 100, 30)
        .unwrap();
    assert!(text.contains("Who are you?"));
    assert!(text.contains("not signed in"));
}
