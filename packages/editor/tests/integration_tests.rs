//! Integration tests for editor crate

use std::sync::Arc;
use std::time::Duration;

use arnika_editor::{
    storage, Alignment, Autosave, ContextAction, EditSession, EditorError, ImageGenerator,
    InteractionState, KeyValueStore, MemoryStore, Point, PointerInput, PointerOutcome,
    SaveStatus, ServiceError, SlideRefiner, SourceFile, StructureGenerator,
    TextExtractor, AspectRatio, FileStore, HistoryEntry, PlainTextExtractor, HISTORY_INDEX_KEY,
    HISTORY_KEY, MAX_HISTORY, MAX_ZOOM, MIN_ZOOM, PROJECT_KEY,
};
use arnika_model::{
    template, ElementStyles, ElementType, IdGenerator, NavigationMetadata, Project, Slide,
    Template,
};

fn pitch_session() -> EditSession {
    let mut session = EditSession::with_ids(IdGenerator::from_seed("it"));
    session.new_from_template(Template::Pitch);
    session
}

fn left_of(session: &EditSession, id: &str) -> Option<String> {
    session
        .current_slide()?
        .element(id)?
        .left()
        .map(str::to_string)
}

#[test]
fn test_n_edits_then_m_undos() {
    let mut session = pitch_session();
    let titles = ["One", "Two", "Three", "Four", "Five"];
    for title in titles {
        assert!(session.rename_slide("s1", title));
    }
    assert_eq!(session.history().len(), titles.len() + 1);

    for _ in 0..3 {
        assert!(session.undo());
    }
    assert_eq!(session.current_slide().unwrap().title, "Two");
    assert_eq!(session.history().cursor(), Some(2));

    // Undo past the first entry is refused
    session.undo();
    session.undo();
    assert!(!session.undo());
    assert_eq!(session.current_slide().unwrap().title, "The Big Idea");
}

#[test]
fn test_history_keeps_last_thirty() {
    let mut session = pitch_session();
    for i in 0..40 {
        session.rename_slide("s1", &format!("Title {}", i));
    }

    let history = session.history();
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history.cursor(), Some(MAX_HISTORY - 1));
    assert_eq!(history.entries()[0].project.slide("s1").unwrap().title, "Title 10");
}

#[test]
fn test_edit_after_restore_truncates() {
    let mut session = pitch_session();
    session.rename_slide("s1", "A");
    session.rename_slide("s1", "B");
    session.rename_slide("s1", "C");

    assert!(session.restore(1));
    assert_eq!(session.history().len(), 4, "restore keeps later entries");
    assert_eq!(session.current_slide().unwrap().title, "A");

    session.rename_slide("s1", "Fork");
    let actions: Vec<_> = session
        .history()
        .entries()
        .iter()
        .map(|e| e.project.slide("s1").unwrap().title.clone())
        .collect();
    assert_eq!(actions, vec!["The Big Idea", "A", "Fork"]);
}

#[test]
fn test_align_left_and_center() {
    let mut session = pitch_session();
    let a = session.add_element(ElementType::Shape, "").unwrap();
    let b = session.add_element(ElementType::Shape, "").unwrap();
    session.update_element_styles(
        &a,
        ElementStyles {
            left: Some("10%".into()),
            width: Some("20%".into()),
            ..Default::default()
        },
    );
    session.update_element_styles(
        &b,
        ElementStyles {
            left: Some("30%".into()),
            width: Some("10%".into()),
            ..Default::default()
        },
    );
    session.interaction_mut().select_many([a.clone(), b.clone()]);

    let before = session.history().len();
    assert!(session.align(Alignment::Center));
    assert_eq!(session.history().len(), before + 1);
    assert_eq!(left_of(&session, &a).as_deref(), Some("17.5%"));
    assert_eq!(left_of(&session, &b).as_deref(), Some("22.5%"));

    assert!(session.align(Alignment::Left));
    assert_eq!(left_of(&session, &a).as_deref(), Some("17.5%"));
    assert_eq!(left_of(&session, &b).as_deref(), Some("17.5%"));
}

#[test]
fn test_distribute_needs_three() {
    let mut session = pitch_session();
    let a = session.add_element(ElementType::Text, "a").unwrap();
    session.interaction_mut().select_many(["e1".to_string(), a]);
    assert!(!session.align(Alignment::DistributeVertical));
}

#[test]
fn test_drag_two_elements() {
    let mut session = pitch_session();
    let a = session.add_element(ElementType::Text, "second").unwrap();

    session.interaction_mut().select_many(["e1".to_string(), a.clone()]);
    let outcome = session.pointer_down(Some(&a), PointerInput::at(200.0, 100.0));
    assert_eq!(outcome, PointerOutcome::DragStarted);
    assert_eq!(session.interaction().state(), InteractionState::Dragging);

    // 100px at scale 1 over a 1000px canvas
    session.pointer_move(Point::new(300.0, 100.0));
    assert!(session.pointer_up());

    assert_eq!(left_of(&session, "e1").as_deref(), Some("20%"));
    assert_eq!(left_of(&session, &a).as_deref(), Some("50%"));
    assert_eq!(session.history().current().unwrap().action, "Move Elements");
}

#[test]
fn test_click_without_move_commits_nothing() {
    let mut session = pitch_session();
    session.pointer_down(Some("e1"), PointerInput::at(10.0, 10.0));
    assert!(!session.pointer_up());
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_zoom_is_clamped() {
    let mut session = pitch_session();
    for _ in 0..100 {
        session.zoom_in();
    }
    assert_eq!(session.interaction().zoom().effective(), MAX_ZOOM);

    for _ in 0..100 {
        session.wheel(500.0, true);
    }
    assert_eq!(session.interaction().zoom().effective(), MIN_ZOOM);

    session.reset_zoom();
    assert!(!session.wheel(-100.0, false));
    assert_eq!(session.interaction().zoom().multiplier(), 1.0);
}

#[test]
fn test_deleting_last_slide_dissolves_project() {
    let mut session = EditSession::with_ids(IdGenerator::from_seed("it"));
    session.new_from_template(Template::Portfolio);
    session.delete_slide("s2");
    assert!(session.delete_slide("s1"));

    assert!(session.project().is_none());
    assert!(session.current_slide().is_none());
    assert_eq!(session.history().len(), 2);
    assert!(session.add_slide().is_none());
}

#[test]
fn test_presentation_follows_links_only() {
    let mut session = pitch_session();
    session.update_element_metadata("e1", NavigationMetadata::internal("s2"));
    session.set_presenting(true);

    assert_eq!(
        session.pointer_down(None, PointerInput::at(0.0, 0.0)),
        PointerOutcome::Ignored
    );
    let outcome = session.pointer_down(Some("e1"), PointerInput::at(0.0, 0.0));
    assert!(matches!(outcome, PointerOutcome::Navigate(_)));
    assert_eq!(session.current_slide_id(), Some("s2"));
    assert!(!session.wheel(-100.0, true));
}

#[test]
fn test_broken_link_is_reported_not_repaired() {
    let mut session = pitch_session();
    session.update_element_metadata("e1", NavigationMetadata::internal("s3"));
    session.delete_slide("s3");

    let map = session.link_map().unwrap();
    assert_eq!(map.broken_count(), 1);
    let element = session.current_slide().unwrap().element("e1").unwrap();
    assert_eq!(element.metadata.target_slide_id(), Some("s3"));
}

#[test]
fn test_context_menu_on_unselected_element() {
    let mut session = pitch_session();
    let actions = session.open_context_menu(Point::new(5.0, 5.0), Some("e1"));
    assert!(session.interaction().is_selected("e1"));
    assert!(actions.contains(&ContextAction::Delete));

    assert!(session.context_action(ContextAction::Delete));
    assert!(session.current_slide().unwrap().elements.is_empty());

    let actions = session.open_context_menu(Point::new(5.0, 5.0), None);
    assert_eq!(actions, vec![ContextAction::Paste]);
}

#[test]
fn test_persist_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());

    let mut session = pitch_session();
    session.rename_slide("s2", "Why now");
    storage::save(&store, session.project().unwrap(), session.history()).unwrap();

    let resumed = EditSession::from_restored(storage::restore(&store));
    assert_eq!(resumed.project(), session.project());
    assert_eq!(resumed.history().len(), 2);
    assert_eq!(resumed.current_slide_id(), Some("s1"));
}

#[test]
fn test_malformed_storage_is_cleared() {
    let store = MemoryStore::new();
    store.set(PROJECT_KEY, "{not json").unwrap();
    store.set(HISTORY_KEY, "[1, 2]").unwrap();

    let restored = storage::restore(&store);
    assert!(restored.project.is_none());
    assert!(restored.history.is_empty());
    assert!(store.get(PROJECT_KEY).unwrap().is_none());
    assert!(store.get(HISTORY_KEY).unwrap().is_none());
}

#[test]
fn test_untrusted_history_is_repaired_on_resume() {
    let store = MemoryStore::new();
    let pitch = template(Template::Pitch);

    let mut slideless = pitch.clone();
    slideless.slides.clear();
    let mut dupes = pitch.clone();
    dupes.slides.push(dupes.slides[0].clone());

    let entries: Vec<HistoryEntry> = [
        (slideless, "Broken"),
        (pitch.clone(), "Start"),
        (dupes, "Paste"),
    ]
    .into_iter()
    .map(|(project, action)| HistoryEntry {
        timestamp: 0,
        project,
        action: action.to_string(),
    })
    .collect();
    store
        .set(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
        .unwrap();
    store
        .set(PROJECT_KEY, &serde_json::to_string(&pitch).unwrap())
        .unwrap();
    store.set(HISTORY_INDEX_KEY, "1").unwrap();

    let mut session = EditSession::from_restored(storage::restore(&store));
    assert_eq!(session.history().len(), 2);
    assert!(session
        .history()
        .entries()
        .iter()
        .all(|e| e.project.validate().is_ok()));

    // Nothing left to undo into
    assert!(!session.undo());
    assert!(!session.project().unwrap().slides.is_empty());

    assert!(session.redo());
    assert!(session.project().unwrap().validate().is_ok());
}

#[test]
fn test_resume_keeps_cursor_with_repeated_state() {
    let store = MemoryStore::new();
    let mut session = pitch_session();
    let original = session.project().unwrap().slides[0].title.clone();
    session.rename_slide("s1", "One");
    session.rename_slide("s1", &original);
    storage::save(&store, session.project().unwrap(), session.history()).unwrap();

    // Entries 0 and 2 hold equal projects; each undo must still step back
    let mut seen = Vec::new();
    for _ in 0..4 {
        let mut resumed = EditSession::from_restored(storage::restore(&store));
        resumed.undo();
        seen.push(resumed.history().cursor());
        storage::save(&store, resumed.project().unwrap(), resumed.history()).unwrap();
    }
    assert_eq!(seen, [Some(1), Some(0), Some(0), Some(0)]);

    let resumed = EditSession::from_restored(storage::restore(&store));
    assert_eq!(resumed.project().unwrap().slides[0].title, original);
    assert!(resumed.history().can_redo());
}

#[tokio::test(start_paused = true)]
async fn test_autosave_after_session_edits() {
    let store = Arc::new(MemoryStore::new());
    let autosave = Autosave::spawn(store.clone(), Duration::from_millis(500));

    let mut session = pitch_session();
    for title in ["a", "b", "c"] {
        session.rename_slide("s1", title);
        autosave.notify(session.project(), session.history());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(store.get(PROJECT_KEY).unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(autosave.status(), SaveStatus::Saved);

    let saved = Project::from_json(&store.get(PROJECT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.slide("s1").unwrap().title, "c");
}

struct Outline;

impl StructureGenerator for Outline {
    async fn generate(&self, text: &str, file_name: &str) -> Result<Project, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::EmptyResponse("structure generator"));
        }
        let mut project = template(Template::Portfolio);
        project.name = file_name.trim_end_matches(".md").to_string();
        Ok(project)
    }
}

struct Unreadable;

impl TextExtractor for Unreadable {
    async fn extract(&self, _: &SourceFile) -> Result<String, ServiceError> {
        Err(ServiceError::Extraction("encrypted".into()))
    }
}

#[tokio::test]
async fn test_import_opens_project() {
    let mut session = EditSession::with_ids(IdGenerator::from_seed("it"));
    let file = SourceFile::new("roadmap.md", "# Roadmap");

    session
        .import(&PlainTextExtractor, &Outline, &file)
        .await
        .unwrap();

    assert_eq!(session.project().unwrap().name, "roadmap");
    assert_eq!(session.history().len(), 1);
    assert_eq!(
        session.history().current().unwrap().action,
        "Imported roadmap.md"
    );
}

#[tokio::test]
async fn test_import_failure_leaves_session() {
    let mut session = pitch_session();
    let before = session.project().cloned();

    let err = session
        .import(&Unreadable, &Outline, &SourceFile::new("a.pdf", "x"))
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Import(_)));
    assert_eq!(session.last_error(), Some("AI analysis failed."));
    assert_eq!(session.project().cloned(), before);

    let err = session
        .import(&PlainTextExtractor, &Outline, &SourceFile::new("empty.txt", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Import(_)));
    assert_eq!(session.history().len(), 1);
}

struct Retitle;

impl SlideRefiner for Retitle {
    async fn refine(&self, slide: &Slide, _: &str) -> Result<Slide, ServiceError> {
        let mut slide = slide.clone();
        slide.title = "Refined".into();
        Ok(slide)
    }
}

struct Offline;

impl SlideRefiner for Offline {
    async fn refine(&self, _: &Slide, _: &str) -> Result<Slide, ServiceError> {
        Err(ServiceError::Request("offline".into()))
    }
}

impl ImageGenerator for Offline {
    async fn generate_image(&self, _: &str, _: AspectRatio) -> Result<String, ServiceError> {
        Err(ServiceError::Request("offline".into()))
    }
}

#[tokio::test]
async fn test_refine_and_undo() {
    let mut session = pitch_session();
    session.select_slide("s2");

    session.refine_current_slide(&Retitle).await.unwrap();
    assert_eq!(session.current_slide().unwrap().title, "Refined");

    session.undo();
    assert_eq!(session.current_slide().unwrap().title, "The Problem");

    assert!(session.refine_current_slide(&Offline).await.is_err());
    assert!(session.last_error().unwrap().contains("offline"));
    session.dismiss_error();
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn test_image_failure_adds_nothing() {
    let mut session = pitch_session();
    let result = session
        .generate_image(&Offline, "a lighthouse", AspectRatio::Wide)
        .await;
    assert!(matches!(result, Err(EditorError::Service(_))));
    assert_eq!(session.current_slide().unwrap().elements.len(), 1);
}

#[test]
fn test_mutation_serialization() {
    let mutation = arnika_editor::Mutation::UpdateSlideTitle {
        slide_id: "s1".into(),
        title: "Hello".into(),
    };
    let json = serde_json::to_string(&mutation).unwrap();
    let back: arnika_editor::Mutation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, mutation);
}
