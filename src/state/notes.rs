use crate::api::{ApiClient, ApiError, ApiResult};
use crate::models::{Note, NoteInput};
use crate::state::auth::AuthState;
use crate::util::sort_notes;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) const UNTITLED: &str = "Untitled";

/// Editable fields of the note shown in the editor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}

/// Local mirror of the remote note list plus the editor selection.
///
/// `notes` is kept newest-first after every load, create and update.
/// `composing` means the editor holds a note that does not exist on the server yet.
#[derive(Clone, Debug, Default)]
pub(crate) struct NoteBook {
    pub notes: Vec<Note>,
    pub active_id: Option<String>,
    pub composing: bool,
    pub draft: NoteDraft,
}

impl NoteBook {
    pub fn active(&self) -> Option<&Note> {
        let id = self.active_id.as_deref()?;
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id.as_deref() == Some(id)
    }

    /// Whether the editor has something to show.
    pub fn is_editing(&self) -> bool {
        self.active_id.is_some() || self.composing
    }

    pub fn replace_all(&mut self, mut notes: Vec<Note>) {
        sort_notes(&mut notes);
        self.notes = notes;

        if self.active().is_some() || self.composing {
            return;
        }
        match self.notes.first().map(|n| n.id.clone()) {
            Some(id) => self.select(&id),
            None => self.clear_selection(),
        }
    }

    pub fn select(&mut self, id: &str) {
        let Some(note) = self.notes.iter().find(|n| n.id == id) else {
            return;
        };
        self.draft = NoteDraft::from_note(note);
        self.active_id = Some(note.id.clone());
        self.composing = false;
    }

    pub fn start_new(&mut self) {
        self.active_id = None;
        self.composing = true;
        self.draft = NoteDraft::default();
    }

    pub fn insert_created(&mut self, note: Note) {
        self.notes.retain(|n| n.id != note.id);
        let id = note.id.clone();
        self.notes.insert(0, note);
        sort_notes(&mut self.notes);
        self.select(&id);
    }

    pub fn apply_updated(&mut self, note: Note) {
        let id = note.id.clone();
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(slot) => *slot = note,
            None => self.notes.push(note),
        }
        sort_notes(&mut self.notes);

        if self.is_active(&id) {
            self.select(&id);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.notes.retain(|n| n.id != id);
        if !self.is_active(id) {
            return;
        }
        match self.notes.first().map(|n| n.id.clone()) {
            Some(next) => self.select(&next),
            None => self.clear_selection(),
        }
    }

    pub fn clear_selection(&mut self) {
        self.active_id = None;
        self.composing = false;
        self.draft = NoteDraft::default();
    }

    pub fn is_dirty(&self) -> bool {
        match self.active() {
            Some(note) => self.draft != NoteDraft::from_note(note),
            None => self.composing && !self.draft.is_empty(),
        }
    }

    pub fn filtered(&self, query: &str) -> Vec<Note> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return self.notes.clone();
        }
        self.notes
            .iter()
            .filter(|n| n.title.to_lowercase().contains(&q) || n.content.to_lowercase().contains(&q))
            .cloned()
            .collect()
    }

    /// What Save would send: `None` target means create. Nothing when the draft is unchanged.
    pub fn pending_save(&self) -> Option<(Option<String>, NoteInput)> {
        self.is_dirty()
            .then(|| (self.active_id.clone(), self.draft_input()))
    }

    pub fn draft_input(&self) -> NoteInput {
        let title = self.draft.title.trim();
        NoteInput {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title.to_string()
            },
            content: self.draft.content.clone(),
        }
    }
}

/// Reactive holder around [`NoteBook`] that talks to the backend.
#[derive(Clone, Copy)]
pub(crate) struct NotesState {
    pub book: RwSignal<NoteBook>,
    pub loading: RwSignal<bool>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub search_query: RwSignal<String>,
    api: RwSignal<ApiClient>,
    auth: AuthState,
}

impl NotesState {
    pub fn new(api: RwSignal<ApiClient>, auth: AuthState) -> Self {
        Self {
            book: RwSignal::new(NoteBook::default()),
            loading: RwSignal::new(false),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
            search_query: RwSignal::new(String::new()),
            api,
            auth,
        }
    }

    pub fn reset(&self) {
        self.book.set(NoteBook::default());
        self.loading.set(false);
        self.saving.set(false);
        self.error.set(None);
        self.search_query.set(String::new());
    }

    fn report(&self, action: &str, e: ApiError) {
        log::warn!("{action} failed: {e}");
        if e.is_unauthorized() {
            self.reset();
            self.auth.expire();
        } else {
            self.error.set(Some(e.to_string()));
        }
    }

    /// Completions from a session that has since ended must not touch the current one.
    fn is_stale(&self, generation: u64, action: &str) -> bool {
        let stale = !self.auth.is_current(generation);
        if stale {
            log::debug!("dropping {action} result from an ended session");
        }
        stale
    }

    pub fn load(&self) {
        if self.loading.get_untracked() {
            return;
        }
        let state = *self;
        let api = self.api.get_untracked();
        let generation = self.auth.generation();
        self.loading.set(true);

        spawn_local(async move {
            let result = api.list_notes().await.into_result();
            state.finish_load(generation, result);
        });
    }

    pub(crate) fn finish_load(&self, generation: u64, result: ApiResult<Vec<Note>>) {
        if self.is_stale(generation, "load notes") {
            return;
        }
        match result {
            Ok(notes) => {
                log::info!("loaded {} notes", notes.len());
                self.book.update(|b| b.replace_all(notes));
                self.error.set(None);
            }
            Err(e) => self.report("load notes", e),
        }
        self.loading.set(false);
    }

    pub fn select(&self, id: &str) {
        self.book.update(|b| b.select(id));
    }

    pub fn start_new(&self) {
        self.book.update(|b| b.start_new());
    }

    pub fn set_title(&self, title: String) {
        self.book.update(|b| b.draft.title = title);
    }

    pub fn set_content(&self, content: String) {
        self.book.update(|b| b.draft.content = content);
    }

    /// Create when composing, update the active note otherwise. No-op without changes.
    pub fn save(&self) {
        if self.saving.get_untracked() {
            return;
        }
        let Some((target, input)) = self.book.with_untracked(NoteBook::pending_save) else {
            return;
        };

        let state = *self;
        let api = self.api.get_untracked();
        let generation = self.auth.generation();
        self.saving.set(true);

        spawn_local(async move {
            let result = match &target {
                None => api.create_note(&input).await,
                Some(id) => api.update_note(id, &input).await,
            };
            state.finish_save(generation, target.is_none(), result.into_result());
        });
    }

    pub(crate) fn finish_save(&self, generation: u64, created: bool, result: ApiResult<Note>) {
        let action = if created { "create note" } else { "update note" };
        if self.is_stale(generation, action) {
            return;
        }
        match result {
            Ok(note) => {
                log::info!("{action} {} done", note.id);
                self.book.update(|b| {
                    if created {
                        b.insert_created(note);
                    } else {
                        b.apply_updated(note);
                    }
                });
                self.error.set(None);
            }
            Err(e) => self.report(action, e),
        }
        self.saving.set(false);
    }

    pub fn delete(&self, id: String) {
        if self.saving.get_untracked() {
            return;
        }
        let state = *self;
        let api = self.api.get_untracked();
        let generation = self.auth.generation();
        self.saving.set(true);

        spawn_local(async move {
            let result = api.delete_note(&id).await.into_result();
            state.finish_delete(generation, &id, result);
        });
    }

    pub(crate) fn finish_delete(&self, generation: u64, id: &str, result: ApiResult<()>) {
        if self.is_stale(generation, "delete note") {
            return;
        }
        match result {
            Ok(()) => {
                log::info!("deleted note {id}");
                self.book.update(|b| b.remove(id));
                self.error.set(None);
            }
            Err(e) => self.report("delete note", e),
        }
        self.saving.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, title: &str, updated_at: &str) -> Note {
        Note {
            id: id.to_string(),
            title: title.to_string(),
            content: format!("{title} body"),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    fn ids(book: &NoteBook) -> Vec<&str> {
        book.notes.iter().map(|n| n.id.as_str()).collect()
    }

    fn loaded() -> NoteBook {
        let mut book = NoteBook::default();
        book.replace_all(vec![
            note("a", "Alpha", "2024-03-01T10:00:00Z"),
            note("c", "Gamma", "2024-03-03T10:00:00Z"),
            note("b", "Beta", "2024-03-02T10:00:00Z"),
        ]);
        book
    }

    #[test]
    fn test_replace_all_sorts_and_selects_first() {
        let book = loaded();
        assert_eq!(ids(&book), vec!["c", "b", "a"]);
        assert_eq!(book.active_id.as_deref(), Some("c"));
        assert_eq!(book.draft.title, "Gamma");
        assert!(!book.is_dirty());
    }

    #[test]
    fn test_replace_all_keeps_existing_selection_and_draft() {
        let mut book = loaded();
        book.select("a");
        book.draft.content = "edited".to_string();

        book.replace_all(vec![
            note("a", "Alpha", "2024-03-01T10:00:00Z"),
            note("d", "Delta", "2024-03-04T10:00:00Z"),
        ]);
        assert_eq!(ids(&book), vec!["d", "a"]);
        assert_eq!(book.active_id.as_deref(), Some("a"));
        assert_eq!(book.draft.content, "edited");
    }

    #[test]
    fn test_replace_all_empty_clears_selection() {
        let mut book = loaded();
        book.select("a");
        book.replace_all(vec![]);
        assert!(book.active_id.is_none());
        assert_eq!(book.draft, NoteDraft::default());
        assert!(!book.is_editing());
    }

    #[test]
    fn test_select_loads_draft() {
        let mut book = loaded();
        book.select("b");
        assert_eq!(book.active_id.as_deref(), Some("b"));
        assert_eq!(book.draft.title, "Beta");
        assert_eq!(book.draft.content, "Beta body");

        book.select("missing");
        assert_eq!(book.active_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_insert_created_prepends_and_activates() {
        let mut book = loaded();
        book.start_new();
        assert!(book.active_id.is_none());
        assert!(book.is_editing());

        book.insert_created(note("n", "New", "2024-03-05T10:00:00Z"));
        assert_eq!(ids(&book), vec!["n", "c", "b", "a"]);
        assert_eq!(book.active_id.as_deref(), Some("n"));
        assert!(!book.composing);
        assert_eq!(book.draft.title, "New");
    }

    #[test]
    fn test_apply_updated_resorts_and_refreshes_active_draft() {
        let mut book = loaded();
        book.select("a");
        book.draft.title = "Alpha 2".to_string();
        assert!(book.is_dirty());

        book.apply_updated(note("a", "Alpha 2", "2024-03-06T10:00:00Z"));
        assert_eq!(ids(&book), vec!["a", "c", "b"]);
        assert_eq!(book.draft.title, "Alpha 2");
        assert!(!book.is_dirty());
    }

    #[test]
    fn test_apply_updated_other_note_leaves_draft() {
        let mut book = loaded();
        book.draft.content = "typing".to_string();
        book.apply_updated(note("b", "Beta", "2024-03-09T10:00:00Z"));
        assert_eq!(ids(&book), vec!["b", "c", "a"]);
        assert_eq!(book.active_id.as_deref(), Some("c"));
        assert_eq!(book.draft.content, "typing");
    }

    #[test]
    fn test_remove_active_promotes_first_remaining() {
        let mut book = loaded();
        book.select("b");
        book.remove("b");
        assert_eq!(ids(&book), vec!["c", "a"]);
        assert_eq!(book.active_id.as_deref(), Some("c"));
        assert_eq!(book.draft.title, "Gamma");
    }

    #[test]
    fn test_remove_inactive_keeps_selection() {
        let mut book = loaded();
        book.remove("a");
        assert_eq!(book.active_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_remove_last_clears_editor() {
        let mut book = NoteBook::default();
        book.replace_all(vec![note("only", "Only", "2024-03-01T10:00:00Z")]);
        book.remove("only");
        assert!(book.notes.is_empty());
        assert!(book.active_id.is_none());
        assert_eq!(book.draft, NoteDraft::default());
    }

    #[test]
    fn test_dirty_when_composing() {
        let mut book = loaded();
        book.start_new();
        assert!(!book.is_dirty());
        book.draft.content = "x".to_string();
        assert!(book.is_dirty());
    }

    #[test]
    fn test_filtered_matches_title_and_content_case_insensitive() {
        let mut book = loaded();
        book.apply_updated(Note {
            content: "Remember the MILK".to_string(),
            ..note("a", "Alpha", "2024-03-01T10:00:00Z")
        });

        let hits: Vec<_> = book.filtered("milk").into_iter().map(|n| n.id).collect();
        assert_eq!(hits, vec!["a"]);

        let hits: Vec<_> = book.filtered("BETA").into_iter().map(|n| n.id).collect();
        assert_eq!(hits, vec!["b"]);

        assert_eq!(book.filtered("   ").len(), 3);
        assert!(book.filtered("zzz").is_empty());
    }

    #[test]
    fn test_draft_input_defaults_blank_title() {
        let mut book = NoteBook::default();
        book.start_new();
        book.draft.title = "  ".to_string();
        book.draft.content = "body".to_string();
        let input = book.draft_input();
        assert_eq!(input.title, UNTITLED);
        assert_eq!(input.content, "body");
    }

    #[test]
    fn test_filtered_ignores_draft_edits() {
        let mut book = loaded();
        let before = book.filtered("");
        book.draft.title = "Gamma, retitled".to_string();
        book.draft.content = "new body".to_string();
        assert_eq!(book.filtered(""), before);
        assert!(book.filtered("retitled").is_empty());
    }

    #[test]
    fn test_pending_save_requires_changes() {
        let mut book = loaded();
        assert!(book.pending_save().is_none());

        book.start_new();
        assert!(book.pending_save().is_none());

        book.draft.content = "first line".to_string();
        let (target, input) = book.pending_save().expect("composed draft should be saved");
        assert!(target.is_none());
        assert_eq!(input.title, UNTITLED);
        assert_eq!(input.content, "first line");
    }

    #[test]
    fn test_pending_save_targets_active_note() {
        let mut book = loaded();
        book.select("b");
        book.draft.title = "Beta v2".to_string();
        let (target, input) = book.pending_save().expect("edited note should be saved");
        assert_eq!(target.as_deref(), Some("b"));
        assert_eq!(input.title, "Beta v2");

        book.draft.title = "Beta".to_string();
        assert!(book.pending_save().is_none());
    }
}

// WASM-only tests (run with `cargo test --target wasm32-unknown-unknown` + wasm-bindgen-test-runner)
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::models::{AuthResponse, User};
    use crate::state::auth::SESSION_EXPIRED;
    use crate::storage::clear_session;
    use reqwest::StatusCode;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sign_in(auth: &AuthState, email: &str) {
        auth.finish_submit(Ok(AuthResponse {
            token: format!("token-{email}"),
            user: User {
                id: email.to_string(),
                email: email.to_string(),
            },
        }));
    }

    fn signed_in(email: &str) -> (AuthState, NotesState) {
        // Unroutable base URL: these tests only feed completions in by hand.
        let api = RwSignal::new(ApiClient::new("http://127.0.0.1:9"));
        let auth = AuthState::new(api);
        sign_in(&auth, email);
        (auth, NotesState::new(api, auth))
    }

    fn note(id: &str, updated_at: &str) -> Note {
        Note {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            created_at: updated_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    fn ids(notes: &NotesState) -> Vec<String> {
        notes
            .book
            .with_untracked(|b| b.notes.iter().map(|n| n.id.clone()).collect())
    }

    #[wasm_bindgen_test]
    fn test_load_from_previous_session_is_dropped() {
        let (auth, notes) = signed_in("a@example.com");
        let first = auth.generation();
        notes.loading.set(true);

        // A signs out and B signs in while A's list request is still pending.
        notes.reset();
        auth.logout();
        sign_in(&auth, "b@example.com");
        let second = auth.generation();
        notes.loading.set(true);

        notes.finish_load(first, Ok(vec![note("a-note", "2024-03-01T10:00:00Z")]));
        assert!(ids(&notes).is_empty());
        assert!(notes.loading.get_untracked());

        notes.finish_load(second, Ok(vec![note("b-note", "2024-03-01T10:00:00Z")]));
        assert_eq!(ids(&notes), vec!["b-note"]);
        assert!(!notes.loading.get_untracked());

        clear_session();
    }

    #[wasm_bindgen_test]
    fn test_unauthorized_expires_session() {
        let (auth, notes) = signed_in("a@example.com");
        let generation = auth.generation();
        notes.finish_load(generation, Ok(vec![note("n1", "2024-03-01T10:00:00Z")]));

        notes.saving.set(true);
        notes.finish_save(
            generation,
            false,
            Err(ApiError::from_status(StatusCode::UNAUTHORIZED, "")),
        );

        assert!(auth.session.get_untracked().is_none());
        assert_eq!(auth.error.get_untracked().as_deref(), Some(SESSION_EXPIRED));
        assert!(notes.api.get_untracked().token.is_none());
        assert!(ids(&notes).is_empty());
        assert!(!notes.saving.get_untracked());
    }

    #[wasm_bindgen_test]
    fn test_failure_shows_server_text_and_keeps_session() {
        let (auth, notes) = signed_in("a@example.com");
        let generation = auth.generation();
        notes.finish_load(generation, Ok(vec![note("n1", "2024-03-01T10:00:00Z")]));

        notes.saving.set(true);
        notes.finish_delete(
            generation,
            "n1",
            Err(ApiError::from_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":"database unavailable"}"#,
            )),
        );

        assert_eq!(notes.error.get_untracked().as_deref(), Some("database unavailable"));
        assert_eq!(ids(&notes), vec!["n1"]);
        assert!(auth.session.get_untracked().is_some());
        assert!(!notes.saving.get_untracked());

        clear_session();
    }

    #[wasm_bindgen_test]
    fn test_delete_ignored_while_save_in_flight() {
        let (auth, notes) = signed_in("a@example.com");
        let generation = auth.generation();
        notes.finish_load(generation, Ok(vec![note("n1", "2024-03-01T10:00:00Z")]));

        notes.saving.set(true);
        notes.delete("n1".to_string());
        assert!(notes.saving.get_untracked());

        notes.finish_save(generation, false, Ok(note("n1", "2024-03-02T10:00:00Z")));
        assert_eq!(ids(&notes), vec!["n1"]);
        assert!(!notes.saving.get_untracked());

        clear_session();
    }

    #[wasm_bindgen_test]
    fn test_created_note_becomes_active() {
        let (auth, notes) = signed_in("a@example.com");
        let generation = auth.generation();
        notes.finish_load(generation, Ok(vec![note("old", "2024-03-01T10:00:00Z")]));
        notes.start_new();

        notes.saving.set(true);
        notes.finish_save(generation, true, Ok(note("new", "2024-03-02T10:00:00Z")));

        assert_eq!(ids(&notes), vec!["new", "old"]);
        assert!(notes.book.with_untracked(|b| b.is_active("new")));
        assert!(!notes.saving.get_untracked());

        clear_session();
    }
}
