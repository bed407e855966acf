use crate::pages::NotesPage;
use crate::state::{AppContext, AppState};
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    // Restores any stored session before the first render.
    provide_context(AppContext(AppState::new()));

    view! { <NotesPage /> }
}
