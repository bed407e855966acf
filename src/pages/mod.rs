use crate::components::{AuthOverlay, Editor, Header, Sidebar};
use crate::state::AppContext;
use leptos::ev;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;

#[component]
pub fn NotesPage() -> impl IntoView {
    let state = expect_context::<AppContext>().0;
    let search_ref: NodeRef<html::Input> = NodeRef::new();

    // (Re)load the list whenever a session appears: on startup after a restore,
    // and after every sign-in.
    Effect::new(move |_| {
        if state.auth.is_authenticated() {
            state.notes.load();
        }
    });

    // Keyboard shortcuts:
    // - Cmd/Ctrl+S: save the note in the editor (also while typing)
    // - Cmd/Ctrl+K: focus search
    // - Esc: blur search
    let _key_handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        if !state.auth.session.with_untracked(Option::is_some) {
            return;
        }

        let is_meta = ev.meta_key() || ev.ctrl_key();
        let key = ev.key().to_lowercase();

        if is_meta && key == "s" {
            ev.prevent_default();
            state.notes.save();
            return;
        }

        if is_meta && key == "k" {
            ev.prevent_default();
            if let Some(input) = search_ref.get_untracked() {
                let _ = input.focus();
            }
            return;
        }

        if key == "escape" {
            if let Some(input) = search_ref.get_untracked() {
                let _ = input.blur();
            }
        }
    });

    view! {
        <div class="flex h-screen flex-col bg-background text-foreground">
            <Header />

            <div class="flex min-h-0 flex-1">
                <Sidebar node_ref=search_ref />
                <main class="flex min-w-0 flex-1">
                    <Editor />
                </main>
            </div>

            <Show when=move || !state.auth.is_authenticated() fallback=|| ().into_view()>
                <AuthOverlay />
            </Show>
        </div>
    }
}
