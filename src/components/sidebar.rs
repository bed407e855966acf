use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Spinner};
use crate::models::Note;
use crate::state::notes::UNTITLED;
use crate::state::{AppContext, NotesState};
use crate::util::{format_updated, preview};
use leptos::html;
use leptos::prelude::*;

#[component]
pub fn Sidebar(node_ref: NodeRef<html::Input>) -> impl IntoView {
    let notes = expect_context::<AppContext>().0.notes;
    let query = notes.search_query;

    // The book also carries the editor draft; the memo keeps keystrokes there
    // from re-rendering the list when the visible notes did not change.
    let visible = Memo::new(move |_| {
        let q = query.get();
        notes.book.with(|b| b.filtered(&q))
    });

    let empty_text = move || {
        if notes.loading.get() {
            "Loading notes..."
        } else if !query.get().trim().is_empty() {
            "No matching notes."
        } else {
            "No notes yet."
        }
    };

    view! {
        <aside class="flex w-72 shrink-0 flex-col gap-3 border-r p-3">
            <div class="flex items-center gap-2">
                <span class="sr-only">"Search"</span>
                <svg
                    xmlns="http://www.w3.org/2000/svg"
                    width="16"
                    height="16"
                    viewBox="0 0 24 24"
                    fill="none"
                    stroke="currentColor"
                    stroke-width="2"
                    stroke-linecap="round"
                    stroke-linejoin="round"
                    class="shrink-0 text-muted-foreground"
                    aria-hidden="true"
                >
                    <circle cx="11" cy="11" r="8"></circle>
                    <path d="m21 21-4.3-4.3"></path>
                </svg>

                <div class="min-w-0 flex-1">
                    <Input
                        node_ref=node_ref
                        r#type="search"
                        placeholder="Search…"
                        value=query
                        on_value=move |v: String| query.set(v)
                        class="h-8 text-sm"
                    />
                </div>

                <Button
                    variant=ButtonVariant::Ghost
                    size=ButtonSize::Icon
                    on:click=move |_| notes.start_new()
                    attr:title="New note"
                    class="h-8 w-8"
                >
                    <span class="text-sm text-muted-foreground">"+"</span>
                </Button>
            </div>

            <Show when=move || notes.error.get().is_some() fallback=|| ().into_view()>
                {move || notes.error.get().map(|e| view! {
                    <div class="text-[11px] text-destructive">{e}</div>
                })}
            </Show>

            <Show when=move || notes.loading.get() fallback=|| ().into_view()>
                <div class="flex items-center gap-2 text-xs text-muted-foreground">
                    <Spinner />
                    "Syncing"
                </div>
            </Show>

            <div class="min-h-0 flex-1 overflow-y-auto">
                {move || {
                    let items = visible.get();
                    if items.is_empty() {
                        view! {
                            <div class="px-1 py-2 text-xs text-muted-foreground">{empty_text}</div>
                        }
                        .into_any()
                    } else {
                        view! {
                            <ul class="space-y-1">
                                {items
                                    .into_iter()
                                    .map(|note| view! { <NoteListItem notes=notes note=note /> })
                                    .collect_view()}
                            </ul>
                        }
                        .into_any()
                    }
                }}
            </div>
        </aside>
    }
}

#[component]
fn NoteListItem(notes: NotesState, note: Note) -> impl IntoView {
    let id = note.id.clone();
    let is_active = {
        let id = id.clone();
        move || notes.book.with(|b| b.is_active(&id))
    };

    let title = if note.title.trim().is_empty() {
        UNTITLED.to_string()
    } else {
        note.title.clone()
    };

    view! {
        <li>
            <button
                type="button"
                class=move || {
                    format!(
                        "block w-full rounded-md border px-3 py-2 text-left transition-colors {}",
                        if is_active() { "border-primary/40 bg-accent" } else { "border-transparent hover:bg-accent/50" },
                    )
                }
                on:click=move |_| notes.select(&id)
            >
                <div class="truncate text-sm font-medium">{title}</div>
                <div class="text-[11px] text-muted-foreground">{format_updated(&note.updated_at)}</div>
                <div class="min-h-[1rem] truncate text-xs text-muted-foreground">{preview(&note.content, 80)}</div>
            </button>
        </li>
    }
}
