use crate::components::ui::{Button, ButtonSize, ButtonVariant, Input, Spinner, Textarea};
use crate::state::AppContext;
use leptos::prelude::*;

#[component]
pub fn Editor() -> impl IntoView {
    let notes = expect_context::<AppContext>().0.notes;
    let saving = notes.saving;

    let editing = move || notes.book.with(|b| b.is_editing());
    let dirty = move || notes.book.with(|b| b.is_dirty());
    let has_active = move || notes.book.with(|b| b.active_id.is_some());

    let title = Signal::derive(move || notes.book.with(|b| b.draft.title.clone()));
    let content = Signal::derive(move || notes.book.with(|b| b.draft.content.clone()));

    let status = move || {
        if saving.get() {
            "Saving…"
        } else if dirty() {
            "Unsaved changes"
        } else if has_active() {
            "Saved"
        } else {
            ""
        }
    };

    let on_delete = move |_| {
        if let Some(id) = notes.book.with_untracked(|b| b.active_id.clone()) {
            notes.delete(id);
        }
    };

    view! {
        <Show
            when=editing
            fallback=|| view! {
                <div class="flex flex-1 items-center justify-center text-xs text-muted-foreground">
                    "Select a note or create a new one."
                </div>
            }
        >
            <section class="flex flex-1 flex-col gap-3 p-6">
                <Input
                    id="note-title"
                    placeholder="Title"
                    value=title
                    on_value=move |v: String| notes.set_title(v)
                    disabled=saving
                    class="h-10 text-lg font-semibold"
                />

                <Textarea
                    id="note-content"
                    placeholder="Start writing…"
                    value=content
                    on_value=move |v: String| notes.set_content(v)
                    disabled=saving
                    class="flex-1 resize-none"
                />

                <div class="flex items-center justify-between">
                    <span class="text-xs text-muted-foreground">{status}</span>

                    <div class="flex items-center gap-2">
                        <Show when=has_active fallback=|| ().into_view()>
                            <Button
                                variant=ButtonVariant::Destructive
                                size=ButtonSize::Sm
                                attr:disabled=move || saving.get()
                                on:click=on_delete
                            >
                                "Delete"
                            </Button>
                        </Show>

                        <Button
                            size=ButtonSize::Sm
                            attr:disabled=move || saving.get() || !dirty()
                            attr:title="Save (⌘S)"
                            on:click=move |_| notes.save()
                        >
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || saving.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                "Save"
                            </span>
                        </Button>
                    </div>
                </div>
            </section>
        </Show>
    }
}
