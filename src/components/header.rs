use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::state::AppContext;
use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppContext>().0;

    let email = move || {
        state
            .auth
            .session
            .with(|s| s.as_ref().map(|s| s.user.email.clone()))
            .unwrap_or_default()
    };

    view! {
        <header class="flex h-12 shrink-0 items-center justify-between border-b px-4">
            <div class="flex items-baseline gap-2">
                <span class="text-sm font-semibold">"Quillnote"</span>
                <span class="hidden text-xs text-muted-foreground sm:inline">"Notes, synced."</span>
            </div>

            <Show when=move || state.auth.is_authenticated() fallback=|| ().into_view()>
                <div class="flex items-center gap-3">
                    <span class="truncate text-xs text-muted-foreground">{email}</span>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| state.logout()
                    >
                        "Sign out"
                    </Button>
                </div>
            </Show>
        </header>
    }
}
