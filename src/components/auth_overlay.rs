use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Card, CardContent,
    CardDescription, CardFooter, CardHeader, CardTitle, Input, Label, Spinner,
};
use crate::state::{AppContext, AuthMode};
use leptos::prelude::*;

/// Sign-in / registration form shown over the app while there is no session.
#[component]
pub fn AuthOverlay() -> impl IntoView {
    let auth = expect_context::<AppContext>().0.auth;

    let email: RwSignal<String> = RwSignal::new(String::new());
    let password: RwSignal<String> = RwSignal::new(String::new());
    let confirm: RwSignal<String> = RwSignal::new(String::new());

    let is_register = move || auth.mode.get() == AuthMode::Register;
    let pending = auth.pending;

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        auth.submit(
            email.get_untracked(),
            password.get_untracked(),
            confirm.get_untracked(),
        );
    };

    let on_toggle = move |_| {
        confirm.set(String::new());
        auth.toggle_mode();
    };

    view! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-background/80 px-4 backdrop-blur-sm">
            <Card class="w-full max-w-md">
                <CardHeader>
                    <CardTitle class="text-xl">
                        {move || if is_register() { "Create account" } else { "Sign in" }}
                    </CardTitle>
                    <CardDescription>
                        {move || if is_register() {
                            "Register with your email to start taking notes."
                        } else {
                            "Welcome back. Sign in to see your notes."
                        }}
                    </CardDescription>
                </CardHeader>

                <CardContent>
                    <form class="flex flex-col gap-4" on:submit=on_submit>
                        <div class="flex flex-col gap-2">
                            <Label html_for="email">"Email"</Label>
                            <Input
                                id="email"
                                r#type="email"
                                placeholder="you@example.com"
                                value=email
                                on_value=move |v: String| email.set(v)
                                required=true
                                autofocus=true
                            />
                        </div>

                        <div class="flex flex-col gap-2">
                            <Label html_for="password">"Password"</Label>
                            <Input
                                id="password"
                                r#type="password"
                                placeholder="••••••••"
                                value=password
                                on_value=move |v: String| password.set(v)
                                required=true
                            />
                        </div>

                        <Show when=is_register fallback=|| ().into_view()>
                            <div class="flex flex-col gap-2">
                                <Label html_for="confirm_password">"Confirm password"</Label>
                                <Input
                                    id="confirm_password"
                                    r#type="password"
                                    placeholder="••••••••"
                                    value=confirm
                                    on_value=move |v: String| confirm.set(v)
                                    required=true
                                />
                            </div>
                        </Show>

                        <Show when=move || auth.error.get().is_some() fallback=|| ().into_view()>
                            {move || {
                                auth.error.get().map(|e| view! {
                                    <Alert class="border-destructive/30">
                                        <AlertDescription class="text-destructive">{e}</AlertDescription>
                                    </Alert>
                                })
                            }}
                        </Show>

                        <Button class="w-full" attr:disabled=move || pending.get()>
                            <span class="inline-flex items-center gap-2">
                                <Show when=move || pending.get() fallback=|| ().into_view()>
                                    <Spinner />
                                </Show>
                                {move || match (pending.get(), is_register()) {
                                    (true, true) => "Creating...",
                                    (true, false) => "Signing in...",
                                    (false, true) => "Create account",
                                    (false, false) => "Sign in",
                                }}
                            </span>
                        </Button>
                    </form>
                </CardContent>

                <CardFooter class="justify-between">
                    <div class="text-xs text-muted-foreground">
                        {move || if is_register() { "Already have an account? " } else { "No account? " }}
                    </div>
                    <Button
                        variant=ButtonVariant::Link
                        size=ButtonSize::Sm
                        on:click=on_toggle
                    >
                        {move || if is_register() { "Sign in" } else { "Create one" }}
                    </Button>
                </CardFooter>
            </Card>
        </div>
    }
}
