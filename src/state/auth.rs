use crate::api::{ApiClient, ApiResult};
use crate::models::{AuthResponse, AuthSession};
use crate::storage::{clear_session, load_session, save_session};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) const SESSION_EXPIRED: &str = "Session expired. Please sign in again.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum AuthMode {
    #[default]
    SignIn,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::Register,
            Self::Register => Self::SignIn,
        }
    }
}

/// Checks done before any request leaves the browser.
pub(crate) fn validate_credentials(
    mode: AuthMode,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err("Email is required");
    }
    if password.is_empty() {
        return Err("Password is required");
    }
    if mode == AuthMode::Register && password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

#[derive(Clone, Copy)]
pub(crate) struct AuthState {
    pub session: RwSignal<Option<AuthSession>>,
    pub pending: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
    pub mode: RwSignal<AuthMode>,
    /// Bumped on every sign-in and sign-out.
    generation: RwSignal<u64>,
    api: RwSignal<ApiClient>,
}

impl AuthState {
    pub fn new(api: RwSignal<ApiClient>) -> Self {
        Self {
            session: RwSignal::new(None),
            pending: RwSignal::new(false),
            error: RwSignal::new(None),
            mode: RwSignal::new(AuthMode::SignIn),
            generation: RwSignal::new(0),
            api,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.with(Option::is_some)
    }

    pub fn generation(&self) -> u64 {
        self.generation.get_untracked()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.get_untracked() == generation
    }

    /// Populate the session from localStorage. Never touches the network.
    pub fn restore(&self) -> bool {
        let Some(session) = load_session() else {
            return false;
        };
        log::debug!("restored session for {}", session.user.email);
        self.establish(session, false);
        true
    }

    fn establish(&self, session: AuthSession, persist: bool) {
        if persist {
            save_session(&session);
        }
        let token = session.token.clone();
        self.api.update(|c| c.set_token(token));
        self.generation.update(|g| *g += 1);
        self.error.set(None);
        self.session.set(Some(session));
    }

    pub fn toggle_mode(&self) {
        self.mode.update(|m| *m = m.toggled());
        self.error.set(None);
    }

    pub fn submit(&self, email: String, password: String, confirm: String) {
        if self.pending.get_untracked() {
            return;
        }
        let mode = self.mode.get_untracked();
        if let Err(msg) = validate_credentials(mode, &email, &password, &confirm) {
            self.error.set(Some(msg.to_string()));
            return;
        }

        let state = *self;
        let api = self.api.get_untracked();
        self.pending.set(true);
        self.error.set(None);

        spawn_local(async move {
            let response = match mode {
                AuthMode::SignIn => api.login(&email, &password).await,
                AuthMode::Register => api.register(&email, &password).await,
            };
            state.finish_submit(response.into_result());
        });
    }

    /// A failure leaves token and user unset and shows the server's text.
    pub(crate) fn finish_submit(&self, result: ApiResult<AuthResponse>) {
        match result {
            Ok(r) => {
                log::info!("signed in as {}", r.user.email);
                self.establish(r.into(), true);
            }
            Err(e) => {
                log::warn!("{:?} failed: {e}", self.mode.get_untracked());
                self.error.set(Some(e.to_string()));
            }
        }
        self.pending.set(false);
    }

    pub fn logout(&self) {
        clear_session();
        self.api.update(ApiClient::clear_token);
        self.generation.update(|g| *g += 1);
        self.session.set(None);
        self.error.set(None);
        log::info!("signed out");
    }

    /// Drop a session the server rejected.
    pub fn expire(&self) {
        self.logout();
        self.mode.set(AuthMode::SignIn);
        self.error.set(Some(SESSION_EXPIRED.to_string()));
    }
}
