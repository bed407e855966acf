pub(crate) mod auth;
pub(crate) mod notes;

use crate::api::{ApiClient, EnvConfig};
use leptos::prelude::*;

pub(crate) use auth::{AuthMode, AuthState};
pub(crate) use notes::NotesState;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub auth: AuthState,
    pub notes: NotesState,
}

impl AppState {
    pub fn new() -> Self {
        let config = EnvConfig::new();
        log::debug!("using API at {}", config.api_url);

        let api_client = RwSignal::new(ApiClient::from_config(&config));
        let auth = AuthState::new(api_client);
        auth.restore();
        let notes = NotesState::new(api_client, auth);

        Self { auth, notes }
    }

    pub fn logout(&self) {
        self.notes.reset();
        self.auth.logout();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
