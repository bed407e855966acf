use crate::models::{AuthSession, User};

pub(crate) const TOKEN_KEY: &str = "auth_token";
pub(crate) const USER_KEY: &str = "auth_user";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Restore rule for a persisted session: both parts must be present and valid.
pub(crate) fn session_from_parts(
    token: Option<String>,
    user_json: Option<String>,
) -> Option<AuthSession> {
    let token = token.filter(|t| !t.trim().is_empty())?;
    let user: User = serde_json::from_str(&user_json?).ok()?;
    Some(AuthSession { token, user })
}

pub(crate) fn save_session(session: &AuthSession) {
    let Some(storage) = local_storage() else {
        return;
    };
    if let Ok(json) = serde_json::to_string(&session.user) {
        let _ = storage.set_item(TOKEN_KEY, &session.token);
        let _ = storage.set_item(USER_KEY, &json);
    }
}

/// Read the persisted session. A half-written or corrupt pair is wiped.
pub(crate) fn load_session() -> Option<AuthSession> {
    let storage = local_storage()?;
    let token = storage.get_item(TOKEN_KEY).ok().flatten();
    let user_json = storage.get_item(USER_KEY).ok().flatten();
    let had_any = token.is_some() || user_json.is_some();

    let session = session_from_parts(token, user_json);
    if session.is_none() && had_any {
        log::debug!("discarding incomplete stored session");
        clear_session();
    }
    session
}

pub(crate) fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}
