use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// Parsed `updated_at`, `None` when the server sent something that is not RFC 3339.
    pub fn updated_ts(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(self.updated_at.trim()).ok()
    }
}

/// Body of `POST /notes` and `PUT /notes/:id`. Id and timestamps are server-assigned.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct NoteInput {
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct User {
    /// Backends disagree on numeric vs string ids; we always keep a string.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthCredentials {
    pub email: String,
    pub password: String,
}

/// Response of both `/auth/login` and `/auth/register`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: User,
}

impl From<AuthResponse> for AuthSession {
    fn from(r: AuthResponse) -> Self {
        Self {
            token: r.token,
            user: r.user,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
