use crate::models::{AuthCredentials, AuthResponse, Note, NoteInput};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("{message}")]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: format!("Network error: {e}"),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: format!("Unexpected response: {e}"),
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let kind = if status == StatusCode::UNAUTHORIZED {
            ApiErrorKind::Unauthorized
        } else {
            ApiErrorKind::Http
        };
        Self {
            kind,
            message: server_error_message(status, body),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Uniform outcome of every HTTP call: `ok` plus exactly one of `data` / `error`.
#[derive(Clone, Debug)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> ApiResult<T> {
        match (self.ok, self.data, self.error) {
            (true, Some(data), _) => Ok(data),
            (_, _, Some(e)) => Err(e),
            _ => Err(ApiError::parse("response carried neither data nor error")),
        }
    }
}

impl<T> From<ApiResult<T>> for ApiResponse<T> {
    fn from(r: ApiResult<T>) -> Self {
        match r {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(e),
        }
    }
}

/// Pick the text the user should see for a failed request.
///
/// Prefers a JSON `error` or `message` field, then the raw body, then the status.
pub(crate) fn server_error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        let field = ["error", "message"]
            .iter()
            .find_map(|k| v.get(*k).and_then(|m| m.as_str()))
            .map(str::trim)
            .filter(|m| !m.is_empty());
        if let Some(m) = field {
            return m.to_string();
        }
    }

    if !body.is_empty() && !body.starts_with('{') {
        return body.to_string();
    }

    format!("Request failed ({status})")
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8080".to_string();

        // `window.ENV.API_URL` is the documented key; `api_url` is still honored.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    for key in ["API_URL", "api_url"] {
                        if let Ok(api_url) = js_sys::Reflect::get(&env, &key.into()) {
                            if let Some(url_str) = api_url.as_string() {
                                return Self { api_url: url_str };
                            }
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub(crate) fn get_auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn note_path(id: &str) -> String {
        format!("/notes/{}", urlencoding::encode(id))
    }

    fn build(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = reqwest::Client::new().request(method, self.url(path));
        if let Some(header) = self.get_auth_header() {
            req = req.header("Authorization", header);
        }
        req
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<reqwest::Response> {
        let mut req = self.build(method.clone(), path);
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        log::warn!("{method} {path} failed with {status}");
        Err(ApiError::from_status(status, &body))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResponse<T> {
        let result = match self.send(method, path, body).await {
            Ok(res) => res.json::<T>().await.map_err(ApiError::parse),
            Err(e) => Err(e),
        };
        result.into()
    }

    async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResponse<()> {
        self.send(method, path, body).await.map(|_| ()).into()
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<AuthResponse> {
        self.request(Method::POST, "/auth/login", Some(&credentials(email, password)))
            .await
    }

    pub async fn register(&self, email: &str, password: &str) -> ApiResponse<AuthResponse> {
        self.request(Method::POST, "/auth/register", Some(&credentials(email, password)))
            .await
    }

    pub async fn list_notes(&self) -> ApiResponse<Vec<Note>> {
        self.request(Method::GET, "/notes", None::<&()>).await
    }

    pub async fn create_note(&self, input: &NoteInput) -> ApiResponse<Note> {
        self.request(Method::POST, "/notes", Some(input)).await
    }

    pub async fn update_note(&self, id: &str, input: &NoteInput) -> ApiResponse<Note> {
        self.request(Method::PUT, &Self::note_path(id), Some(input))
            .await
    }

    pub async fn delete_note(&self, id: &str) -> ApiResponse<()> {
        self.request_empty(Method::DELETE, &Self::note_path(id), None::<&()>)
            .await
    }
}

fn credentials(email: &str, password: &str) -> AuthCredentials {
    AuthCredentials {
        email: email.trim().to_string(),
        password: password.to_string(),
    }
}
