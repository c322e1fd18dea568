//! Wire types and error types for the MediaWiki Action API.
//!
//! Every call returns JSON. The functions at the bottom of this module turn
//! a decoded body into the value the client needs (a token, a login verdict,
//! an edit verdict) so the interpretation rules can be tested without a
//! server.

use serde::Deserialize;
use thiserror::Error;

/// Maximum length for response bodies quoted in error messages.
const MAX_BODY_EXCERPT: usize = 500;

/// Login credentials for a wiki, supplied once at startup.
#[derive(Clone)]
pub struct Credentials {
    /// Base URL of the wiki (e.g. `http://localhost:8080`).
    pub endpoint: String,
    pub username: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            username: username.into(),
            secret: secret.into(),
        }
    }

    /// URL of the Action API entry point (`<base>/api.php`).
    #[must_use]
    pub fn api_url(&self) -> String {
        api_url(&self.endpoint)
    }
}

/// Action API entry point for a wiki base URL.
pub(crate) fn api_url(endpoint: &str) -> String {
    format!("{}/api.php", endpoint.trim_end_matches('/'))
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// A page edit about to be submitted. Built per publish, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDocument {
    pub title: String,
    pub text: String,
    pub summary: String,
}

/// Authentication failures. All of them are fatal for a run.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Token unavailable: {0}")]
    TokenUnavailable(String),

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Could not reach wiki: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures of a single page edit. Recoverable: the caller decides.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Not authenticated: login must succeed before publishing")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The wiki answered, but not with a 2xx status.
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Wiki rejected edit: {0}")]
    Remote(String),

    #[error("Unexpected response: {0}")]
    Unexpected(String),
}

// ============================================================================
// Response bodies
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl ApiError {
    fn describe(&self) -> String {
        match (&self.code, &self.info) {
            (_, Some(info)) => info.clone(),
            (Some(code), None) => code.clone(),
            (None, None) => "unknown error".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub query: Option<TokenQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenQuery {
    pub tokens: Tokens,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Tokens {
    #[serde(default)]
    pub logintoken: Option<String>,
    #[serde(default)]
    pub csrftoken: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub login: Option<LoginResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResult {
    pub result: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditResponse {
    #[serde(default)]
    pub error: Option<ApiError>,
    #[serde(default)]
    pub edit: Option<EditResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditResult {
    pub result: String,
}

/// Which token a token query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Login,
    Csrf,
}

impl TokenKind {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Csrf => "csrf",
        }
    }
}

// ============================================================================
// Interpretation
// ============================================================================

/// Shorten a body so error messages stay readable.
pub(crate) fn excerpt(body: &str) -> String {
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

/// Extract the requested token from a `meta=tokens` response body.
pub(crate) fn parse_token(body: &str, kind: TokenKind) -> Result<String, AuthError> {
    let response: TokenResponse = serde_json::from_str(body).map_err(|e| {
        AuthError::TokenUnavailable(format!("malformed {} token response: {e}", kind.name()))
    })?;

    if let Some(error) = response.error {
        return Err(AuthError::TokenUnavailable(error.describe()));
    }

    let tokens = response.query.map(|q| q.tokens);
    let token = match kind {
        TokenKind::Login => tokens.and_then(|t| t.logintoken),
        TokenKind::Csrf => tokens.and_then(|t| t.csrftoken),
    };

    token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::TokenUnavailable(format!("no {} token in response", kind.name())))
}

/// Check the body of an `action=login` response.
pub(crate) fn parse_login(body: &str) -> Result<(), AuthError> {
    let response: LoginResponse = serde_json::from_str(body)
        .map_err(|_| AuthError::LoginRejected(format!("malformed response: {}", excerpt(body))))?;

    if let Some(error) = response.error {
        return Err(AuthError::LoginRejected(error.describe()));
    }

    match response.login {
        Some(login) if login.result == "Success" => Ok(()),
        Some(login) => Err(AuthError::LoginRejected(match login.reason {
            Some(reason) => format!("{} ({reason})", login.result),
            None => login.result,
        })),
        None => Err(AuthError::LoginRejected(format!(
            "no login result in response: {}",
            excerpt(body)
        ))),
    }
}

/// Check the body of an `action=edit` response.
pub(crate) fn parse_edit(body: &str) -> Result<(), PublishError> {
    let Ok(response) = serde_json::from_str::<EditResponse>(body) else {
        return Err(PublishError::Unexpected(excerpt(body)));
    };

    if let Some(error) = response.error {
        return Err(PublishError::Remote(error.describe()));
    }

    match response.edit {
        Some(edit) if edit.result == "Success" => Ok(()),
        _ => Err(PublishError::Unexpected(excerpt(body))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let creds = Credentials::new("http://localhost:8080/", "bot", "pw");
        assert_eq!(creds.api_url(), "http://localhost:8080/api.php");
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials::new("http://wiki", "bot", "hunter2");
        let shown = format!("{creds:?}");
        assert!(shown.contains("bot"));
        assert!(!shown.contains("hunter2"));
    }

    #[test]
    fn test_parse_login_token() {
        let body = r#"{"batchcomplete":"","query":{"tokens":{"logintoken":"abc+\\"}}}"#;
        assert_eq!(parse_token(body, TokenKind::Login).unwrap(), "abc+\\");
    }

    #[test]
    fn test_parse_csrf_token() {
        let body = r#"{"query":{"tokens":{"csrftoken":"xyz+\\"}}}"#;
        assert_eq!(parse_token(body, TokenKind::Csrf).unwrap(), "xyz+\\");
    }

    #[test]
    fn test_parse_token_error_payload() {
        let body = r#"{"error":{"code":"badvalue","info":"Unrecognized value"}}"#;
        let err = parse_token(body, TokenKind::Login).unwrap_err();
        assert!(matches!(err, AuthError::TokenUnavailable(ref m) if m == "Unrecognized value"));
    }

    #[test]
    fn test_parse_token_missing_field() {
        let body = r#"{"query":{"tokens":{"csrftoken":"xyz"}}}"#;
        assert!(matches!(
            parse_token(body, TokenKind::Login),
            Err(AuthError::TokenUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_token_not_json() {
        assert!(matches!(
            parse_token("<html>oops</html>", TokenKind::Csrf),
            Err(AuthError::TokenUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_login_success() {
        let body = r#"{"login":{"result":"Success","lguserid":1,"lgusername":"Bot"}}"#;
        assert!(parse_login(body).is_ok());
    }

    #[test]
    fn test_parse_login_failed_keeps_reason() {
        let body = r#"{"login":{"result":"Failed","reason":"Incorrect password"}}"#;
        match parse_login(body) {
            Err(AuthError::LoginRejected(msg)) => {
                assert!(msg.contains("Failed"));
                assert!(msg.contains("Incorrect password"));
            }
            other => panic!("expected LoginRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_edit_success() {
        let body = r#"{"edit":{"result":"Success","pageid":12,"title":"Overview"}}"#;
        assert!(parse_edit(body).is_ok());
    }

    #[test]
    fn test_parse_edit_remote_error() {
        let body = r#"{"error":{"code":"badtoken","info":"Invalid CSRF token."}}"#;
        match parse_edit(body) {
            Err(PublishError::Remote(info)) => assert_eq!(info, "Invalid CSRF token."),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_edit_unrecognized_body() {
        assert!(matches!(
            parse_edit(r#"{"edit":{"result":"Failure"}}"#),
            Err(PublishError::Unexpected(_))
        ));
        assert!(matches!(parse_edit("{}"), Err(PublishError::Unexpected(_))));
        assert!(matches!(parse_edit("not json"), Err(PublishError::Unexpected(_))));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let body = "é".repeat(400);
        let short = excerpt(&body);
        assert!(short.contains("truncated"));
        assert!(short.len() < body.len());
    }
}
