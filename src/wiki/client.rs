//! MediaWiki Action API client.
//!
//! Holds the single authenticated session for a run: the cookie jar lives
//! inside the `reqwest::Client`, the CSRF token next to it.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::WikiApi;
use super::types::{
    AuthError, Credentials, PublishError, RemoteDocument, TokenKind, api_url, parse_edit,
    parse_login, parse_token,
};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("wikisync/", env!("CARGO_PKG_VERSION"));

/// Client for one wiki, owning its session state.
pub struct MediaWikiClient {
    client: Client,
    api_url: String,
    csrf_token: Option<String>,
}

impl MediaWikiClient {
    /// Create an unauthenticated client for the wiki at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url(endpoint),
            csrf_token: None,
        })
    }

    /// Whether `login` has completed and a CSRF token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.csrf_token.is_some()
    }

    /// POST a form to the API and return the status and body text.
    async fn post_form(
        &self,
        params: &[(&str, &str)],
    ) -> Result<(reqwest::StatusCode, String), reqwest::Error> {
        let response = self.client.post(&self.api_url).form(params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    async fn fetch_token(&self, kind: TokenKind) -> Result<String, AuthError> {
        let mut params = vec![("action", "query"), ("meta", "tokens"), ("format", "json")];
        if kind == TokenKind::Login {
            params.push(("type", "login"));
        }

        let (status, body) = self.post_form(&params).await?;
        if !status.is_success() {
            return Err(AuthError::TokenUnavailable(format!(
                "{} token request returned HTTP {status}",
                kind.name()
            )));
        }
        parse_token(&body, kind)
    }
}

impl WikiApi for MediaWikiClient {
    async fn login(&mut self, credentials: &Credentials) -> Result<(), AuthError> {
        info!(url = %self.api_url, user = %credentials.username, "Logging into wiki");

        let login_token = self.fetch_token(TokenKind::Login).await?;
        debug!("Login token obtained");

        let (status, body) = self
            .post_form(&[
                ("action", "login"),
                ("lgname", credentials.username.as_str()),
                ("lgpassword", credentials.secret.as_str()),
                ("lgtoken", login_token.as_str()),
                ("format", "json"),
            ])
            .await?;
        if !status.is_success() {
            return Err(AuthError::LoginRejected(format!("HTTP {status}")));
        }
        parse_login(&body)?;
        info!("Logged in");

        let csrf = self.fetch_token(TokenKind::Csrf).await?;
        self.csrf_token = Some(csrf);
        debug!("CSRF token obtained");
        Ok(())
    }

    async fn publish(&self, document: &RemoteDocument) -> Result<(), PublishError> {
        let token = self
            .csrf_token
            .as_deref()
            .ok_or(PublishError::NotAuthenticated)?;

        debug!(title = %document.title, bytes = document.text.len(), "Submitting edit");

        let (status, body) = self
            .post_form(&[
                ("action", "edit"),
                ("title", document.title.as_str()),
                ("text", document.text.as_str()),
                ("summary", document.summary.as_str()),
                ("token", token),
                ("format", "json"),
            ])
            .await?;

        if !status.is_success() {
            return Err(PublishError::Status(status.as_u16()));
        }
        parse_edit(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router};
    use axum::extract::{Form, State};
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const LOGIN_TOKEN: &str = "login+token\\";
    const CSRF_TOKEN: &str = "csrf+token\\";
    const SESSION_COOKIE: &str = "wikisession=abc123";

    /// One request as the fake wiki saw it.
    #[derive(Debug, Clone)]
    struct Seen {
        params: HashMap<String, String>,
        cookie: Option<String>,
    }

    impl Seen {
        fn param(&self, name: &str) -> Option<&str> {
            self.params.get(name).map(String::as_str)
        }
    }

    /// Minimal `api.php` that checks tokens and the session cookie.
    #[derive(Clone, Default)]
    struct FakeWiki {
        seen: Arc<Mutex<Vec<Seen>>>,
        token_error: bool,
        login_status: Option<StatusCode>,
        edit_status: Option<StatusCode>,
    }

    impl FakeWiki {
        fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }

        fn actions(&self) -> Vec<String> {
            self.seen()
                .iter()
                .map(|s| s.param("action").unwrap_or_default().to_string())
                .collect()
        }
    }

    async fn api(
        State(wiki): State<FakeWiki>,
        headers: HeaderMap,
        Form(params): Form<HashMap<String, String>>,
    ) -> Response {
        let cookie = headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let seen = Seen { params, cookie };
        wiki.seen.lock().unwrap().push(seen.clone());

        match seen.param("action") {
            Some("query") if wiki.token_error => Json(json!({
                "error": { "code": "internal", "info": "token service down" }
            }))
            .into_response(),
            Some("query") if seen.param("type") == Some("login") => (
                [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
                Json(json!({ "query": { "tokens": { "logintoken": LOGIN_TOKEN } } })),
            )
                .into_response(),
            Some("query") => {
                Json(json!({ "query": { "tokens": { "csrftoken": CSRF_TOKEN } } })).into_response()
            }
            Some("login") => {
                if let Some(status) = wiki.login_status {
                    return (status, "login unavailable").into_response();
                }
                let accepted = seen.param("lgtoken") == Some(LOGIN_TOKEN)
                    && seen.param("lgname") == Some("bot")
                    && seen.param("lgpassword") == Some("pw");
                if accepted {
                    Json(json!({ "login": { "result": "Success" } })).into_response()
                } else {
                    Json(json!({ "login": { "result": "Failed", "reason": "bad credentials" } }))
                        .into_response()
                }
            }
            Some("edit") => {
                if let Some(status) = wiki.edit_status {
                    return (status, "server exploded").into_response();
                }
                if seen.param("token") != Some(CSRF_TOKEN) {
                    return Json(json!({
                        "error": { "code": "badtoken", "info": "Invalid CSRF token." }
                    }))
                    .into_response();
                }
                if !seen.cookie.as_deref().is_some_and(|c| c.contains(SESSION_COOKIE)) {
                    return Json(json!({
                        "error": { "code": "permissiondenied", "info": "Not logged in." }
                    }))
                    .into_response();
                }
                Json(json!({ "edit": { "result": "Success" } })).into_response()
            }
            _ => (StatusCode::BAD_REQUEST, "unknown action").into_response(),
        }
    }

    /// Serve `wiki` on an ephemeral port and return its base URL.
    async fn serve(wiki: FakeWiki) -> String {
        let app = Router::new().route("/api.php", post(api)).with_state(wiki);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn document() -> RemoteDocument {
        RemoteDocument {
            title: "Setup Guide".into(),
            text: "== Setup ==\nInstall it.".into(),
            summary: "Synced from Setup_Guide.mediawiki".into(),
        }
    }

    #[test]
    fn test_client_builds_api_url() {
        let client = MediaWikiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.api_url, "http://localhost:8080/api.php");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_publish_before_login_is_rejected() {
        let client = MediaWikiClient::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(
            client.publish(&document()).await,
            Err(PublishError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_login_against_unreachable_server_is_transport_error() {
        let mut client = MediaWikiClient::new("http://127.0.0.1:9").unwrap();
        let creds = Credentials::new("http://127.0.0.1:9", "bot", "pw");
        let err = client.login(&creds).await.unwrap_err();
        assert!(matches!(err, AuthError::Transport(_)));
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_and_publish_request_sequence() {
        let wiki = FakeWiki::default();
        let url = serve(wiki.clone()).await;
        let mut client = MediaWikiClient::new(&url).unwrap();

        client.login(&Credentials::new(&url, "bot", "pw")).await.unwrap();
        assert!(client.is_authenticated());
        client.publish(&document()).await.unwrap();

        assert_eq!(wiki.actions(), vec!["query", "login", "query", "edit"]);
        let seen = wiki.seen();

        assert_eq!(seen[0].param("meta"), Some("tokens"));
        assert_eq!(seen[0].param("type"), Some("login"));

        assert_eq!(seen[1].param("lgname"), Some("bot"));
        assert_eq!(seen[1].param("lgpassword"), Some("pw"));
        assert_eq!(seen[1].param("lgtoken"), Some(LOGIN_TOKEN));

        assert_eq!(seen[2].param("meta"), Some("tokens"));
        assert_eq!(seen[2].param("type"), None);

        let edit = &seen[3];
        assert_eq!(edit.param("title"), Some("Setup Guide"));
        assert_eq!(edit.param("text"), Some("== Setup ==\nInstall it."));
        assert_eq!(edit.param("summary"), Some("Synced from Setup_Guide.mediawiki"));
        assert_eq!(edit.param("token"), Some(CSRF_TOKEN));
        assert_eq!(edit.param("format"), Some("json"));
        assert!(edit.cookie.as_deref().is_some_and(|c| c.contains(SESSION_COOKIE)));
    }

    #[tokio::test]
    async fn test_token_error_payload_is_token_unavailable() {
        let wiki = FakeWiki {
            token_error: true,
            ..FakeWiki::default()
        };
        let url = serve(wiki.clone()).await;
        let mut client = MediaWikiClient::new(&url).unwrap();

        let err = client
            .login(&Credentials::new(&url, "bot", "pw"))
            .await
            .unwrap_err();

        match err {
            AuthError::TokenUnavailable(reason) => assert!(reason.contains("token service down")),
            other => panic!("expected TokenUnavailable, got {other:?}"),
        }
        assert_eq!(wiki.actions(), vec!["query"]);
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_http_error_is_rejected() {
        let wiki = FakeWiki {
            login_status: Some(StatusCode::SERVICE_UNAVAILABLE),
            ..FakeWiki::default()
        };
        let url = serve(wiki.clone()).await;
        let mut client = MediaWikiClient::new(&url).unwrap();

        let err = client
            .login(&Credentials::new(&url, "bot", "pw"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::LoginRejected(_)));
        assert_eq!(wiki.actions(), vec!["query", "login"]);
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn test_wrong_password_is_rejected_with_reason() {
        let wiki = FakeWiki::default();
        let url = serve(wiki.clone()).await;
        let mut client = MediaWikiClient::new(&url).unwrap();

        let err = client
            .login(&Credentials::new(&url, "bot", "wrong"))
            .await
            .unwrap_err();

        match err {
            AuthError::LoginRejected(reason) => assert!(reason.contains("bad credentials")),
            other => panic!("expected LoginRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_edit_server_error_is_status() {
        let wiki = FakeWiki {
            edit_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            ..FakeWiki::default()
        };
        let url = serve(wiki.clone()).await;
        let mut client = MediaWikiClient::new(&url).unwrap();
        client.login(&Credentials::new(&url, "bot", "pw")).await.unwrap();

        let err = client.publish(&document()).await.unwrap_err();

        assert!(matches!(err, PublishError::Status(500)));
    }
}
