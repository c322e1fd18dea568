//! Remote wiki access.
//!
//! - [`WikiApi`] - the two calls the sync engine needs (login, publish)
//! - [`MediaWikiClient`] - implementation over the MediaWiki Action API
//!
//! The protocol is form-encoded POSTs to `<base>/api.php` with JSON
//! responses. Login is a token handshake; every edit carries a CSRF token
//! obtained right after login.

mod client;
mod types;

pub use client::MediaWikiClient;
pub use types::{AuthError, Credentials, PublishError, RemoteDocument};

use std::future::Future;

/// Authenticated write access to a wiki.
///
/// Calls are sequential: one session per implementation, one request at a
/// time. Callers that need concurrency must serialize access or hold one
/// authenticated value per caller.
pub trait WikiApi {
    /// Establish a session and acquire the token needed for edits.
    fn login(&mut self, credentials: &Credentials)
    -> impl Future<Output = Result<(), AuthError>>;

    /// Create or replace a page.
    fn publish(&self, document: &RemoteDocument) -> impl Future<Output = Result<(), PublishError>>;
}
