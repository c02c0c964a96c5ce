//! Platform capability interface
//!
//! Flockpost does not bundle a platform client. The operations the core
//! needs are expressed as two object-safe async traits: [`Connector`]
//! authenticates a credential set into a [`Session`], and the session
//! carries every destination-facing operation. Production deployments
//! plug in a real client behind these traits; tests use [`mock`].

pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::types::{AccountConfig, CommentSnapshot, Flair, PostSnapshot};

/// Errors at this boundary are the platform's raw categories, before
/// classification.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Raw response to a successful submission, comment, or reply.
///
/// `id` and `permalink` are passed through verbatim from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub id: String,
    pub permalink: String,
}

impl Published {
    pub fn new(id: &str, permalink: &str) -> Self {
        Self {
            id: id.to_string(),
            permalink: permalink.to_string(),
        }
    }
}

/// Attributes of an existing, readable destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationInfo {
    pub display_name: String,
    pub title: String,
}

/// Presentation options shared by all three submission paths.
#[derive(Debug, Clone, Default)]
pub struct SubmitOptions {
    pub flair_id: Option<String>,
    pub flair_text: Option<String>,
    pub nsfw: bool,
    pub spoiler: bool,
    pub notify_on_reply: bool,
}

/// Authenticates credential sets into live sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Authenticate one credential set.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` when the platform rejects
    /// the credentials, or `PlatformError::Transport` when no response
    /// was obtained at all.
    async fn connect(&self, config: &AccountConfig) -> PlatformResult<Box<dyn Session>>;
}

/// An authenticated platform session bound to one account.
///
/// Sessions are owned by the account pool; other components re-resolve
/// them by ordinal on every use and never hold one across calls.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch the authenticated account's own username.
    ///
    /// Used as the liveness probe during pool load: a session whose
    /// identity cannot be fetched is not retained.
    async fn current_user(&self) -> PlatformResult<String>;

    /// Look up a destination by name.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Redirected` when the destination does not exist or
    /// was merged; `Forbidden` or `Restricted` when it exists but this
    /// account may not read it.
    async fn destination(&self, name: &str) -> PlatformResult<DestinationInfo>;

    /// List the destination's link flair templates. A destination with no
    /// templates yields an empty list.
    async fn flairs(&self, destination: &str) -> PlatformResult<Vec<Flair>>;

    /// Submit a self (text) post.
    async fn submit_text(
        &self,
        destination: &str,
        title: &str,
        body: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published>;

    /// Submit a link post.
    async fn submit_link(
        &self,
        destination: &str,
        title: &str,
        url: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published>;

    /// Submit an image post from a local file.
    async fn submit_image(
        &self,
        destination: &str,
        title: &str,
        image_path: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published>;

    /// Comment on a submission.
    async fn comment(&self, post_id: &str, text: &str) -> PlatformResult<Published>;

    /// Reply to an existing comment.
    async fn reply(&self, comment_id: &str, text: &str) -> PlatformResult<Published>;

    /// The account's own most recent submissions, newest first.
    async fn submissions(&self, limit: usize) -> PlatformResult<Vec<PostSnapshot>>;

    /// Top-level comments of a post, flattened; placeholder "load more"
    /// stubs are expanded or dropped before returning.
    async fn comments(&self, post_id: &str, limit: usize) -> PlatformResult<Vec<CommentSnapshot>>;
}

/// Select the connector backend named by `FLOCKPOST_PLATFORM`.
///
/// `rehearsal` (the default) accepts any complete credential set and
/// fabricates results locally without touching the network. Crates that
/// provide a real client implement [`Connector`] and are selected here.
///
/// # Errors
///
/// Returns `InvalidInput` for an unrecognized backend name.
pub fn connector_from_env() -> crate::Result<Arc<dyn Connector>> {
    let name =
        std::env::var("FLOCKPOST_PLATFORM").unwrap_or_else(|_| "rehearsal".to_string());
    match name.as_str() {
        "rehearsal" => Ok(Arc::new(mock::RehearsalConnector)),
        other => Err(crate::error::FlockError::InvalidInput(format!(
            "Unknown platform backend: '{}'. Valid options: rehearsal",
            other
        ))),
    }
}
