//! Core data types for Flockpost

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One complete credential set for a platform account.
///
/// All five fields are mandatory; a slot missing any of them is dropped
/// during discovery, never partially loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

/// Which submission path a request takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Link,
    Image,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Text => "text",
            ContentKind::Link => "link",
            ContentKind::Image => "image",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized submission request.
///
/// At most one of `body`, `url`, `image_path` may be populated. A request
/// with none of them populated submits a text post with an empty body;
/// that default is deliberate.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub account_ordinal: usize,
    pub destination: String,
    pub title: String,
    pub body: Option<String>,
    pub url: Option<String>,
    pub image_path: Option<String>,
    pub flair_id: Option<String>,
    pub flair_text: Option<String>,
    pub nsfw: bool,
    pub spoiler: bool,
    pub notify_on_reply: bool,
}

impl ContentRequest {
    /// Create a request with no content kind populated and all flags off.
    pub fn new(account_ordinal: usize, destination: &str, title: &str) -> Self {
        Self {
            account_ordinal,
            destination: destination.to_string(),
            title: title.to_string(),
            body: None,
            url: None,
            image_path: None,
            flair_id: None,
            flair_text: None,
            nsfw: false,
            spoiler: false,
            notify_on_reply: false,
        }
    }

    /// Number of populated content-kind fields. Empty strings count as
    /// unpopulated so that blank form inputs do not trip exclusivity.
    pub fn populated_kinds(&self) -> usize {
        [&self.body, &self.url, &self.image_path]
            .iter()
            .filter(|field| field.as_deref().is_some_and(|s| !s.is_empty()))
            .count()
    }
}

/// Outcome of a successful submission. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedResult {
    pub id: String,
    pub permalink: String,
    pub kind: ContentKind,
    pub flair_applied: bool,
    pub nsfw: bool,
    pub spoiler: bool,
}

/// Lifecycle of a deferred comment job. Both `Completed` and `Cancelled`
/// are terminal; a non-pending job is inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A deferred comment tracked from creation to firing or cancellation.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduledJob {
    pub id: Uuid,
    pub target_url: String,
    pub comment_text: String,
    pub account_ordinal: usize,
    pub fire_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl ScheduledJob {
    pub fn new(
        target_url: &str,
        comment_text: &str,
        account_ordinal: usize,
        fire_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            target_url: target_url.to_string(),
            comment_text: comment_text.to_string(),
            account_ordinal,
            fire_at,
            status: JobStatus::Pending,
        }
    }
}

/// A link flair template offered by a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flair {
    pub id: String,
    pub text: String,
    pub text_color: String,
    pub background_color: String,
    pub editable: bool,
}

/// Result of probing a destination for existence and accessibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DestinationStatus {
    Accessible { display_name: String, title: String },
    NotFound,
    Restricted,
    Inaccessible { reason: String },
}

/// Read-back record for one of the account's own submissions.
#[derive(Debug, Clone, Serialize)]
pub struct PostSnapshot {
    pub id: String,
    pub title: String,
    pub permalink: String,
    pub created_at: DateTime<Utc>,
}

/// Read-back record for a top-level comment on a post.
#[derive(Debug, Clone, Serialize)]
pub struct CommentSnapshot {
    pub id: String,
    pub body: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// Verified identity returned by the sign-in boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub display_name: String,
}
