//! Mock platform implementation for testing
//!
//! A configurable stand-in for the platform capability that can simulate
//! authentication failures, scripted submission errors, and latency. Call
//! counters and captured submissions live behind shared handles so tests
//! keep visibility after the connector has been moved into a pool.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::error::PlatformError;
use crate::platforms::{Connector, DestinationInfo, PlatformResult, Published, Session, SubmitOptions};
use crate::types::{AccountConfig, CommentSnapshot, ContentKind, Flair, PostSnapshot};

/// A submission captured by the mock, for assertions.
#[derive(Debug, Clone)]
pub struct SubmittedPost {
    pub destination: String,
    pub title: String,
    pub kind: ContentKind,
    pub content: String,
    pub flair_id: Option<String>,
    pub nsfw: bool,
    pub spoiler: bool,
}

/// A comment or reply captured by the mock.
#[derive(Debug, Clone)]
pub struct RecordedComment {
    pub target_id: String,
    pub text: String,
}

/// Configuration for mock platform behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Username reported by the liveness probe
    pub username: String,

    /// Whether authentication should succeed
    pub auth_succeeds: bool,

    /// Error message to return on authentication failure
    pub auth_error: Option<String>,

    /// Error to return from the identity probe after a successful connect
    pub liveness_error: Option<PlatformError>,

    /// Error to return from destination lookup
    pub destination_error: Option<PlatformError>,

    /// Destination attributes; when unset, synthesized from the queried name
    pub destination_info: Option<DestinationInfo>,

    /// Error to return from all three submission paths
    pub submit_error: Option<PlatformError>,

    /// Error to return from comment and reply
    pub comment_error: Option<PlatformError>,

    /// Flair templates returned for any destination
    pub flair_templates: Vec<Flair>,

    /// Read-back fixtures
    pub own_submissions: Vec<PostSnapshot>,
    pub post_comments: Vec<CommentSnapshot>,

    /// Delay before completing operations (simulates network latency)
    pub delay: Duration,

    /// Number of times connect has been called for this account
    pub connect_call_count: Arc<Mutex<usize>>,

    /// Number of times the identity probe has been called
    pub user_call_count: Arc<Mutex<usize>>,

    /// Number of times any submission path has been called
    pub submit_call_count: Arc<Mutex<usize>>,

    /// Number of times comment or reply has been called
    pub comment_call_count: Arc<Mutex<usize>>,

    /// Submissions that have been made (for verification)
    pub submitted: Arc<Mutex<Vec<SubmittedPost>>>,

    /// Comments and replies that have been made (for verification)
    pub commented: Arc<Mutex<Vec<RecordedComment>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            username: "mock-user".to_string(),
            auth_succeeds: true,
            auth_error: None,
            liveness_error: None,
            destination_error: None,
            destination_info: None,
            submit_error: None,
            comment_error: None,
            flair_templates: Vec::new(),
            own_submissions: Vec::new(),
            post_comments: Vec::new(),
            delay: Duration::from_millis(0),
            connect_call_count: Arc::new(Mutex::new(0)),
            user_call_count: Arc::new(Mutex::new(0)),
            submit_call_count: Arc::new(Mutex::new(0)),
            comment_call_count: Arc::new(Mutex::new(0)),
            submitted: Arc::new(Mutex::new(Vec::new())),
            commented: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockConfig {
    /// A mock account that succeeds at everything
    pub fn success(username: &str) -> Self {
        Self {
            username: username.to_string(),
            ..Default::default()
        }
    }

    /// A mock account that fails authentication
    pub fn auth_failure(username: &str, error: &str) -> Self {
        Self {
            username: username.to_string(),
            auth_succeeds: false,
            auth_error: Some(error.to_string()),
            ..Default::default()
        }
    }

    /// A mock account that authenticates but fails the identity probe
    pub fn liveness_failure(username: &str, error: PlatformError) -> Self {
        Self {
            username: username.to_string(),
            liveness_error: Some(error),
            ..Default::default()
        }
    }

    /// A mock account whose submissions fail with the given error
    pub fn submit_failure(username: &str, error: PlatformError) -> Self {
        Self {
            username: username.to_string(),
            submit_error: Some(error),
            ..Default::default()
        }
    }

    /// A mock account whose comments fail with the given error
    pub fn comment_failure(username: &str, error: PlatformError) -> Self {
        Self {
            username: username.to_string(),
            comment_error: Some(error),
            ..Default::default()
        }
    }

    /// A mock account whose destination lookups fail with the given error
    pub fn destination_failure(username: &str, error: PlatformError) -> Self {
        Self {
            username: username.to_string(),
            destination_error: Some(error),
            ..Default::default()
        }
    }

    /// A mock account with simulated latency
    pub fn with_delay(username: &str, delay: Duration) -> Self {
        Self {
            username: username.to_string(),
            delay,
            ..Default::default()
        }
    }

    /// Attach flair templates to this account's destinations
    pub fn with_flairs(mut self, flairs: Vec<Flair>) -> Self {
        self.flair_templates = flairs;
        self
    }

    /// Get the number of times connect was called
    pub fn connect_calls(&self) -> usize {
        *self.connect_call_count.lock().unwrap()
    }

    /// Get the number of times any submission path was called
    pub fn submit_calls(&self) -> usize {
        *self.submit_call_count.lock().unwrap()
    }

    /// Get the number of times comment or reply was called
    pub fn comment_calls(&self) -> usize {
        *self.comment_call_count.lock().unwrap()
    }

    /// Get all submissions that were made
    pub fn submissions_made(&self) -> Vec<SubmittedPost> {
        self.submitted.lock().unwrap().clone()
    }

    /// Get all comments and replies that were made
    pub fn comments_made(&self) -> Vec<RecordedComment> {
        self.commented.lock().unwrap().clone()
    }
}

/// Mock connector routing credential sets to per-account behaviors
pub struct MockConnector {
    accounts: HashMap<String, MockConfig>,
}

impl MockConnector {
    /// Route every listed account by its username; unknown usernames fail
    /// authentication.
    pub fn new(accounts: Vec<MockConfig>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|config| (config.username.clone(), config))
            .collect();
        Self { accounts }
    }

    /// Convenience constructor for a single account
    pub fn single(config: MockConfig) -> Self {
        Self::new(vec![config])
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, config: &AccountConfig) -> PlatformResult<Box<dyn Session>> {
        let behavior = self.accounts.get(&config.username).ok_or_else(|| {
            PlatformError::Authentication(format!("unknown account: {}", config.username))
        })?;

        *behavior.connect_call_count.lock().unwrap() += 1;

        if !behavior.delay.is_zero() {
            sleep(behavior.delay).await;
        }

        if !behavior.auth_succeeds {
            let message = behavior
                .auth_error
                .clone()
                .unwrap_or_else(|| "Mock authentication failed".to_string());
            return Err(PlatformError::Authentication(message));
        }

        Ok(Box::new(MockSession {
            config: behavior.clone(),
        }))
    }
}

/// Connector that accepts any complete credential set and fabricates
/// results locally.
///
/// This is the CLI stand-in backend when no real platform crate is
/// linked; everything succeeds and nothing reaches the network.
pub struct RehearsalConnector;

#[async_trait]
impl Connector for RehearsalConnector {
    async fn connect(&self, config: &AccountConfig) -> PlatformResult<Box<dyn Session>> {
        Ok(Box::new(MockSession::new(MockConfig::success(
            &config.username,
        ))))
    }
}

/// Mock session for testing
pub struct MockSession {
    config: MockConfig,
}

impl MockSession {
    /// Build a session directly, bypassing the connector
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    async fn simulate_latency(&self) {
        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }
    }

    fn record_submission(
        &self,
        destination: &str,
        title: &str,
        kind: ContentKind,
        content: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published> {
        if let Some(error) = &self.config.submit_error {
            return Err(error.clone());
        }

        self.config.submitted.lock().unwrap().push(SubmittedPost {
            destination: destination.to_string(),
            title: title.to_string(),
            kind,
            content: content.to_string(),
            flair_id: options.flair_id.clone(),
            nsfw: options.nsfw,
            spoiler: options.spoiler,
        });

        let id = format!("t3_{}", uuid::Uuid::new_v4().simple());
        let permalink = format!("/r/{}/comments/{}/", destination, id);
        Ok(Published::new(&id, &permalink))
    }

    fn record_comment(&self, target_id: &str, text: &str) -> PlatformResult<Published> {
        if let Some(error) = &self.config.comment_error {
            return Err(error.clone());
        }

        self.config.commented.lock().unwrap().push(RecordedComment {
            target_id: target_id.to_string(),
            text: text.to_string(),
        });

        let id = format!("t1_{}", uuid::Uuid::new_v4().simple());
        let permalink = format!("/comments/{}/comment/{}/", target_id, id);
        Ok(Published::new(&id, &permalink))
    }
}

#[async_trait]
impl Session for MockSession {
    async fn current_user(&self) -> PlatformResult<String> {
        *self.config.user_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;

        if let Some(error) = &self.config.liveness_error {
            return Err(error.clone());
        }
        Ok(self.config.username.clone())
    }

    async fn destination(&self, name: &str) -> PlatformResult<DestinationInfo> {
        self.simulate_latency().await;

        if let Some(error) = &self.config.destination_error {
            return Err(error.clone());
        }
        Ok(self.config.destination_info.clone().unwrap_or_else(|| {
            DestinationInfo {
                display_name: name.to_string(),
                title: format!("{} (mock)", name),
            }
        }))
    }

    async fn flairs(&self, _destination: &str) -> PlatformResult<Vec<Flair>> {
        self.simulate_latency().await;
        Ok(self.config.flair_templates.clone())
    }

    async fn submit_text(
        &self,
        destination: &str,
        title: &str,
        body: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published> {
        *self.config.submit_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.record_submission(destination, title, ContentKind::Text, body, options)
    }

    async fn submit_link(
        &self,
        destination: &str,
        title: &str,
        url: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published> {
        *self.config.submit_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.record_submission(destination, title, ContentKind::Link, url, options)
    }

    async fn submit_image(
        &self,
        destination: &str,
        title: &str,
        image_path: &str,
        options: &SubmitOptions,
    ) -> PlatformResult<Published> {
        *self.config.submit_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.record_submission(destination, title, ContentKind::Image, image_path, options)
    }

    async fn comment(&self, post_id: &str, text: &str) -> PlatformResult<Published> {
        *self.config.comment_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.record_comment(post_id, text)
    }

    async fn reply(&self, comment_id: &str, text: &str) -> PlatformResult<Published> {
        *self.config.comment_call_count.lock().unwrap() += 1;
        self.simulate_latency().await;
        self.record_comment(comment_id, text)
    }

    async fn submissions(&self, limit: usize) -> PlatformResult<Vec<PostSnapshot>> {
        self.simulate_latency().await;
        Ok(self
            .config
            .own_submissions
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn comments(&self, _post_id: &str, limit: usize) -> PlatformResult<Vec<CommentSnapshot>> {
        self.simulate_latency().await;
        Ok(self
            .config
            .post_comments
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountConfig;

    fn account(username: &str) -> AccountConfig {
        AccountConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: username.to_string(),
            password: "pw".to_string(),
            user_agent: "flockpost-tests/0.1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_connect_and_probe_success() {
        let config = MockConfig::success("alice");
        let connector = MockConnector::single(config.clone());

        let session = connector.connect(&account("alice")).await.unwrap();
        assert_eq!(config.connect_calls(), 1);

        let username = session.current_user().await.unwrap();
        assert_eq!(username, "alice");
    }

    #[tokio::test]
    async fn test_connect_unknown_account_fails_auth() {
        let connector = MockConnector::single(MockConfig::success("alice"));

        let result = connector.connect(&account("mallory")).await;
        assert!(matches!(
            result.err(),
            Some(PlatformError::Authentication(_))
        ));
    }

    #[tokio::test]
    async fn test_auth_failure_carries_message() {
        let config = MockConfig::auth_failure("alice", "invalid_grant");
        let connector = MockConnector::single(config.clone());

        let error = connector.connect(&account("alice")).await.err().unwrap();
        assert!(error.to_string().contains("invalid_grant"));
        assert_eq!(config.connect_calls(), 1);
    }

    #[tokio::test]
    async fn test_liveness_failure_after_connect() {
        let config = MockConfig::liveness_failure(
            "alice",
            PlatformError::Transport("identity timeout".to_string()),
        );
        let connector = MockConnector::single(config);

        let session = connector.connect(&account("alice")).await.unwrap();
        let result = session.current_user().await;
        assert!(matches!(result.err(), Some(PlatformError::Transport(_))));
    }

    #[tokio::test]
    async fn test_submission_is_captured_with_kind() {
        let config = MockConfig::success("alice");
        let session = MockSession::new(config.clone());

        let published = session
            .submit_link("rust", "Title", "https://example.com", &SubmitOptions::default())
            .await
            .unwrap();
        assert!(published.id.starts_with("t3_"));
        assert_eq!(config.submit_calls(), 1);

        let made = config.submissions_made();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].kind, ContentKind::Link);
        assert_eq!(made[0].content, "https://example.com");
    }

    #[tokio::test]
    async fn test_submit_failure_still_counts_call() {
        let config = MockConfig::submit_failure(
            "alice",
            PlatformError::Forbidden("r/locked".to_string()),
        );
        let session = MockSession::new(config.clone());

        let result = session
            .submit_text("locked", "Title", "body", &SubmitOptions::default())
            .await;
        assert!(result.is_err());
        assert_eq!(config.submit_calls(), 1);
        assert!(config.submissions_made().is_empty());
    }

    #[tokio::test]
    async fn test_comment_and_reply_are_recorded() {
        let config = MockConfig::success("alice");
        let session = MockSession::new(config.clone());

        session.comment("t3_abc", "first").await.unwrap();
        session.reply("t1_def", "second").await.unwrap();

        assert_eq!(config.comment_calls(), 2);
        let made = config.comments_made();
        assert_eq!(made[0].target_id, "t3_abc");
        assert_eq!(made[1].text, "second");
    }

    #[tokio::test]
    async fn test_destination_synthesized_when_unset() {
        let session = MockSession::new(MockConfig::success("alice"));
        let info = session.destination("rust").await.unwrap();
        assert_eq!(info.display_name, "rust");
    }

    #[tokio::test]
    async fn test_operation_delay() {
        let config = MockConfig::with_delay("alice", Duration::from_millis(50));
        let session = MockSession::new(config);

        let start = std::time::Instant::now();
        session.current_user().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_read_back_respects_limit() {
        let mut config = MockConfig::success("alice");
        config.post_comments = vec![
            CommentSnapshot {
                id: "t1_a".to_string(),
                body: "one".to_string(),
                author: "bob".to_string(),
                created_at: chrono::Utc::now(),
            },
            CommentSnapshot {
                id: "t1_b".to_string(),
                body: "two".to_string(),
                author: "carol".to_string(),
                created_at: chrono::Utc::now(),
            },
        ];
        let session = MockSession::new(config);

        let comments = session.comments("t3_abc", 1).await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, "t1_a");
    }
}
