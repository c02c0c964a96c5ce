//! Content submission
//!
//! Normalizes a request into exactly one of three submission paths (text,
//! link, image), with every precondition checked before any network call.
//! Remote failures come back through the shared classification taxonomy,
//! so direct submission and deferred delivery report identically.

use std::path::Path;

use tracing::{debug, info};

use crate::accounts::AccountPool;
use crate::classify::classify;
use crate::error::SubmitError;
use crate::platforms::{Published, SubmitOptions};
use crate::types::{ContentKind, ContentRequest, PublishedResult};

/// Path marker that precedes a submission id in a target URL.
const SUBMISSION_MARKER: &str = "/comments/";

/// Extract the submission id from a target URL.
///
/// The id is the path segment immediately following the submission
/// marker; a URL without the marker or with nothing after it is rejected.
pub fn parse_target_url(url: &str) -> std::result::Result<String, SubmitError> {
    let rest = url
        .split_once(SUBMISSION_MARKER)
        .map(|(_, rest)| rest)
        .ok_or_else(|| SubmitError::InvalidTargetUrl(url.to_string()))?;

    let id: &str = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or("");
    if id.is_empty() {
        return Err(SubmitError::InvalidTargetUrl(url.to_string()));
    }
    Ok(id.to_string())
}

/// Submits posts, comments, and replies through pool-resolved sessions.
#[derive(Clone)]
pub struct ContentSubmitter {
    pool: AccountPool,
}

impl ContentSubmitter {
    pub fn new(pool: AccountPool) -> Self {
        Self { pool }
    }

    /// Submit a post.
    ///
    /// Preconditions are checked in a fixed order before any network
    /// call: required fields, ordinal resolution, content-kind
    /// exclusivity, and (for images) local file existence. A request with
    /// no content field populated submits a text post with an empty body;
    /// that default is deliberate.
    pub async fn submit(
        &self,
        request: &ContentRequest,
    ) -> std::result::Result<PublishedResult, SubmitError> {
        if request.account_ordinal == 0 {
            return Err(SubmitError::MissingField("account_ordinal".to_string()));
        }
        if request.destination.is_empty() {
            return Err(SubmitError::MissingField("destination".to_string()));
        }
        if request.title.is_empty() {
            return Err(SubmitError::MissingField("title".to_string()));
        }

        let account = self.pool.resolve(request.account_ordinal)?;

        if request.populated_kinds() > 1 {
            return Err(SubmitError::AmbiguousContentKind);
        }

        let options = SubmitOptions {
            flair_id: request.flair_id.clone(),
            flair_text: request.flair_text.clone(),
            nsfw: request.nsfw,
            spoiler: request.spoiler,
            notify_on_reply: request.notify_on_reply,
        };

        let image_path = request.image_path.as_deref().filter(|p| !p.is_empty());
        let url = request.url.as_deref().filter(|u| !u.is_empty());

        let (kind, outcome) = if let Some(path) = image_path {
            if !Path::new(path).is_file() {
                return Err(SubmitError::MissingAsset(path.to_string()));
            }
            debug!(destination = %request.destination, path, "dispatching image submission");
            let outcome = account
                .session
                .submit_image(&request.destination, &request.title, path, &options)
                .await;
            (ContentKind::Image, outcome)
        } else if let Some(url) = url {
            debug!(destination = %request.destination, url, "dispatching link submission");
            let outcome = account
                .session
                .submit_link(&request.destination, &request.title, url, &options)
                .await;
            (ContentKind::Link, outcome)
        } else {
            let body = request.body.as_deref().unwrap_or("");
            debug!(destination = %request.destination, "dispatching text submission");
            let outcome = account
                .session
                .submit_text(&request.destination, &request.title, body, &options)
                .await;
            (ContentKind::Text, outcome)
        };

        let published = outcome.map_err(|e| SubmitError::Remote(classify(&e)))?;
        info!(
            id = %published.id,
            kind = %kind,
            destination = %request.destination,
            account = %account.username,
            "post submitted"
        );

        Ok(PublishedResult {
            id: published.id,
            permalink: published.permalink,
            kind,
            flair_applied: request.flair_id.is_some() || request.flair_text.is_some(),
            nsfw: request.nsfw,
            spoiler: request.spoiler,
        })
    }

    /// Comment on the submission a target URL points at.
    pub async fn comment(
        &self,
        account_ordinal: usize,
        target_url: &str,
        text: &str,
    ) -> std::result::Result<Published, SubmitError> {
        if text.is_empty() {
            return Err(SubmitError::EmptyComment);
        }
        let account = self.pool.resolve(account_ordinal)?;
        let post_id = parse_target_url(target_url)?;

        let published = account
            .session
            .comment(&post_id, text)
            .await
            .map_err(|e| SubmitError::Remote(classify(&e)))?;
        info!(id = %published.id, post_id = %post_id, account = %account.username, "comment submitted");
        Ok(published)
    }

    /// Reply to an existing comment.
    pub async fn reply(
        &self,
        account_ordinal: usize,
        comment_id: &str,
        text: &str,
    ) -> std::result::Result<Published, SubmitError> {
        if text.is_empty() {
            return Err(SubmitError::EmptyComment);
        }
        let account = self.pool.resolve(account_ordinal)?;

        let published = account
            .session
            .reply(comment_id, text)
            .await
            .map_err(|e| SubmitError::Remote(classify(&e)))?;
        info!(id = %published.id, comment_id, account = %account.username, "reply submitted");
        Ok(published)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ErrorKind;
    use crate::error::PlatformError;
    use crate::platforms::mock::{MockConfig, MockConnector};
    use crate::types::AccountConfig;
    use std::io::Write;
    use std::sync::Arc;

    fn account_config(username: &str) -> AccountConfig {
        AccountConfig {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            username: username.to_string(),
            password: "pw".to_string(),
            user_agent: "flockpost-tests/0.1".to_string(),
        }
    }

    async fn submitter_with(behavior: MockConfig) -> (ContentSubmitter, MockConfig) {
        let username = behavior.username.clone();
        let pool = AccountPool::new(Arc::new(MockConnector::single(behavior.clone())));
        let result = pool.load_from(vec![account_config(&username)]).await;
        assert!(result.success());
        (ContentSubmitter::new(pool), behavior)
    }

    #[test]
    fn test_parse_target_url_extracts_segment_after_marker() {
        let id = parse_target_url("https://example.com/r/rust/comments/abc123/some_title/").unwrap();
        assert_eq!(id, "abc123");

        let id = parse_target_url("https://example.com/r/rust/comments/xyz?context=3").unwrap();
        assert_eq!(id, "xyz");
    }

    #[test]
    fn test_parse_target_url_without_marker_is_rejected() {
        let result = parse_target_url("https://example.com/r/rust/");
        assert!(matches!(result, Err(SubmitError::InvalidTargetUrl(_))));

        let result = parse_target_url("https://example.com/r/rust/comments/");
        assert!(matches!(result, Err(SubmitError::InvalidTargetUrl(_))));
    }

    #[tokio::test]
    async fn test_missing_fields_fail_before_any_network_call() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let request = ContentRequest::new(1, "", "Title");
        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::MissingField(field)) if field == "destination"
        ));

        let request = ContentRequest::new(1, "rust", "");
        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::MissingField(field)) if field == "title"
        ));

        let request = ContentRequest::new(0, "rust", "Title");
        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::MissingField(field)) if field == "account_ordinal"
        ));

        assert_eq!(behavior.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_ordinal_fails_before_any_network_call() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let request = ContentRequest::new(5, "rust", "Title");
        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::InvalidOrdinal(5))
        ));
        assert_eq!(behavior.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_ambiguous_content_kind_performs_no_network_call() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let mut request = ContentRequest::new(1, "rust", "Title");
        request.body = Some("some body".to_string());
        request.url = Some("https://example.com".to_string());

        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::AmbiguousContentKind)
        ));
        assert_eq!(behavior.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_content_defaults_to_empty_text_post() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let request = ContentRequest::new(1, "rust", "Title only");
        let result = submitter.submit(&request).await.unwrap();

        assert_eq!(result.kind, ContentKind::Text);
        let made = behavior.submissions_made();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].content, "");
    }

    #[tokio::test]
    async fn test_each_kind_round_trips() {
        let (submitter, _) = submitter_with(MockConfig::success("alice")).await;

        let mut request = ContentRequest::new(1, "rust", "Text");
        request.body = Some("hello".to_string());
        assert_eq!(
            submitter.submit(&request).await.unwrap().kind,
            ContentKind::Text
        );

        let mut request = ContentRequest::new(1, "rust", "Link");
        request.url = Some("https://example.com".to_string());
        assert_eq!(
            submitter.submit(&request).await.unwrap().kind,
            ContentKind::Link
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"fake image bytes").unwrap();
        let mut request = ContentRequest::new(1, "rust", "Image");
        request.image_path = Some(file.path().to_string_lossy().into_owned());
        assert_eq!(
            submitter.submit(&request).await.unwrap().kind,
            ContentKind::Image
        );
    }

    #[tokio::test]
    async fn test_missing_image_file_fails_before_network() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let mut request = ContentRequest::new(1, "rust", "Image");
        request.image_path = Some("/nonexistent/image.png".to_string());

        assert!(matches!(
            submitter.submit(&request).await,
            Err(SubmitError::MissingAsset(path)) if path == "/nonexistent/image.png"
        ));
        assert_eq!(behavior.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_flags_echoed_in_result() {
        let (submitter, _) = submitter_with(MockConfig::success("alice")).await;

        let mut request = ContentRequest::new(1, "rust", "Flagged");
        request.body = Some("body".to_string());
        request.flair_id = Some("flair-1".to_string());
        request.nsfw = true;
        request.spoiler = true;

        let result = submitter.submit(&request).await.unwrap();
        assert!(result.flair_applied);
        assert!(result.nsfw);
        assert!(result.spoiler);
    }

    #[tokio::test]
    async fn test_remote_failure_is_classified() {
        let (submitter, _) = submitter_with(MockConfig::submit_failure(
            "alice",
            PlatformError::Forbidden("r/locked".to_string()),
        ))
        .await;

        let mut request = ContentRequest::new(1, "locked", "Title");
        request.body = Some("body".to_string());

        match submitter.submit(&request).await {
            Err(SubmitError::Remote(ErrorKind::Forbidden(msg))) => {
                assert_eq!(msg, "r/locked");
            }
            other => panic!("Expected classified Forbidden, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_flair_batch_error_classifies_as_invalid_flair() {
        use crate::error::ApiErrorItem;

        let (submitter, _) = submitter_with(MockConfig::submit_failure(
            "alice",
            PlatformError::Api(vec![
                ApiErrorItem::new("SOMETHING_ELSE", "noise"),
                ApiErrorItem::new("INVALID_FLAIR_TEMPLATE_ID", "bad flair"),
            ]),
        ))
        .await;

        let mut request = ContentRequest::new(1, "rust", "Title");
        request.flair_id = Some("stale-id".to_string());

        match submitter.submit(&request).await {
            Err(SubmitError::Remote(ErrorKind::InvalidFlair(msg))) => {
                assert_eq!(msg, "bad flair");
            }
            other => panic!("Expected InvalidFlair, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_comment_rejects_empty_text() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let result = submitter
            .comment(1, "https://example.com/r/rust/comments/abc/", "")
            .await;
        assert!(matches!(result, Err(SubmitError::EmptyComment)));
        assert_eq!(behavior.comment_calls(), 0);
    }

    #[tokio::test]
    async fn test_comment_parses_target_and_submits() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let published = submitter
            .comment(1, "https://example.com/r/rust/comments/abc123/title/", "nice post")
            .await
            .unwrap();
        assert!(published.id.starts_with("t1_"));

        let made = behavior.comments_made();
        assert_eq!(made.len(), 1);
        assert_eq!(made[0].target_id, "abc123");
        assert_eq!(made[0].text, "nice post");
    }

    #[tokio::test]
    async fn test_comment_with_bad_url_fails_before_network() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        let result = submitter.comment(1, "https://example.com/r/rust/", "text").await;
        assert!(matches!(result, Err(SubmitError::InvalidTargetUrl(_))));
        assert_eq!(behavior.comment_calls(), 0);
    }

    #[tokio::test]
    async fn test_reply_submits_to_comment_id() {
        let (submitter, behavior) = submitter_with(MockConfig::success("alice")).await;

        submitter.reply(1, "t1_parent", "agreed").await.unwrap();

        let made = behavior.comments_made();
        assert_eq!(made[0].target_id, "t1_parent");
        assert_eq!(made[0].text, "agreed");
    }
}
