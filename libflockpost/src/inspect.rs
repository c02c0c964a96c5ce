//! Destination and read-back inspection
//!
//! Pre-flight checks that answer "can this account use that destination"
//! before anything is submitted, plus read-back of what an account has
//! already posted. Probe failures are folded into [`DestinationStatus`]
//! rather than surfaced as errors: a missing or locked destination is an
//! answer, not a fault.

use tracing::{debug, info};

use crate::accounts::AccountPool;
use crate::classify::classify;
use crate::error::{PlatformError, SubmitError};
use crate::submit::parse_target_url;
use crate::types::{CommentSnapshot, DestinationStatus, Flair, PostSnapshot};

/// Read-only inspection over the accounts in a pool.
#[derive(Clone)]
pub struct DestinationInspector {
    pool: AccountPool,
}

impl DestinationInspector {
    pub fn new(pool: AccountPool) -> Self {
        Self { pool }
    }

    /// Probe a destination for existence and accessibility.
    ///
    /// A destination that resolves is `Accessible`; one that is missing or
    /// was merged away is `NotFound`; one the account may not read is
    /// `Restricted`; anything else (transport faults included) is
    /// `Inaccessible` with the classified reason.
    ///
    /// # Errors
    ///
    /// Only the ordinal lookup can fail; probe outcomes are encoded in the
    /// returned status.
    pub async fn verify(
        &self,
        account_ordinal: usize,
        destination: &str,
    ) -> std::result::Result<DestinationStatus, SubmitError> {
        let account = self.pool.resolve(account_ordinal)?;

        let status = match account.session.destination(destination).await {
            Ok(info) => DestinationStatus::Accessible {
                display_name: info.display_name,
                title: info.title,
            },
            Err(PlatformError::NotFound(_)) | Err(PlatformError::Redirected(_)) => {
                DestinationStatus::NotFound
            }
            Err(PlatformError::Forbidden(_)) | Err(PlatformError::Restricted(_)) => {
                DestinationStatus::Restricted
            }
            Err(e) => DestinationStatus::Inaccessible {
                reason: classify(&e).to_string(),
            },
        };

        info!(
            destination,
            account = %account.username,
            status = ?status,
            "destination probed"
        );
        Ok(status)
    }

    /// List the flair templates a destination offers.
    ///
    /// # Errors
    ///
    /// `InvalidOrdinal` for a bad ordinal; `Remote` with the classified
    /// kind when the listing itself fails.
    pub async fn flairs(
        &self,
        account_ordinal: usize,
        destination: &str,
    ) -> std::result::Result<Vec<Flair>, SubmitError> {
        let account = self.pool.resolve(account_ordinal)?;

        let flairs = account
            .session
            .flairs(destination)
            .await
            .map_err(|e| SubmitError::Remote(classify(&e)))?;
        debug!(destination, count = flairs.len(), "flair templates listed");
        Ok(flairs)
    }

    /// The account's own most recent submissions, newest first.
    pub async fn submissions(
        &self,
        account_ordinal: usize,
        limit: usize,
    ) -> std::result::Result<Vec<PostSnapshot>, SubmitError> {
        let account = self.pool.resolve(account_ordinal)?;

        account
            .session
            .submissions(limit)
            .await
            .map_err(|e| SubmitError::Remote(classify(&e)))
    }

    /// Top-level comments of the post a target URL points at.
    pub async fn comments(
        &self,
        account_ordinal: usize,
        target_url: &str,
        limit: usize,
    ) -> std::result::Result<Vec<CommentSnapshot>, SubmitError> {
        let account = self.pool.resolve(account_ordinal)?;
        let post_id = parse_target_url(target_url)?;

        account
            .session
            .comments(&post_id, limit)
            .await
            .map_err(|e| SubmitError::Remote(classify(&e)))
    }
}
