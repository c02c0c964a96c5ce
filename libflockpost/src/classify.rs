//! Remote failure classification
//!
//! The platform capability surfaces failures in several shapes: dedicated
//! error categories, redirect signals, and batched API error lists with
//! machine codes. [`classify`] folds all of them into the closed [`ErrorKind`]
//! taxonomy so that direct submission and deferred delivery report failures
//! identically.

use crate::error::PlatformError;

/// Code the platform attaches to a flair-template rejection inside a
/// batched API error response.
const INVALID_FLAIR_CODE: &str = "INVALID_FLAIR_TEMPLATE_ID";

/// Stable outcome taxonomy for remote failures.
///
/// Every reachable failure from the platform capability maps to exactly one
/// variant; `Unclassified` carries the original message for anything the
/// mapping does not recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The account lacks permission to act on the destination.
    Forbidden(String),
    /// The submission payload exceeded a platform size limit.
    PayloadTooLarge(String),
    /// The flair id does not exist on the destination.
    InvalidFlair(String),
    /// The destination does not exist, or was merged or renamed.
    NotFound(String),
    /// The destination exists but is private.
    RestrictedAccess(String),
    /// Network-level failure before a platform response was produced.
    TransportError(String),
    /// Unrecognized failure, carrying the original message.
    Unclassified(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Forbidden(msg) => {
                write!(f, "This account cannot post to the destination: {}", msg)
            }
            ErrorKind::PayloadTooLarge(msg) => write!(f, "Content too large: {}", msg),
            ErrorKind::InvalidFlair(msg) => write!(f, "Invalid flair template: {}", msg),
            ErrorKind::NotFound(msg) => write!(f, "Destination not found: {}", msg),
            ErrorKind::RestrictedAccess(msg) => {
                write!(f, "Destination is private or restricted: {}", msg)
            }
            ErrorKind::TransportError(msg) => write!(f, "Network failure: {}", msg),
            ErrorKind::Unclassified(msg) => write!(f, "Unexpected platform error: {}", msg),
        }
    }
}

/// Map a raw platform failure onto the closed [`ErrorKind`] taxonomy.
///
/// Pure function, no I/O. A redirect signal counts as not-found (the
/// destination was merged or renamed). Batched API errors are scanned in
/// full for a flair-template rejection before falling through to
/// `Unclassified`.
pub fn classify(error: &PlatformError) -> ErrorKind {
    match error {
        PlatformError::Forbidden(msg) => ErrorKind::Forbidden(msg.clone()),
        PlatformError::Restricted(msg) => ErrorKind::RestrictedAccess(msg.clone()),
        PlatformError::TooLarge(msg) => ErrorKind::PayloadTooLarge(msg.clone()),
        PlatformError::InvalidFlairId(msg) => ErrorKind::InvalidFlair(msg.clone()),
        PlatformError::NotFound(msg) | PlatformError::Redirected(msg) => {
            ErrorKind::NotFound(msg.clone())
        }
        PlatformError::Api(items) => {
            for item in items {
                if item.code.eq_ignore_ascii_case(INVALID_FLAIR_CODE) {
                    return ErrorKind::InvalidFlair(item.message.clone());
                }
            }
            let joined = items
                .iter()
                .map(|item| item.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            ErrorKind::Unclassified(joined)
        }
        PlatformError::Transport(msg) => ErrorKind::TransportError(msg.clone()),
        PlatformError::Authentication(msg) | PlatformError::Other(msg) => {
            ErrorKind::Unclassified(msg.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorItem;

    #[test]
    fn test_forbidden_maps_to_forbidden() {
        let kind = classify(&PlatformError::Forbidden("r/modsonly".to_string()));
        assert_eq!(kind, ErrorKind::Forbidden("r/modsonly".to_string()));
    }

    #[test]
    fn test_restricted_maps_to_restricted_access() {
        let kind = classify(&PlatformError::Restricted("r/invite_only".to_string()));
        assert_eq!(kind, ErrorKind::RestrictedAccess("r/invite_only".to_string()));
    }

    #[test]
    fn test_too_large_maps_to_payload_too_large() {
        let kind = classify(&PlatformError::TooLarge("image over 20MB".to_string()));
        assert_eq!(kind, ErrorKind::PayloadTooLarge("image over 20MB".to_string()));
    }

    #[test]
    fn test_direct_flair_signal() {
        let kind = classify(&PlatformError::InvalidFlairId("abc-123".to_string()));
        assert_eq!(kind, ErrorKind::InvalidFlair("abc-123".to_string()));
    }

    #[test]
    fn test_not_found_maps_to_not_found() {
        let kind = classify(&PlatformError::NotFound("r/gone".to_string()));
        assert_eq!(kind, ErrorKind::NotFound("r/gone".to_string()));
    }

    #[test]
    fn test_redirect_signal_classifies_as_not_found() {
        let kind = classify(&PlatformError::Redirected("r/renamed".to_string()));
        assert_eq!(kind, ErrorKind::NotFound("r/renamed".to_string()));
        assert!(!matches!(kind, ErrorKind::Unclassified(_)));
    }

    #[test]
    fn test_transport_maps_to_transport_error() {
        let kind = classify(&PlatformError::Transport("connection reset".to_string()));
        assert_eq!(kind, ErrorKind::TransportError("connection reset".to_string()));
    }

    #[test]
    fn test_api_batch_first_item_flair() {
        let batch = PlatformError::Api(vec![ApiErrorItem::new(
            "INVALID_FLAIR_TEMPLATE_ID",
            "that flair does not exist",
        )]);
        assert_eq!(
            classify(&batch),
            ErrorKind::InvalidFlair("that flair does not exist".to_string())
        );
    }

    #[test]
    fn test_api_batch_scans_all_items_for_flair() {
        // The flair rejection is not the first item; the scan must still find it.
        let batch = PlatformError::Api(vec![
            ApiErrorItem::new("SOMETHING_ELSE", "unrelated"),
            ApiErrorItem::new("INVALID_FLAIR_TEMPLATE_ID", "bad flair id"),
        ]);
        assert_eq!(
            classify(&batch),
            ErrorKind::InvalidFlair("bad flair id".to_string())
        );
    }

    #[test]
    fn test_api_batch_flair_code_case_insensitive() {
        let batch = PlatformError::Api(vec![ApiErrorItem::new(
            "invalid_flair_template_id",
            "lowercased code",
        )]);
        assert_eq!(
            classify(&batch),
            ErrorKind::InvalidFlair("lowercased code".to_string())
        );
    }

    #[test]
    fn test_api_batch_without_flair_is_unclassified() {
        let batch = PlatformError::Api(vec![
            ApiErrorItem::new("RATELIMIT", "you are doing that too much"),
            ApiErrorItem::new("NO_TEXT", "we need something here"),
        ]);
        match classify(&batch) {
            ErrorKind::Unclassified(msg) => {
                assert!(msg.contains("RATELIMIT"));
                assert!(msg.contains("NO_TEXT"));
            }
            other => panic!("Expected Unclassified, got {:?}", other),
        }
    }

    #[test]
    fn test_other_is_unclassified_with_original_message() {
        let kind = classify(&PlatformError::Other("weird 503 body".to_string()));
        assert_eq!(kind, ErrorKind::Unclassified("weird 503 body".to_string()));
    }

    #[test]
    fn test_display_messages_are_operator_facing() {
        let kind = ErrorKind::RestrictedAccess("r/invite_only".to_string());
        assert_eq!(
            format!("{}", kind),
            "Destination is private or restricted: r/invite_only"
        );

        let kind = ErrorKind::Unclassified("boom".to_string());
        assert_eq!(format!("{}", kind), "Unexpected platform error: boom");
    }
}
