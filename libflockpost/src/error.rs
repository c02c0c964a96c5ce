//! Error types for Flockpost

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FlockError>;

#[derive(Error, Debug)]
pub enum FlockError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Submission error: {0}")]
    Submit(#[from] SubmitError),

    #[error("Scheduling error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FlockError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FlockError::InvalidInput(_) => 3,
            FlockError::Submit(SubmitError::MissingField(_))
            | FlockError::Submit(SubmitError::AmbiguousContentKind)
            | FlockError::Submit(SubmitError::MissingAsset(_))
            | FlockError::Submit(SubmitError::EmptyComment)
            | FlockError::Submit(SubmitError::InvalidTargetUrl(_)) => 3,
            FlockError::Platform(PlatformError::Authentication(_)) => 2,
            FlockError::Config(_) => 2,
            FlockError::Platform(_) => 1,
            FlockError::Submit(_) => 1,
            FlockError::Schedule(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// One entry in a batched platform API error response.
///
/// The platform reports form-level failures as a list of coded items;
/// the code is a stable machine string (e.g. `SUBMIT_VALIDATION_FLAIR_REQUIRED`),
/// the message is human-readable, and `field` names the offending form field
/// when the platform provides one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorItem {
    pub code: String,
    pub message: String,
    pub field: Option<String>,
}

impl ApiErrorItem {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            field: None,
        }
    }
}

impl std::fmt::Display for ApiErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {} (field: {})", self.code, self.message, field),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Raw failure categories surfaced by the platform capability.
///
/// These mirror the platform's own coarse error shapes; callers should not
/// branch on them directly but pass them through [`crate::classify::classify`]
/// to obtain the stable outcome taxonomy.
#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Restricted: {0}")]
    Restricted(String),

    #[error("Payload too large: {0}")]
    TooLarge(String),

    #[error("Invalid flair template: {0}")]
    InvalidFlairId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Redirected: {0}")]
    Redirected(String),

    #[error("API error with {} item(s)", .0.len())]
    Api(Vec<ApiErrorItem>),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("No loaded account at ordinal {0}")]
    InvalidOrdinal(usize),

    #[error("Provide only one content kind: body, url, or image")]
    AmbiguousContentKind,

    #[error("Image file not found: {0}")]
    MissingAsset(String),

    #[error("Comment text cannot be empty")]
    EmptyComment,

    #[error("Target URL has no submission path segment: {0}")]
    InvalidTargetUrl(String),

    #[error("{0}")]
    Remote(crate::classify::ErrorKind),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Comment text cannot be empty")]
    EmptyComment,

    #[error("Scheduler has been shut down")]
    Shutdown,
}

/// Rejection from the identity-verification boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Credential rejected: {0}")]
    InvalidCredential(String),

    #[error("Credential expired")]
    Expired,

    #[error("Identity provider unreachable: {0}")]
    Transport(String),
}
