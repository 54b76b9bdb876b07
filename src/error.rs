use std::fmt;

use crate::capability::{ContentType, Intent};

/// Errors produced by the exposure policy and the response pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The capability table has no permission for a requested pair.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The content source configuration could not be parsed.
    #[error("invalid content source configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// A descriptive document could not be carried as an HTTP header value.
    #[error("header '{name}' cannot carry the encoded document")]
    InvalidHeader {
        /// Name of the header that was being built
        name: &'static str,
    },
}

/// A `(content type, intent)` pair is missing from the capability table.
///
/// This is a programmer error: the table is a closed, statically declared
/// mapping and every registered capability field must have an entry. It is
/// never converted into a "permission denied" answer.
///
/// # Examples
///
/// ```
/// use content_exposure::{ConfigurationError, ContentType, Intent};
///
/// let err = ConfigurationError::new(ContentType::Section, Intent::Edit);
/// assert_eq!(err.content_type(), ContentType::Section);
/// assert!(err.to_string().contains("'edit'"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigurationError {
    content_type: ContentType,
    intent: Intent,
}

impl ConfigurationError {
    /// Creates a new configuration error for the missing pair.
    pub fn new(content_type: ContentType, intent: Intent) -> Self {
        Self {
            content_type,
            intent,
        }
    }

    /// Returns the content type whose mapping is incomplete.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// Returns the intent that has no permission.
    pub fn intent(&self) -> Intent {
        self.intent
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no permission mapped for intent '{}' on content type '{}'",
            self.intent, self.content_type
        )
    }
}

impl std::error::Error for ConfigurationError {}
