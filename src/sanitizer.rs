use std::fmt;

use crate::{Tainted, Verified};

/// Error returned when a tainted input fails validation.
///
/// Messages describe the violated rule, never the rejected input.
///
/// # Examples
///
/// ```
/// use content_exposure::{SanitizationError, SanitizationErrorKind};
///
/// let error = SanitizationError::new(SanitizationErrorKind::TooLong, "guest id too long");
/// assert_eq!(error.kind(), SanitizationErrorKind::TooLong);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizationError {
    kind: SanitizationErrorKind,
    message: String,
}

impl SanitizationError {
    /// Creates a new sanitization error.
    pub fn new(kind: SanitizationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> SanitizationErrorKind {
        self.kind
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SanitizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sanitization failed ({}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SanitizationError {}

/// Why sanitization failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizationErrorKind {
    /// Input is empty or contains only whitespace.
    Empty,
    /// Input exceeds maximum allowed length.
    TooLong,
    /// Input contains control or non-printable characters.
    ContainsControlChars,
}

impl fmt::Display for SanitizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty input"),
            Self::TooLong => write!(f, "input too long"),
            Self::ContainsControlChars => write!(f, "contains control characters"),
        }
    }
}

/// Promotes tainted request inputs to verified values.
///
/// Implementations validate the input, call `Verified::new_unchecked` only on
/// success, and keep the rejected value out of their errors.
pub trait Sanitizer<T> {
    /// Validates a tainted value.
    ///
    /// # Errors
    ///
    /// Returns `SanitizationError` if the input fails validation.
    fn sanitize(&self, input: Tainted<T>) -> Result<Verified<T>, SanitizationError>;
}

/// Validates caller-supplied guest identifiers.
///
/// Trims surrounding whitespace, then rejects empty values, control
/// characters and values longer than `max_len` bytes.
///
/// # Examples
///
/// ```
/// use content_exposure::{GuestIdSanitizer, Sanitizer, Tainted};
///
/// let sanitizer = GuestIdSanitizer::default();
///
/// let verified = sanitizer.sanitize(Tainted::new(" 7 ".to_string())).unwrap();
/// assert_eq!(verified.as_ref(), "7");
///
/// assert!(sanitizer.sanitize(Tainted::new("   ".to_string())).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GuestIdSanitizer {
    max_len: usize,
}

impl GuestIdSanitizer {
    /// Default bound on guest identifier length.
    pub const DEFAULT_MAX_LEN: usize = 128;

    /// Creates a sanitizer with the given maximum length.
    ///
    /// # Panics
    ///
    /// Panics if `max_len` is 0.
    pub fn new(max_len: usize) -> Self {
        assert!(max_len > 0, "max_len must be greater than 0");
        Self { max_len }
    }
}

impl Default for GuestIdSanitizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_LEN)
    }
}

impl Sanitizer<String> for GuestIdSanitizer {
    fn sanitize(&self, input: Tainted<String>) -> Result<Verified<String>, SanitizationError> {
        let raw = input.into_inner();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(SanitizationError::new(
                SanitizationErrorKind::Empty,
                "guest id is empty",
            ));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(SanitizationError::new(
                SanitizationErrorKind::ContainsControlChars,
                "guest id contains control characters",
            ));
        }

        if trimmed.len() > self.max_len {
            return Err(SanitizationError::new(
                SanitizationErrorKind::TooLong,
                format!("guest id exceeds maximum length of {}", self.max_len),
            ));
        }

        Ok(Verified::new_unchecked(trimmed.to_string()))
    }
}
