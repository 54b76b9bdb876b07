//! Descriptive documents surfaced as response headers.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::config::ContentSource;
use crate::error::Error;
use crate::host::SiteSettings;
use crate::record::ContentId;

/// Header carrying the [`SourceOptions`] document.
pub const OPTIONS_HEADER: &str = "x-content-source-options";

/// Header carrying the [`SourceFeatures`] document.
pub const FEATURES_HEADER: &str = "x-content-source-features";

/// Identity and root locations of the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceOptions {
    /// Opaque container identity
    pub container_id: String,
    /// Section that holds top-level posts
    pub root_section_id: ContentId,
    /// Parent of the root section
    pub root_parent_id: ContentId,
}

impl SourceOptions {
    /// Describes `source`.
    pub fn of(source: &ContentSource) -> Self {
        Self {
            container_id: source.id.clone(),
            root_section_id: source.root_section_id,
            root_parent_id: source.root_parent_id,
        }
    }
}

/// Installation features a client may adapt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceFeatures {
    /// Whether visitors may register accounts
    pub can_users_register: bool,
}

impl SourceFeatures {
    /// Reads the features from the host's settings.
    pub fn of(settings: &(impl SiteSettings + ?Sized)) -> Self {
        Self {
            can_users_register: settings.users_can_register(),
        }
    }
}

/// Builds the fixed descriptive headers merged into every response.
///
/// # Errors
///
/// Returns [`Error::InvalidHeader`] if a document contains bytes that an
/// HTTP header value cannot carry.
///
/// # Examples
///
/// ```
/// use content_exposure::options::{descriptive_headers, SourceFeatures, SourceOptions};
/// use content_exposure::ContentSource;
///
/// let source = ContentSource::new("blog-1").with_roots(3, 0);
/// let headers = descriptive_headers(
///     &SourceOptions::of(&source),
///     &SourceFeatures { can_users_register: false },
/// ).unwrap();
///
/// assert_eq!(
///     headers["x-content-source-options"],
///     r#"{"container_id":"blog-1","root_section_id":3,"root_parent_id":0}"#
/// );
/// assert_eq!(headers["x-content-source-features"], r#"{"can_users_register":false}"#);
/// ```
pub fn descriptive_headers(
    options: &SourceOptions,
    features: &SourceFeatures,
) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::with_capacity(2);
    headers.insert(
        HeaderName::from_static(OPTIONS_HEADER),
        json_header(OPTIONS_HEADER, options)?,
    );
    headers.insert(
        HeaderName::from_static(FEATURES_HEADER),
        json_header(FEATURES_HEADER, features)?,
    );
    Ok(headers)
}

fn json_header(name: &'static str, document: &impl Serialize) -> Result<HeaderValue, Error> {
    let encoded = serde_json::to_string(document).map_err(|_| Error::InvalidHeader { name })?;
    HeaderValue::from_str(&encoded).map_err(|_| Error::InvalidHeader { name })
}
