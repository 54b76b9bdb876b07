//! Per-install content source configuration.

use serde::{Deserialize, Serialize};

use crate::capability::{CapabilityMap, ContentType, Intent};
use crate::error::{ConfigurationError, Error};
use crate::fields::capability_pairs;
use crate::record::ContentId;

/// The installation's content container.
///
/// Created once at process start from static configuration and read-only
/// afterwards. When `capabilities` is omitted from the configuration the
/// standard table is used.
///
/// # Examples
///
/// ```
/// use content_exposure::ContentSource;
///
/// let source = ContentSource::from_json(
///     r#"{"id": "blog-1", "root_section_id": 3, "root_parent_id": 0}"#,
/// ).unwrap();
///
/// assert_eq!(source.id, "blog-1");
/// assert!(source.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSource {
    /// Opaque container identity
    pub id: String,
    /// Intent-to-permission table
    #[serde(default = "CapabilityMap::standard")]
    pub capabilities: CapabilityMap,
    /// Section that holds top-level posts
    #[serde(default)]
    pub root_section_id: ContentId,
    /// Parent of the root section
    #[serde(default)]
    pub root_parent_id: ContentId,
}

impl ContentSource {
    /// Creates a source with the standard capability table and no roots.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            capabilities: CapabilityMap::standard(),
            root_section_id: 0,
            root_parent_id: 0,
        }
    }

    /// Sets the root section and its parent.
    pub fn with_roots(mut self, root_section_id: ContentId, root_parent_id: ContentId) -> Self {
        self.root_section_id = root_section_id;
        self.root_parent_id = root_parent_id;
        self
    }

    /// Replaces the capability table.
    pub fn with_capabilities(mut self, capabilities: CapabilityMap) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Parses a source from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the document does not match.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks that the capability table covers every pair the pipeline uses.
    ///
    /// That is every registered capability field, plus the unfiltered-markup
    /// intent on every content-bearing type.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let markup = [ContentType::Post, ContentType::Comment]
            .into_iter()
            .map(|content_type| (content_type, Intent::PublishMarkup));

        self.capabilities.ensure_covers(capability_pairs().chain(markup))
    }
}
