//! Capability table and resolver.
//!
//! Intents (post, comment, edit, unfiltered markup) are mapped per content
//! type to concrete permission names, which the host's [`Authorizer`] then
//! evaluates for a user and a content item.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::ConfigurationError;
use crate::host::Authorizer;
use crate::record::{ContentId, UserId};

/// Kind of content item flowing through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// A container of posts
    Section,
    /// A primary content entity
    Post,
    /// A reply attached to a post
    Comment,
}

impl ContentType {
    /// Returns true for types whose body goes through the exposure policy.
    pub fn carries_content(self) -> bool {
        matches!(self, ContentType::Post | ContentType::Comment)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Section => write!(f, "section"),
            ContentType::Post => write!(f, "post"),
            ContentType::Comment => write!(f, "comment"),
        }
    }
}

/// A named action a user might want to perform on a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Publish a new post into a section
    Post,
    /// Reply to a post
    Comment,
    /// Modify an existing item
    Edit,
    /// Publish markup that is exposed without being degraded to plaintext
    #[serde(rename = "unfiltered_html")]
    PublishMarkup,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Post => write!(f, "post"),
            Intent::Comment => write!(f, "comment"),
            Intent::Edit => write!(f, "edit"),
            Intent::PublishMarkup => write!(f, "unfiltered_html"),
        }
    }
}

/// Mapping of `content type -> intent -> permission name`.
///
/// # Examples
///
/// ```
/// use content_exposure::{CapabilityMap, ContentType, Intent};
///
/// let map = CapabilityMap::new().with(ContentType::Post, Intent::Edit, "edit_post");
///
/// assert_eq!(map.permission(ContentType::Post, Intent::Edit).unwrap(), "edit_post");
/// assert!(map.permission(ContentType::Post, Intent::Comment).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityMap(BTreeMap<ContentType, BTreeMap<Intent, String>>);

impl CapabilityMap {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table shipped with the crate.
    ///
    /// Covers every registered capability field and the unfiltered-markup
    /// intent on posts and comments.
    pub fn standard() -> Self {
        Self::new()
            .with(ContentType::Section, Intent::Post, "publish_posts")
            .with(ContentType::Post, Intent::Comment, "read")
            .with(ContentType::Post, Intent::Edit, "edit_post")
            .with(ContentType::Post, Intent::PublishMarkup, "unfiltered_html")
            .with(ContentType::Comment, Intent::Edit, "edit_comment")
            .with(ContentType::Comment, Intent::PublishMarkup, "unfiltered_html")
    }

    /// Adds or replaces a mapping, returning the updated table.
    pub fn with(
        mut self,
        content_type: ContentType,
        intent: Intent,
        permission: impl Into<String>,
    ) -> Self {
        self.0
            .entry(content_type)
            .or_default()
            .insert(intent, permission.into());
        self
    }

    /// Looks up the permission for a pair.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the pair is not mapped.
    pub fn permission(
        &self,
        content_type: ContentType,
        intent: Intent,
    ) -> Result<&str, ConfigurationError> {
        self.0
            .get(&content_type)
            .and_then(|intents| intents.get(&intent))
            .map(String::as_str)
            .ok_or_else(|| ConfigurationError::new(content_type, intent))
    }

    /// Checks that every pair is mapped, reporting the first that is not.
    pub fn ensure_covers(
        &self,
        pairs: impl IntoIterator<Item = (ContentType, Intent)>,
    ) -> Result<(), ConfigurationError> {
        for (content_type, intent) in pairs {
            self.permission(content_type, intent)?;
        }
        Ok(())
    }
}

/// Evaluates intents against the host's authorization check.
#[derive(Debug)]
pub struct CapabilityResolver<'a, A: ?Sized> {
    map: &'a CapabilityMap,
    authorizer: &'a A,
}

impl<'a, A: Authorizer + ?Sized> CapabilityResolver<'a, A> {
    /// Creates a resolver over a table and an authorizer.
    pub fn new(map: &'a CapabilityMap, authorizer: &'a A) -> Self {
        Self { map, authorizer }
    }

    /// Can `user` perform `intent` on the given content item?
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the pair is unmapped. The authorizer
    /// is not consulted in that case.
    pub fn can(
        &self,
        user: UserId,
        intent: Intent,
        content_type: ContentType,
        content_id: ContentId,
    ) -> Result<bool, ConfigurationError> {
        let permission = self.map.permission(content_type, intent)?;
        Ok(self
            .authorizer
            .has_permission(user, permission, content_id))
    }

    /// Same as [`can`](Self::can) for the request's authenticated principal.
    ///
    /// Anonymous requests still validate the mapping, then answer `false`.
    pub fn can_current_user(
        &self,
        ctx: &RequestContext,
        intent: Intent,
        content_type: ContentType,
        content_id: ContentId,
    ) -> Result<bool, ConfigurationError> {
        match ctx.current_user() {
            Some(user) => self.can(user, intent, content_type, content_id),
            None => {
                self.map.permission(content_type, intent)?;
                Ok(false)
            }
        }
    }
}
