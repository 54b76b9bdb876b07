//! Collaborator interfaces supplied by the surrounding CMS host.
//!
//! The crate performs no I/O of its own. Storage, authentication, permalink
//! resolution and the dispatch framework's field registry all sit behind
//! these traits, and any concurrency contract is theirs to define.

use crate::capability::ContentType;
use crate::fields::FieldSchema;
use crate::record::{ContentId, UserId};

/// The host's authorization check.
pub trait Authorizer {
    /// Does `user` hold `permission` for the content item `scope`?
    fn has_permission(&self, user: UserId, permission: &str, scope: ContentId) -> bool;
}

/// Resolves canonical links for content items.
pub trait PermalinkResolver {
    /// Returns the public URL of the item.
    fn resolve_link(&self, content_type: ContentType, id: ContentId) -> String;
}

/// Installation-wide settings read from the host's storage layer.
pub trait SiteSettings {
    /// The installation's canonical home URL, if one is configured.
    fn home_url(&self) -> Option<String>;

    /// Whether visitors may register accounts.
    fn users_can_register(&self) -> bool;
}

/// The dispatch framework's registry of computed response fields.
pub trait FieldRegistrar {
    /// Advertises a computed attribute on an entity type.
    fn register_field(
        &mut self,
        entity_type: ContentType,
        attribute: &'static str,
        schema: FieldSchema,
    );
}

/// Everything the pipeline needs from the host, as one bound.
pub trait Host: Authorizer + PermalinkResolver + SiteSettings {}

impl<T: Authorizer + PermalinkResolver + SiteSettings> Host for T {}
