use crate::capability::ContentType;

/// Identifier of a user known to the host.
pub type UserId = u64;

/// Identifier of a content item known to the host.
pub type ContentId = u64;

/// Read-only snapshot of a stored content item, supplied by the host.
///
/// Valid for the duration of one request. Nothing in this crate mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    /// What kind of item this is
    pub content_type: ContentType,
    /// Host identifier of the item
    pub id: ContentId,
    /// Content as stored by the author
    pub raw_content: String,
    /// Host-rendered content, if the host already rendered it
    pub rendered_content: Option<String>,
    /// Authoring user; `None` or `0` for anonymous content
    pub author_id: Option<UserId>,
    /// Number of comments attached to the item (or to its post, for comments)
    pub comment_count: Option<u64>,
}

impl ContentRecord {
    /// Creates a record with only the stored content set.
    pub fn new(content_type: ContentType, id: ContentId, raw_content: impl Into<String>) -> Self {
        Self {
            content_type,
            id,
            raw_content: raw_content.into(),
            rendered_content: None,
            author_id: None,
            comment_count: None,
        }
    }

    /// Sets the author.
    pub fn authored_by(mut self, author: UserId) -> Self {
        self.author_id = Some(author);
        self
    }

    /// Sets the host-rendered content.
    pub fn rendered(mut self, rendered: impl Into<String>) -> Self {
        self.rendered_content = Some(rendered.into());
        self
    }

    /// Sets the comment count.
    pub fn with_comment_count(mut self, count: u64) -> Self {
        self.comment_count = Some(count);
        self
    }

    /// The author, treating `0` as "no author".
    pub fn author(&self) -> Option<UserId> {
        self.author_id.filter(|id| *id != 0)
    }
}
