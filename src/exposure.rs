//! The content exposure policy.
//!
//! Decides whether an item's markup may reach the client intact or must be
//! degraded to its plaintext projection, and rewrites outgoing post and
//! comment representations accordingly.
//!
//! Markup is exposed only when two things hold: the content carries semantic
//! markup ([`detects_markup`]) and its author holds the unfiltered-markup
//! intent. Everything else is served as plaintext.

use serde_json::{Map, Value};

use crate::capability::{CapabilityResolver, ContentType, Intent};
use crate::context::RequestContext;
use crate::error::ConfigurationError;
use crate::host::Authorizer;
use crate::markup::{detects_markup, to_plaintext};
use crate::record::{ContentId, ContentRecord, UserId};

/// How a piece of content is exposed to the requester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposureDecision {
    /// Content to place in the response
    pub rendered: String,
    /// Whether `rendered` is markup rather than plaintext
    pub has_html: bool,
}

/// Where the content being classified came from.
///
/// The policy prefers a representation the host already rendered. Only when
/// none was supplied does it fall back to the stored raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExposureSource<'a> {
    /// Rendered by the host, either on the outgoing representation or on the record
    Rendered(&'a str),
    /// The author's stored content
    Stored(&'a str),
}

impl<'a> ExposureSource<'a> {
    /// Picks the source for an outgoing representation.
    ///
    /// `content.rendered` on the representation wins, then the record's
    /// host-rendered snapshot, then the stored raw content.
    pub fn select(fields: &'a Map<String, Value>, record: &'a ContentRecord) -> Self {
        let on_representation = fields
            .get("content")
            .and_then(|content| content.get("rendered"))
            .and_then(Value::as_str);

        match on_representation.or(record.rendered_content.as_deref()) {
            Some(rendered) => ExposureSource::Rendered(rendered),
            None => ExposureSource::Stored(&record.raw_content),
        }
    }

    /// Returns the content itself.
    pub fn as_str(&self) -> &'a str {
        match *self {
            ExposureSource::Rendered(content) | ExposureSource::Stored(content) => content,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Plain,
    Trusted,
    Downgraded,
}

/// Applies the exposure rules using a capability resolver.
#[derive(Debug)]
pub struct ExposurePolicy<'a, A: ?Sized> {
    resolver: CapabilityResolver<'a, A>,
}

impl<'a, A: Authorizer + ?Sized> ExposurePolicy<'a, A> {
    /// Creates the policy over a resolver.
    pub fn new(resolver: CapabilityResolver<'a, A>) -> Self {
        Self { resolver }
    }

    /// Decides how `content` by `author` is exposed.
    ///
    /// Markup survives only if it is detected and the author holds the
    /// unfiltered-markup intent on the item. An absent author never does.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] when the unfiltered-markup intent is not
    /// mapped for `content_type` and markup was detected.
    pub fn resolve(
        &self,
        content: &str,
        author: Option<UserId>,
        content_type: ContentType,
        content_id: ContentId,
    ) -> Result<ExposureDecision, ConfigurationError> {
        self.evaluate(content, author, content_type, content_id)
            .map(|(decision, _)| decision)
    }

    fn evaluate(
        &self,
        content: &str,
        author: Option<UserId>,
        content_type: ContentType,
        content_id: ContentId,
    ) -> Result<(ExposureDecision, Verdict), ConfigurationError> {
        let plaintext = to_plaintext(content);

        let verdict = if !detects_markup(content, &plaintext) {
            Verdict::Plain
        } else if self.author_may_publish_markup(author, content_type, content_id)? {
            Verdict::Trusted
        } else {
            Verdict::Downgraded
        };

        let decision = match verdict {
            Verdict::Trusted => ExposureDecision {
                rendered: content.to_string(),
                has_html: true,
            },
            Verdict::Plain | Verdict::Downgraded => ExposureDecision {
                rendered: plaintext,
                has_html: false,
            },
        };
        Ok((decision, verdict))
    }

    fn author_may_publish_markup(
        &self,
        author: Option<UserId>,
        content_type: ContentType,
        content_id: ContentId,
    ) -> Result<bool, ConfigurationError> {
        match author.filter(|id| *id != 0) {
            Some(author) => {
                self.resolver
                    .can(author, Intent::PublishMarkup, content_type, content_id)
            }
            None => Ok(false),
        }
    }

    /// Rewrites an outgoing post or comment representation.
    ///
    /// Sets `content.rendered` and `has_html` from the decision, strips all
    /// markup from a post's `title.rendered`, and attaches `comment_count`
    /// when the record carries one. Representations that are not JSON objects
    /// are returned unchanged.
    pub fn expose_entity(
        &self,
        ctx: &RequestContext,
        record: &ContentRecord,
        data: Value,
    ) -> Result<Value, ConfigurationError> {
        let mut fields = match data {
            Value::Object(fields) => fields,
            other => return Ok(other),
        };

        let source = ExposureSource::select(&fields, record);
        let (decision, verdict) =
            self.evaluate(source.as_str(), record.author(), record.content_type, record.id)?;

        if verdict == Verdict::Downgraded {
            ctx.log().debug(format_args!(
                "markup downgraded to plaintext for {} {} (author lacks unfiltered markup)",
                record.content_type, record.id
            ));
        }

        set_rendered(&mut fields, "content", decision.rendered);
        fields.insert("has_html".to_string(), Value::Bool(decision.has_html));

        if record.content_type == ContentType::Post {
            if let Some(Value::String(title)) = fields
                .get_mut("title")
                .and_then(|title| title.get_mut("rendered"))
            {
                *title = to_plaintext(title);
            }
        }

        if let Some(count) = record.comment_count {
            fields.insert("comment_count".to_string(), Value::from(count));
        }

        Ok(Value::Object(fields))
    }
}

fn set_rendered(fields: &mut Map<String, Value>, key: &str, rendered: String) {
    let slot = fields
        .entry(key)
        .or_insert_with(|| Value::Object(Map::new()));

    match slot {
        Value::Object(inner) => {
            inner.insert("rendered".to_string(), Value::String(rendered));
        }
        other => {
            let mut inner = Map::new();
            inner.insert("rendered".to_string(), Value::String(rendered));
            *other = Value::Object(inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::capability::CapabilityMap;
    use crate::request::RequestMeta;

    struct Grants(HashSet<(UserId, &'static str)>);

    impl Authorizer for Grants {
        fn has_permission(&self, user: UserId, permission: &str, _scope: ContentId) -> bool {
            self.0.iter().any(|(u, p)| *u == user && *p == permission)
        }
    }

    fn trusted(user: UserId) -> Grants {
        Grants([(user, "unfiltered_html")].into_iter().collect())
    }

    fn ctx() -> RequestContext {
        RequestContext::from_meta(RequestMeta {
            request_id: "req-exposure".to_string(),
            principal: None,
        })
    }

    const SCRIPTED: &str = "<p>Hello <script>bad()</script></p>";

    #[test]
    fn untrusted_author_gets_plaintext() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));

        let decision = policy
            .resolve(SCRIPTED, Some(2), ContentType::Post, 10)
            .expect("mapped");

        assert_eq!(
            decision,
            ExposureDecision {
                rendered: "Hello".to_string(),
                has_html: false,
            }
        );
    }

    #[test]
    fn trusted_author_keeps_markup() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));
        let content = "<p>Some <strong>bold</strong> words</p>";

        let decision = policy
            .resolve(content, Some(1), ContentType::Comment, 4)
            .expect("mapped");

        assert!(decision.has_html);
        assert_eq!(decision.rendered, content);
    }

    #[test]
    fn anonymous_author_never_keeps_markup() {
        let map = CapabilityMap::standard();
        let grants = trusted(0);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));

        for author in [None, Some(0)] {
            let decision = policy
                .resolve("<em>hi</em>", author, ContentType::Comment, 4)
                .expect("mapped");
            assert!(!decision.has_html);
            assert_eq!(decision.rendered, "hi");
        }
    }

    #[test]
    fn decoration_only_content_is_plaintext_even_for_trusted_authors() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));

        let decision = policy
            .resolve("<p>one</p><p>two</p>", Some(1), ContentType::Post, 1)
            .expect("mapped");

        assert!(!decision.has_html);
        assert_eq!(decision.rendered, "one two");
    }

    #[test]
    fn missing_markup_mapping_fails_loudly() {
        let map = CapabilityMap::new();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));

        let err = policy
            .resolve("<em>x</em>", Some(1), ContentType::Post, 1)
            .unwrap_err();

        assert_eq!(err.intent(), Intent::PublishMarkup);
    }

    #[test]
    fn source_prefers_representation_then_record_then_stored() {
        let record = ContentRecord::new(ContentType::Post, 1, "stored");
        let with_rendered = record.clone().rendered("host rendered");

        let fields = json!({"content": {"rendered": "outgoing"}});
        let fields = fields.as_object().expect("object");
        assert_eq!(
            ExposureSource::select(fields, &with_rendered),
            ExposureSource::Rendered("outgoing")
        );

        let empty = Map::new();
        assert_eq!(
            ExposureSource::select(&empty, &with_rendered),
            ExposureSource::Rendered("host rendered")
        );
        assert_eq!(
            ExposureSource::select(&empty, &record),
            ExposureSource::Stored("stored")
        );
    }

    #[test]
    fn expose_post_rewrites_content_and_title() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));
        let record = ContentRecord::new(ContentType::Post, 10, "raw")
            .authored_by(2)
            .with_comment_count(3);
        let data = json!({
            "id": 10,
            "content": {"rendered": SCRIPTED, "protected": false},
            "title": {"rendered": "<em>Big</em> &amp; bold"},
        });

        let out = policy.expose_entity(&ctx(), &record, data).expect("mapped");

        assert_eq!(out["content"]["rendered"], "Hello");
        assert_eq!(out["content"]["protected"], false);
        assert_eq!(out["has_html"], false);
        assert_eq!(out["title"]["rendered"], "Big & bold");
        assert_eq!(out["comment_count"], 3);
        assert_eq!(out["id"], 10);
    }

    #[test]
    fn expose_comment_leaves_title_alone() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));
        let record = ContentRecord::new(ContentType::Comment, 5, "<code>x</code>").authored_by(1);
        let data = json!({"title": {"rendered": "<b>kept</b>"}});

        let out = policy.expose_entity(&ctx(), &record, data).expect("mapped");

        assert_eq!(out["content"]["rendered"], "<code>x</code>");
        assert_eq!(out["has_html"], true);
        assert_eq!(out["title"]["rendered"], "<b>kept</b>");
        assert!(out.get("comment_count").is_none());
    }

    #[test]
    fn expose_replaces_non_object_content() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));
        let record = ContentRecord::new(ContentType::Comment, 5, "plain words");
        let data = json!({"content": "legacy string"});

        let out = policy.expose_entity(&ctx(), &record, data).expect("mapped");

        assert_eq!(out["content"]["rendered"], "plain words");
    }

    #[test]
    fn non_object_representation_passes_through() {
        let map = CapabilityMap::standard();
        let grants = trusted(1);
        let policy = ExposurePolicy::new(CapabilityResolver::new(&map, &grants));
        let record = ContentRecord::new(ContentType::Post, 1, "x");

        let out = policy
            .expose_entity(&ctx(), &record, json!([1, 2]))
            .expect("mapped");

        assert_eq!(out, json!([1, 2]));
    }
}
