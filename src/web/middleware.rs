//! Dispatch hooks run around the host's entity resolution.
//!
//! ```text
//! REST request
//!   ↓
//! extract()          RequestContext + TaintedInputs
//!   ↓
//! pre_dispatch()     guest id sanitized and published
//!   ↓
//! host resolves and serializes entities
//!   ↓
//! post_dispatch()    descriptive headers merged
//! ```
//!
//! Nothing here grants permissions. The hooks only move sanitized request
//! inputs into the request context and decorate the outgoing response.

use crate::config::ContentSource;
use crate::context::{GuestIdentity, RequestContext};
use crate::error::Error;
use crate::host::SiteSettings;
use crate::options::{descriptive_headers, SourceFeatures, SourceOptions};
use crate::{GuestIdSanitizer, Sanitizer};

use super::{ExtractMetadata, ExtractTaintedInputs, RequestAdapter, RestResponse, TaintedInputs};

/// A fresh request context paired with the request's tainted inputs.
#[derive(Debug)]
pub struct RequestExtraction {
    /// Context in the view the request asked for
    pub context: RequestContext,
    /// All caller-controlled inputs
    pub inputs: TaintedInputs,
}

/// Builds the request context for one request.
///
/// # Examples
///
/// ```
/// use content_exposure::web::{extract, RequestAdapter};
/// use content_exposure::ViewContext;
///
/// let mut adapter = RequestAdapter::new("req-001".to_string());
/// adapter.add_query_param("context".to_string(), "edit".to_string());
///
/// let extraction = extract(&adapter);
/// assert_eq!(extraction.context.request_id(), "req-001");
/// assert_eq!(extraction.context.view(), ViewContext::Edit);
/// assert!(extraction.context.guest().is_none());
/// ```
pub fn extract(adapter: &RequestAdapter) -> RequestExtraction {
    let meta = adapter.extract_metadata();
    let inputs = adapter.extract_tainted_inputs();

    RequestExtraction {
        context: RequestContext::from_meta(meta).with_view(inputs.view()),
        inputs,
    }
}

/// Publishes the caller's guest identity into the request context.
///
/// The body `guest_id` is tried first, then the query `guest_id`; the first
/// one that passes [`GuestIdSanitizer`] is published. A rejected value is
/// dropped with a warning naming the failed rule, so a blank body value
/// falls through to the query. Ids longer than
/// [`GuestIdSanitizer::DEFAULT_MAX_LEN`] bytes are rejected the same way.
/// With no `guest_id` at all the context is left untouched. `passthrough`
/// is returned as is.
///
/// # Examples
///
/// ```
/// use content_exposure::web::{extract, pre_dispatch, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-002".to_string());
/// adapter.add_body_param("guest_id".to_string(), "7".to_string());
/// adapter.add_query_param("guest_id".to_string(), "9".to_string());
///
/// let mut extraction = extract(&adapter);
/// let passthrough = pre_dispatch("unchanged", &extraction.inputs, &mut extraction.context);
///
/// assert_eq!(passthrough, "unchanged");
/// assert_eq!(extraction.context.guest().map(|g| g.as_str()), Some("7"));
/// ```
pub fn pre_dispatch<T>(passthrough: T, inputs: &TaintedInputs, ctx: &mut RequestContext) -> T {
    let sanitizer = GuestIdSanitizer::default();

    for tainted in inputs.guest_ids() {
        match sanitizer.sanitize(tainted.clone()) {
            Ok(verified) => {
                if ctx.publish_guest(GuestIdentity::from_verified(verified)) {
                    ctx.log().debug(format_args!("guest identity published"));
                } else {
                    ctx.log()
                        .debug(format_args!("guest identity already published, keeping first"));
                }
                break;
            }
            Err(err) => {
                ctx.log()
                    .warn(format_args!("guest identity rejected: {}", err.kind()));
            }
        }
    }

    passthrough
}

/// Merges the options and features documents into the response headers.
///
/// Headers the response already carries are left alone.
///
/// # Errors
///
/// Returns [`Error::InvalidHeader`] if a document cannot be carried as a
/// header value.
pub fn post_dispatch<S>(
    mut response: RestResponse,
    source: &ContentSource,
    settings: &S,
) -> Result<RestResponse, Error>
where
    S: SiteSettings + ?Sized,
{
    let headers = descriptive_headers(&SourceOptions::of(source), &SourceFeatures::of(settings))?;
    response.merge_headers(headers);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;
    use serde_json::json;

    use super::*;
    use crate::options::{FEATURES_HEADER, OPTIONS_HEADER};
    use crate::request::Principal;

    struct OpenSite;

    impl SiteSettings for OpenSite {
        fn home_url(&self) -> Option<String> {
            Some("https://example.com".to_string())
        }

        fn users_can_register(&self) -> bool {
            true
        }
    }

    fn extraction_with(body: Option<&str>, query: Option<&str>) -> RequestExtraction {
        let mut adapter = RequestAdapter::new("req-mw".to_string());
        if let Some(value) = body {
            adapter.add_body_param("guest_id".to_string(), value.to_string());
        }
        if let Some(value) = query {
            adapter.add_query_param("guest_id".to_string(), value.to_string());
        }
        extract(&adapter)
    }

    #[test]
    fn extract_keeps_principal() {
        let mut adapter = RequestAdapter::new("req-auth".to_string());
        adapter.set_principal(Some(Principal { id: 8 }));

        let extraction = extract(&adapter);

        assert_eq!(extraction.context.current_user(), Some(8));
    }

    #[test]
    fn body_guest_id_takes_precedence() {
        let mut extraction = extraction_with(Some("7"), Some("9"));

        pre_dispatch((), &extraction.inputs, &mut extraction.context);

        assert_eq!(extraction.context.guest().map(GuestIdentity::as_str), Some("7"));
    }

    #[test]
    fn query_guest_id_is_fallback() {
        let mut extraction = extraction_with(None, Some("9"));

        pre_dispatch((), &extraction.inputs, &mut extraction.context);

        assert_eq!(extraction.context.guest().map(GuestIdentity::as_str), Some("9"));
    }

    #[test]
    fn blank_guest_id_is_not_published() {
        let mut extraction = extraction_with(Some("   "), None);

        pre_dispatch((), &extraction.inputs, &mut extraction.context);

        assert!(extraction.context.guest().is_none());
    }

    #[test]
    fn blank_body_guest_id_falls_through_to_query() {
        let mut extraction = extraction_with(Some(""), Some("9"));

        pre_dispatch((), &extraction.inputs, &mut extraction.context);

        assert_eq!(extraction.context.guest().map(GuestIdentity::as_str), Some("9"));
    }

    #[test]
    fn rejected_body_guest_id_falls_through_to_query() {
        let mut extraction = extraction_with(Some("bell\u{7}"), Some("9"));

        pre_dispatch((), &extraction.inputs, &mut extraction.context);

        assert_eq!(extraction.context.guest().map(GuestIdentity::as_str), Some("9"));
    }

    #[test]
    fn guest_id_length_is_capped() {
        let longest = "g".repeat(GuestIdSanitizer::DEFAULT_MAX_LEN);
        let mut at_cap = extraction_with(Some(&longest), None);
        pre_dispatch((), &at_cap.inputs, &mut at_cap.context);
        assert_eq!(at_cap.context.guest().map(GuestIdentity::as_str), Some(longest.as_str()));

        let oversized = "g".repeat(200);
        let mut over = extraction_with(Some(&oversized), None);
        pre_dispatch((), &over.inputs, &mut over.context);
        assert!(over.context.guest().is_none());
    }

    #[test]
    fn missing_guest_id_leaves_prior_state() {
        let mut first = extraction_with(Some("7"), None);
        pre_dispatch((), &first.inputs, &mut first.context);

        let empty = extraction_with(None, None);
        let passthrough = pre_dispatch(42, &empty.inputs, &mut first.context);

        assert_eq!(passthrough, 42);
        assert_eq!(first.context.guest().map(GuestIdentity::as_str), Some("7"));
    }

    #[test]
    fn post_dispatch_adds_documents() {
        let source = ContentSource::new("blog").with_roots(2, 1);

        let response = post_dispatch(RestResponse::ok(json!({})), &source, &OpenSite)
            .expect("headers encode");

        assert_eq!(
            response.headers[OPTIONS_HEADER],
            r#"{"container_id":"blog","root_section_id":2,"root_parent_id":1}"#
        );
        assert_eq!(response.headers[FEATURES_HEADER], r#"{"can_users_register":true}"#);
    }

    #[test]
    fn post_dispatch_never_overwrites() {
        let source = ContentSource::new("blog");
        let mut response = RestResponse::ok(json!({}));
        response
            .headers
            .insert(OPTIONS_HEADER, HeaderValue::from_static("upstream"));

        let response = post_dispatch(response, &source, &OpenSite).expect("headers encode");

        assert_eq!(response.headers[OPTIONS_HEADER], "upstream");
        assert!(response.headers.contains_key(FEATURES_HEADER));
    }
}
