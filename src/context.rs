use std::fmt;

use crate::fields::ViewContext;
use crate::logging::RequestLog;
use crate::record::UserId;
use crate::request::{Principal, RequestMeta};
use crate::Verified;

/// A caller-supplied guest identifier that passed sanitization.
///
/// `Debug` does not print the identifier itself.
#[derive(Clone, PartialEq, Eq)]
pub struct GuestIdentity(String);

impl GuestIdentity {
    pub(crate) fn from_verified(id: Verified<String>) -> Self {
        Self(id.into_inner())
    }

    /// Returns the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GuestIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuestIdentity(..)")
    }
}

/// State scoped to one request.
///
/// Carries what the host authenticated, the view the response is rendered
/// for and the guest identity published by pre-dispatch. A context is never
/// shared between requests, so nothing published on it can leak into another
/// request.
///
/// # Examples
///
/// ```
/// use content_exposure::{Principal, RequestContext, RequestMeta, ViewContext};
///
/// let ctx = RequestContext::from_meta(RequestMeta {
///     request_id: "req-1".to_string(),
///     principal: Some(Principal { id: 4 }),
/// });
///
/// assert_eq!(ctx.current_user(), Some(4));
/// assert_eq!(ctx.view(), ViewContext::View);
/// assert!(ctx.guest().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    principal: Option<Principal>,
    view: ViewContext,
    guest: Option<GuestIdentity>,
    fields_registered: bool,
}

impl RequestContext {
    /// Creates a context in the default view.
    pub fn from_meta(meta: RequestMeta) -> Self {
        Self {
            request_id: meta.request_id,
            principal: meta.principal,
            view: ViewContext::default(),
            guest: None,
            fields_registered: false,
        }
    }

    /// Sets the view the response is rendered for.
    pub fn with_view(mut self, view: ViewContext) -> Self {
        self.view = view;
        self
    }

    /// Returns the request ID for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the authenticated principal, if any.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The acting user's id; `None` for anonymous requests.
    pub fn current_user(&self) -> Option<UserId> {
        self.principal
            .as_ref()
            .map(|principal| principal.id)
            .filter(|id| *id != 0)
    }

    /// Returns the view the response is rendered for.
    pub fn view(&self) -> ViewContext {
        self.view
    }

    /// The guest identity published for this request, if any.
    pub fn guest(&self) -> Option<&GuestIdentity> {
        self.guest.as_ref()
    }

    /// Returns a logger stamped with this request's id.
    pub fn log(&self) -> RequestLog<'_> {
        RequestLog::new(&self.request_id)
    }

    /// Publishes the guest identity. Only the first publication sticks.
    ///
    /// Returns `false` if an identity was already published.
    pub(crate) fn publish_guest(&mut self, guest: GuestIdentity) -> bool {
        if self.guest.is_some() {
            return false;
        }
        self.guest = Some(guest);
        true
    }

    /// Records that computed fields were registered for this request cycle.
    ///
    /// Returns `true` only the first time.
    pub(crate) fn mark_fields_registered(&mut self) -> bool {
        !std::mem::replace(&mut self.fields_registered, true)
    }
}
