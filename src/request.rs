use crate::record::UserId;

/// Metadata about an incoming request.
///
/// Contains the request identifier and the principal the host authenticated,
/// if any.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Authenticated principal, if any
    pub principal: Option<Principal>,
}

/// A user the host authenticated for this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Host user identifier
    pub id: UserId,
}
