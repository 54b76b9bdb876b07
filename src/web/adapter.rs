//! Request adapter for mapping REST requests to pipeline types.

use std::collections::HashMap;

use crate::fields::ViewContext;
use crate::request::{Principal, RequestMeta};
use crate::Tainted;

use super::{ExtractMetadata, ExtractTaintedInputs};

/// Name of the request parameter carrying a guest identifier.
pub const GUEST_ID_PARAM: &str = "guest_id";

/// Name of the query parameter selecting the view context.
pub const VIEW_PARAM: &str = "context";

/// Framework-agnostic view of an incoming REST request.
///
/// Holds plain owned data so that any dispatch framework can build one.
/// The query and body parameters are caller-controlled and only leave the
/// adapter as [`Tainted`] values.
///
/// # Examples
///
/// ```
/// use content_exposure::web::{ExtractMetadata, ExtractTaintedInputs, RequestAdapter};
/// use content_exposure::Principal;
///
/// let mut adapter = RequestAdapter::new("req-12345".to_string());
/// adapter.set_principal(Some(Principal { id: 3 }));
/// adapter.add_query_param("guest_id".to_string(), "9".to_string());
/// adapter.add_body_param("guest_id".to_string(), "7".to_string());
///
/// let meta = adapter.extract_metadata();
/// assert_eq!(meta.request_id, "req-12345");
///
/// let inputs = adapter.extract_tainted_inputs();
/// assert_eq!(inputs.guest_ids().count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RequestAdapter {
    request_id: String,
    principal: Option<Principal>,
    query_params: HashMap<String, String>,
    body_params: HashMap<String, String>,
}

impl RequestAdapter {
    /// Creates an adapter with the given request id and no inputs.
    pub fn new(request_id: String) -> Self {
        Self {
            request_id,
            principal: None,
            query_params: HashMap::new(),
            body_params: HashMap::new(),
        }
    }

    /// Sets the principal the host authenticated.
    pub fn set_principal(&mut self, principal: Option<Principal>) {
        self.principal = principal;
    }

    /// Adds a query string parameter.
    pub fn add_query_param(&mut self, key: String, value: String) {
        self.query_params.insert(key, value);
    }

    /// Adds a form or JSON body parameter.
    pub fn add_body_param(&mut self, key: String, value: String) {
        self.body_params.insert(key, value);
    }

    /// Returns the request id.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns the principal, if present.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }
}

impl ExtractMetadata for RequestAdapter {
    fn extract_metadata(&self) -> RequestMeta {
        RequestMeta {
            request_id: self.request_id.clone(),
            principal: self.principal.clone(),
        }
    }
}

fn taint(params: &HashMap<String, String>) -> HashMap<String, Tainted<String>> {
    params
        .iter()
        .map(|(k, v)| (k.clone(), Tainted::new(v.clone())))
        .collect()
}

impl ExtractTaintedInputs for RequestAdapter {
    fn extract_tainted_inputs(&self) -> TaintedInputs {
        TaintedInputs {
            query_params: taint(&self.query_params),
            body_params: taint(&self.body_params),
        }
    }
}

/// Caller-controlled inputs of one request, all tainted.
///
/// Read-only. Values must pass a [`Sanitizer`](crate::Sanitizer) before use.
#[derive(Debug, Clone, Default)]
pub struct TaintedInputs {
    query_params: HashMap<String, Tainted<String>>,
    body_params: HashMap<String, Tainted<String>>,
}

impl TaintedInputs {
    /// Returns the tainted query parameters.
    pub fn query_params(&self) -> &HashMap<String, Tainted<String>> {
        &self.query_params
    }

    /// Returns the tainted body parameters.
    pub fn body_params(&self) -> &HashMap<String, Tainted<String>> {
        &self.body_params
    }

    /// The caller-supplied guest ids in precedence order: the body
    /// parameter first, then the query parameter.
    pub fn guest_ids(&self) -> impl Iterator<Item = &Tainted<String>> {
        [
            self.body_params.get(GUEST_ID_PARAM),
            self.query_params.get(GUEST_ID_PARAM),
        ]
        .into_iter()
        .flatten()
    }

    /// The view context requested through the query string.
    ///
    /// Unknown or missing values fall back to [`ViewContext::View`].
    pub fn view(&self) -> ViewContext {
        self.query_params
            .get(VIEW_PARAM)
            .cloned()
            .map(Tainted::into_inner)
            .and_then(|value| ViewContext::from_param(&value))
            .unwrap_or_default()
    }
}
