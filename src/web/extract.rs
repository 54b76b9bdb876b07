//! Extraction boundary traits for dispatch framework integration.

use crate::request::RequestMeta;

use super::TaintedInputs;

/// Extracts request metadata from a framework-specific request.
///
/// Implementations only map types. They authenticate nothing and grant no
/// permissions; the principal is whatever the host already authenticated.
///
/// # Examples
///
/// ```
/// use content_exposure::web::ExtractMetadata;
/// use content_exposure::{Principal, RequestMeta};
///
/// struct FrameworkRequest {
///     request_id: String,
///     user: Option<u64>,
/// }
///
/// impl ExtractMetadata for FrameworkRequest {
///     fn extract_metadata(&self) -> RequestMeta {
///         RequestMeta {
///             request_id: self.request_id.clone(),
///             principal: self.user.map(|id| Principal { id }),
///         }
///     }
/// }
/// ```
pub trait ExtractMetadata {
    /// Returns the request id and authenticated principal.
    fn extract_metadata(&self) -> RequestMeta;
}

/// Extracts every caller-controlled input of a request as [`Tainted`](crate::Tainted).
///
/// Query string and body parameters both count as untrusted.
pub trait ExtractTaintedInputs {
    /// Returns the request's inputs, tainted.
    fn extract_tainted_inputs(&self) -> TaintedInputs;
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::request::Principal;
    use crate::web::RequestAdapter;

    struct TestRequest {
        id: String,
        user: Option<u64>,
        form: HashMap<String, String>,
    }

    impl ExtractMetadata for TestRequest {
        fn extract_metadata(&self) -> RequestMeta {
            RequestMeta {
                request_id: self.id.clone(),
                principal: self.user.map(|id| Principal { id }),
            }
        }
    }

    impl ExtractTaintedInputs for TestRequest {
        fn extract_tainted_inputs(&self) -> TaintedInputs {
            let mut adapter = RequestAdapter::new(self.id.clone());
            for (k, v) in &self.form {
                adapter.add_body_param(k.clone(), v.clone());
            }
            adapter.extract_tainted_inputs()
        }
    }

    #[test]
    fn extract_metadata_trait_works() {
        let req = TestRequest {
            id: "test-1".to_string(),
            user: Some(5),
            form: HashMap::new(),
        };

        let meta = req.extract_metadata();
        assert_eq!(meta.request_id, "test-1");
        assert_eq!(meta.principal, Some(Principal { id: 5 }));
    }

    #[test]
    fn extract_tainted_inputs_trait_works() {
        let req = TestRequest {
            id: "test-2".to_string(),
            user: None,
            form: HashMap::from([("guest_id".to_string(), "g1".to_string())]),
        };

        let inputs = req.extract_tainted_inputs();
        assert!(inputs.query_params().is_empty());
        assert_eq!(inputs.guest_ids().count(), 1);
    }
}
