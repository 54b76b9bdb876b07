//! Type-state markers for a request's dispatch lifecycle.
//!
//! A [`Dispatch`](crate::Dispatch) moves through these stages in order, and
//! each operation is only available on the stage where the host contract
//! allows it:
//!
//! ```text
//! Dispatch<Received> --pre_dispatch--> Dispatch<Resolving> --finish--> RestResponse
//! ```

/// The request arrived; nothing has run yet.
#[derive(Debug, Clone, Copy)]
pub struct Received {
    _private: (),
}

/// Pre-dispatch ran; the host is resolving and serializing entities.
///
/// Only the pipeline can produce this stage:
///
/// ```compile_fail
/// use content_exposure::Resolving;
///
/// let skipped = Resolving { _private: () };
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolving {
    _private: (),
}
