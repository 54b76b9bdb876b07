//! Web boundary between the dispatch framework and the pipeline.
//!
//! Framework-specific code builds a [`RequestAdapter`] from its own request
//! type. From there:
//!
//! 1. [`extract`] yields a [`RequestContext`](crate::RequestContext) and the
//!    request's [`TaintedInputs`].
//! 2. [`pre_dispatch`] sanitizes the guest id and publishes it into the
//!    context, before the host resolves any entity.
//! 3. The host serializes entities through the pipeline.
//! 4. [`post_dispatch`] merges the descriptive headers into the
//!    [`RestResponse`].
//!
//! No framework types appear here and there is no global state; everything
//! request-scoped travels in the context value.

mod adapter;
mod extract;
mod middleware;
mod response;

pub use adapter::{RequestAdapter, TaintedInputs, GUEST_ID_PARAM, VIEW_PARAM};
pub use extract::{ExtractMetadata, ExtractTaintedInputs};
pub use middleware::{extract, post_dispatch, pre_dispatch, RequestExtraction};
pub use response::RestResponse;
