//! Content exposure policy and response enrichment for a CMS REST API.
//!
//! Decides, per content item, whether an author's markup reaches clients
//! intact or is degraded to plaintext, and enriches outgoing representations
//! with computed links, capability flags and descriptive headers.
//!
//! # Core Types
//!
//! - [`ResponsePipeline`]: per-installation pipeline shared by all requests
//! - [`Dispatch`]: one request, moving `Received -> Resolving -> response`
//! - [`ExposurePolicy`]: the markup-or-plaintext decision
//! - [`CapabilityMap`]: intent to permission table, per content type
//! - [`Tainted<T>`] / [`Verified<T>`]: request inputs before and after sanitization
//! - [`RequestContext`]: request-scoped state, including the guest identity
//!
//! # Examples
//!
//! ```
//! use content_exposure::markup::{detects_markup, to_plaintext};
//!
//! let rendered = "<p>Hello <script>bad()</script></p>";
//! let plaintext = to_plaintext(rendered);
//!
//! assert_eq!(plaintext, "Hello");
//! assert!(detects_markup(rendered, &plaintext));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod capability;
mod config;
mod context;
mod error;
mod exposure;
mod fields;
pub mod host;
mod logging;
pub mod markup;
pub mod options;
mod pipeline;
mod record;
mod request;
mod sanitizer;
mod site;
mod state;
mod tainted;
mod verified;
pub mod web;

pub use capability::{CapabilityMap, CapabilityResolver, ContentType, Intent};
pub use config::ContentSource;
pub use context::{GuestIdentity, RequestContext};
pub use error::{ConfigurationError, Error};
pub use exposure::{ExposureDecision, ExposurePolicy, ExposureSource};
pub use fields::{
    fields_for, FieldKind, FieldSchema, FieldType, RegisteredField, ViewContext,
    REGISTERED_FIELDS,
};
pub use logging::RequestLog;
pub use pipeline::{Dispatch, ResponsePipeline};
pub use record::{ContentId, ContentRecord, UserId};
pub use request::{Principal, RequestMeta};
pub use sanitizer::{GuestIdSanitizer, SanitizationError, SanitizationErrorKind, Sanitizer};
pub use site::SiteIdentity;
pub use state::{Received, Resolving};
pub use tainted::Tainted;
pub use verified::Verified;
