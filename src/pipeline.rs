//! The response enrichment pipeline.
//!
//! One [`ResponsePipeline`] is built per installation and shared by every
//! request. Each request runs through a [`Dispatch`], whose stage parameter
//! makes the host contract's ordering a compile-time property:
//!
//! - pre-dispatch runs before any entity is resolved,
//! - fields are registered and entities serialized while resolving,
//! - post-dispatch runs last and consumes the dispatch.

use std::marker::PhantomData;

use serde_json::Value;

use crate::capability::CapabilityResolver;
use crate::config::ContentSource;
use crate::context::RequestContext;
use crate::error::{ConfigurationError, Error};
use crate::exposure::ExposurePolicy;
use crate::fields::{fields_for, FieldKind, RegisteredField, REGISTERED_FIELDS};
use crate::host::{FieldRegistrar, Host};
use crate::record::ContentRecord;
use crate::site::SiteIdentity;
use crate::state::{Received, Resolving};
use crate::web::{self, RequestAdapter, RestResponse, TaintedInputs};

/// Enriches REST representations of sections, posts and comments.
///
/// Immutable once built. It is `Send + Sync` whenever the host is, so one
/// pipeline can serve concurrent requests.
#[derive(Debug)]
pub struct ResponsePipeline<H> {
    source: ContentSource,
    host: H,
    site: SiteIdentity,
}

impl<H: Host> ResponsePipeline<H> {
    /// Builds the pipeline for an installation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the capability table misses a
    /// pair the pipeline checks.
    pub fn new(source: ContentSource, host: H) -> Result<Self, Error> {
        if let Err(err) = source.validate() {
            tracing::error!(source = %source.id, error = %err, "rejecting content source");
            return Err(err.into());
        }

        let site = SiteIdentity::new(host.home_url().as_deref());
        Ok(Self { source, host, site })
    }

    /// Returns the content source.
    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Returns the host collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Does `url` point at this installation?
    pub fn owns_url(&self, url: &str) -> bool {
        self.site.matches(url)
    }

    /// Starts processing one request.
    pub fn begin(&self, request: &RequestAdapter) -> Dispatch<'_, H, Received> {
        let web::RequestExtraction { context, inputs } = web::extract(request);

        Dispatch {
            pipeline: self,
            ctx: context,
            inputs,
            _stage: PhantomData,
        }
    }

    fn resolver(&self) -> CapabilityResolver<'_, H> {
        CapabilityResolver::new(&self.source.capabilities, &self.host)
    }

    /// Registers every computed field with the host's registrar.
    ///
    /// Runs once per request cycle; returns `false` when the fields were
    /// already registered for `ctx`.
    pub fn register_fields<R>(&self, ctx: &mut RequestContext, registrar: &mut R) -> bool
    where
        R: FieldRegistrar + ?Sized,
    {
        if !ctx.mark_fields_registered() {
            return false;
        }

        for field in REGISTERED_FIELDS {
            registrar.register_field(field.entity_type, field.attribute, field.schema());
        }
        ctx.log().debug(format_args!(
            "registered {} computed fields",
            REGISTERED_FIELDS.len()
        ));
        true
    }

    /// Computes one field's value for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a capability field's intent is not
    /// mapped for the record's type.
    pub fn compute_field(
        &self,
        ctx: &RequestContext,
        field: &RegisteredField,
        record: &ContentRecord,
    ) -> Result<Value, ConfigurationError> {
        match field.kind {
            FieldKind::Link => {
                let link = self.host.resolve_link(record.content_type, record.id);
                if !self.owns_url(&link) {
                    ctx.log().warn(format_args!(
                        "permalink for {} {} is outside this installation",
                        record.content_type, record.id
                    ));
                }
                Ok(Value::String(link))
            }
            FieldKind::Capability(intent) => self
                .resolver()
                .can_current_user(ctx, intent, record.content_type, record.id)
                .map(Value::Bool),
        }
    }

    /// Serializes one entity for the response.
    ///
    /// Adds the computed fields visible in the request's view, then applies
    /// the exposure policy to posts and comments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when a required capability mapping is
    /// missing. The error is logged before it propagates.
    pub fn serialize(
        &self,
        ctx: &RequestContext,
        record: &ContentRecord,
        data: Value,
    ) -> Result<Value, Error> {
        self.enrich(ctx, record, data).map_err(|err| {
            ctx.log().error(format_args!(
                "cannot serialize {} {}: {}",
                record.content_type, record.id, err
            ));
            Error::from(err)
        })
    }

    fn enrich(
        &self,
        ctx: &RequestContext,
        record: &ContentRecord,
        mut data: Value,
    ) -> Result<Value, ConfigurationError> {
        if let Value::Object(fields) = &mut data {
            let view = ctx.view();
            for field in fields_for(record.content_type) {
                if field.schema().visible_in(view) {
                    let value = self.compute_field(ctx, field, record)?;
                    fields.insert(field.attribute.to_string(), value);
                }
            }
        }

        if record.content_type.carries_content() {
            data = ExposurePolicy::new(self.resolver()).expose_entity(ctx, record, data)?;
        }
        Ok(data)
    }

    /// Merges the descriptive headers into a finished response.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHeader`] if a header document cannot be encoded.
    pub fn decorate(&self, response: RestResponse) -> Result<RestResponse, Error> {
        web::post_dispatch(response, &self.source, &self.host)
    }
}

/// One request moving through the pipeline.
///
/// ```text
/// Dispatch<Received> --pre_dispatch--> Dispatch<Resolving> --finish--> RestResponse
/// ```
///
/// Entities can only be serialized after pre-dispatch ran, and nothing can be
/// serialized once the response is finished.
///
/// # Examples
///
/// ```
/// use content_exposure::host::{Authorizer, PermalinkResolver, SiteSettings};
/// use content_exposure::web::{RequestAdapter, RestResponse};
/// use content_exposure::{ContentRecord, ContentSource, ContentType, ResponsePipeline};
///
/// struct Site;
///
/// impl Authorizer for Site {
///     fn has_permission(&self, _user: u64, _permission: &str, _scope: u64) -> bool {
///         false
///     }
/// }
///
/// impl PermalinkResolver for Site {
///     fn resolve_link(&self, content_type: ContentType, id: u64) -> String {
///         format!("https://example.com/{}/{}", content_type, id)
///     }
/// }
///
/// impl SiteSettings for Site {
///     fn home_url(&self) -> Option<String> {
///         Some("https://example.com".to_string())
///     }
///
///     fn users_can_register(&self) -> bool {
///         false
///     }
/// }
///
/// let pipeline = ResponsePipeline::new(ContentSource::new("blog"), Site).unwrap();
///
/// let mut adapter = RequestAdapter::new("req-1".to_string());
/// adapter.add_body_param("guest_id".to_string(), "7".to_string());
///
/// let (dispatch, ()) = pipeline.begin(&adapter).pre_dispatch(());
/// assert_eq!(dispatch.context().guest().map(|g| g.as_str()), Some("7"));
///
/// let record = ContentRecord::new(ContentType::Post, 1, "<p>Hello <script>bad()</script></p>")
///     .authored_by(2);
/// let body = dispatch.serialize(&record, serde_json::json!({"id": 1})).unwrap();
/// assert_eq!(body["content"]["rendered"], "Hello");
/// assert_eq!(body["has_html"], false);
///
/// let response = dispatch.finish(RestResponse::ok(body)).unwrap();
/// assert!(response.headers.contains_key("x-content-source-options"));
/// ```
#[derive(Debug)]
pub struct Dispatch<'p, H, S> {
    pipeline: &'p ResponsePipeline<H>,
    ctx: RequestContext,
    inputs: TaintedInputs,
    _stage: PhantomData<S>,
}

impl<'p, H, S> Dispatch<'p, H, S> {
    /// Returns the request context.
    pub fn context(&self) -> &RequestContext {
        &self.ctx
    }

    /// Returns the request's tainted inputs.
    pub fn inputs(&self) -> &TaintedInputs {
        &self.inputs
    }
}

impl<'p, H: Host> Dispatch<'p, H, Received> {
    /// Runs pre-dispatch and hands `passthrough` back unchanged.
    pub fn pre_dispatch<T>(mut self, passthrough: T) -> (Dispatch<'p, H, Resolving>, T) {
        let passthrough = web::pre_dispatch(passthrough, &self.inputs, &mut self.ctx);

        let next = Dispatch {
            pipeline: self.pipeline,
            ctx: self.ctx,
            inputs: self.inputs,
            _stage: PhantomData,
        };
        (next, passthrough)
    }
}

impl<'p, H: Host> Dispatch<'p, H, Resolving> {
    /// Registers the computed fields for this request cycle.
    pub fn register_fields<R>(&mut self, registrar: &mut R) -> bool
    where
        R: FieldRegistrar + ?Sized,
    {
        self.pipeline.register_fields(&mut self.ctx, registrar)
    }

    /// Serializes one entity. See [`ResponsePipeline::serialize`].
    pub fn serialize(&self, record: &ContentRecord, data: Value) -> Result<Value, Error> {
        self.pipeline.serialize(&self.ctx, record, data)
    }

    /// Runs post-dispatch and ends the request.
    pub fn finish(self, response: RestResponse) -> Result<RestResponse, Error> {
        let response = self.pipeline.decorate(response)?;
        self.ctx
            .log()
            .info(format_args!("response finished with status {}", response.status));
        Ok(response)
    }
}
