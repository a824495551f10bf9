//! Request binder orchestration
//!
//! The binder owns its collaborators - payload resolver, validator, error
//! response providers - through explicit constructor injection. Per request
//! it resolves the payload, constructs the request object, validates it, and
//! either hands the object to the handler or short-circuits with an error
//! response. Binding is sequential and keeps no state across requests.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::payload::{HttpPayloadResolver, Payload, PayloadError, PayloadResolver};
use crate::request::RequestObject;
use crate::respond::{DefaultErrorResponseProvider, ErrorResponseProvider};
use crate::validator::{RuleValidator, Validator};
use crate::violations::{Violation, ViolationList};

/// Largest request body the binder will buffer.
const MAX_PAYLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Bound request object, recorded in the request extensions for downstream
/// inspection.
#[derive(Debug, Clone)]
pub struct BoundRequestObject<T>(pub T);

/// Violation list recorded in the request extensions after binding.
#[derive(Debug, Clone)]
pub struct BoundViolations(pub ViolationList);

/// Fatal configuration error: the payload is invalid, the handler takes no
/// violation list, and no error response provider is resolvable for the
/// request-object type. This is a programming error, not a runtime one.
#[derive(Debug, Error)]
#[error("request payload for `{type_name}` is invalid and no error response provider is configured")]
pub struct InvalidRequestPayload {
    pub type_name: &'static str,
    pub errors: ViolationList,
}

/// Terminal outcome of a binder invocation.
#[derive(Debug)]
pub enum BindOutcome<R> {
    /// The handler ran; its result is carried through.
    Handled(R),
    /// Validation failed and an error response provider answered; the
    /// handler was never invoked.
    ErrorResponse(Response),
}

impl<R> BindOutcome<R> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }
}

impl<R: IntoResponse> IntoResponse for BindOutcome<R> {
    fn into_response(self) -> Response {
        match self {
            Self::Handled(result) => result.into_response(),
            Self::ErrorResponse(response) => response,
        }
    }
}

/// Binds incoming requests to request-object types.
///
/// Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct RequestBinder {
    payload_resolver: Arc<dyn PayloadResolver>,
    validator: Arc<dyn Validator>,
    default_responder: Option<Arc<dyn ErrorResponseProvider>>,
    responders: Arc<HashMap<TypeId, Arc<dyn ErrorResponseProvider>>>,
}

impl RequestBinder {
    /// Binder with explicit collaborators and no default error response
    /// provider. Invalid payloads bound to handlers without a violation-list
    /// parameter then fail with [`InvalidRequestPayload`] unless the type
    /// declares or registers its own provider.
    pub fn new(
        payload_resolver: impl PayloadResolver + 'static,
        validator: impl Validator + 'static,
    ) -> Self {
        Self::builder()
            .payload_resolver(payload_resolver)
            .validator(validator)
            .build()
    }

    pub fn builder() -> RequestBinderBuilder {
        RequestBinderBuilder::new()
    }

    /// Binds the request to `T` and invokes `handler` with the validated
    /// object. On validation failure the handler is skipped and the resolved
    /// provider's response is returned instead.
    pub async fn bind<T, H, R>(
        &self,
        request: Request,
        handler: H,
    ) -> Result<BindOutcome<R>, InvalidRequestPayload>
    where
        T: RequestObject,
        H: FnOnce(Request, T) -> R,
    {
        let (mut parts, body) = request.into_parts();
        let (object, errors) = self.resolve::<T>(&mut parts, buffer_body(body).await).await;
        let request = Request::from_parts(parts, Body::empty());

        if errors.is_empty() {
            return Ok(BindOutcome::Handled(handler(request, object)));
        }

        let response = self.error_response_for::<T>(&errors)?;
        Ok(BindOutcome::ErrorResponse(response))
    }

    /// Binds the request to `T` and invokes `handler` with the object and
    /// the (possibly empty) violation list. The handler owns the error case
    /// and is never skipped.
    pub async fn bind_with_errors<T, H, R>(&self, request: Request, handler: H) -> BindOutcome<R>
    where
        T: RequestObject,
        H: FnOnce(Request, T, ViolationList) -> R,
    {
        let (mut parts, body) = request.into_parts();
        let (object, errors) = self.resolve::<T>(&mut parts, buffer_body(body).await).await;
        let request = Request::from_parts(parts, Body::empty());

        BindOutcome::Handled(handler(request, object, errors))
    }

    /// Resolves the payload, constructs and validates the request object,
    /// and records both object and violations in the request extensions.
    ///
    /// Payload-resolution failures fold into a single violation at path
    /// `body`; rule evaluation is skipped for an unparseable payload.
    pub(crate) async fn resolve<T: RequestObject>(
        &self,
        parts: &mut Parts,
        body: Result<Bytes, PayloadError>,
    ) -> (T, ViolationList) {
        let resolved = match body {
            Ok(bytes) => match T::extract_payload(parts, &bytes) {
                Some(payload) => Ok(payload),
                None => self.payload_resolver.resolve_payload(parts, &bytes).await,
            },
            Err(err) => Err(err),
        };

        let (payload, errors) = match resolved {
            Ok(payload) => {
                let rules = T::rules(&payload);
                let errors = self.validator.validate(&payload, &rules);
                (payload, errors)
            }
            Err(err) => {
                let errors: ViolationList =
                    vec![Violation::new("body", err.to_string())].into();
                (Payload::new(), errors)
            }
        };

        let object = T::from_payload(payload);
        parts.extensions.insert(BoundRequestObject(object.clone()));
        parts.extensions.insert(BoundViolations(errors.clone()));
        tracing::debug!(
            request_object = type_name::<T>(),
            valid = errors.is_empty(),
            "request object bound"
        );

        (object, errors)
    }

    /// Resolves the provider chain for `T` and produces the error response,
    /// or the fatal configuration error when no provider applies.
    pub(crate) fn error_response_for<T: RequestObject>(
        &self,
        errors: &ViolationList,
    ) -> Result<Response, InvalidRequestPayload> {
        match self.responder_for::<T>() {
            Some(responder) => {
                tracing::warn!(
                    request_object = type_name::<T>(),
                    violations = errors.len(),
                    "request payload rejected"
                );
                Ok(responder.error_response(errors))
            }
            None => {
                tracing::error!(
                    request_object = type_name::<T>(),
                    "validation failed but no error response provider is configured"
                );
                Err(InvalidRequestPayload {
                    type_name: type_name::<T>(),
                    errors: errors.clone(),
                })
            }
        }
    }

    fn responder_for<T: RequestObject>(&self) -> Option<Arc<dyn ErrorResponseProvider>> {
        if let Some(responder) = T::error_responder() {
            return Some(Arc::from(responder));
        }
        if let Some(responder) = self.responders.get(&TypeId::of::<T>()) {
            return Some(Arc::clone(responder));
        }
        self.default_responder.clone()
    }
}

impl Default for RequestBinder {
    /// Default HTTP resolver, default rule engine, and the default JSON
    /// error response provider as the process-wide fallback.
    fn default() -> Self {
        Self::builder()
            .default_error_responder(DefaultErrorResponseProvider)
            .build()
    }
}

pub(crate) async fn buffer_body(body: Body) -> Result<Bytes, PayloadError> {
    to_bytes(body, MAX_PAYLOAD_BYTES)
        .await
        .map_err(|err| PayloadError::Body(err.to_string()))
}

/// Startup-time configuration surface for [`RequestBinder`].
pub struct RequestBinderBuilder {
    payload_resolver: Arc<dyn PayloadResolver>,
    validator: Arc<dyn Validator>,
    default_responder: Option<Arc<dyn ErrorResponseProvider>>,
    responders: HashMap<TypeId, Arc<dyn ErrorResponseProvider>>,
}

impl RequestBinderBuilder {
    fn new() -> Self {
        Self {
            payload_resolver: Arc::new(HttpPayloadResolver),
            validator: Arc::new(RuleValidator),
            default_responder: None,
            responders: HashMap::new(),
        }
    }

    pub fn payload_resolver(mut self, resolver: impl PayloadResolver + 'static) -> Self {
        self.payload_resolver = Arc::new(resolver);
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validator = Arc::new(validator);
        self
    }

    /// Process-wide default error response provider. Leaving it unset is
    /// legal ("unset configuration"); it only matters once an invalid
    /// payload reaches a handler without a violation-list parameter.
    pub fn default_error_responder(
        mut self,
        responder: impl ErrorResponseProvider + 'static,
    ) -> Self {
        self.default_responder = Some(Arc::new(responder));
        self
    }

    /// Per-type provider override, keyed by request-object type.
    pub fn error_responder_for<T: RequestObject>(
        mut self,
        responder: impl ErrorResponseProvider + 'static,
    ) -> Self {
        self.responders
            .insert(TypeId::of::<T>(), Arc::new(responder));
        self
    }

    pub fn build(self) -> RequestBinder {
        RequestBinder {
            payload_resolver: self.payload_resolver,
            validator: self.validator,
            default_responder: self.default_responder,
            responders: Arc::new(self.responders),
        }
    }
}
