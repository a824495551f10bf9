//! The request-object contract
//!
//! A request object is a value type wrapping the resolved payload of one
//! request. It declares its own validation rule tree and may override how
//! its payload is extracted and how validation failures are answered.

use axum::body::Bytes;
use axum::http::request::Parts;

use crate::payload::Payload;
use crate::respond::ErrorResponseProvider;
use crate::rules::Rules;

/// Typed value structure representing validated request data plus its own
/// validation rules.
///
/// Construction is infallible and never validates; the binder runs
/// [`rules`](Self::rules) through its validator before the object ever
/// reaches a handler.
pub trait RequestObject: Clone + Send + Sync + 'static {
    /// The validation rule tree for this type. Receives the resolved payload
    /// so the tree may depend on its contents (contextual validation).
    fn rules(payload: &Payload) -> Rules;

    /// Builds the object from the resolved payload.
    fn from_payload(payload: Payload) -> Self;

    /// Optional custom payload extraction. Returning `Some` bypasses the
    /// binder's payload resolver entirely.
    fn extract_payload(parts: &Parts, body: &Bytes) -> Option<Payload> {
        let _ = (parts, body);
        None
    }

    /// Optional type-declared error-response provider. Takes priority over
    /// any provider registered on the binder.
    fn error_responder() -> Option<Box<dyn ErrorResponseProvider>> {
        None
    }
}
