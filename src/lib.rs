//! Validated request-object binding for axum
//!
//! This crate binds incoming HTTP request payloads to typed "request
//! object" values, validates them against declarative rule trees, and
//! short-circuits the handler with a formatted error response when
//! validation fails.
//!
//! # Overview
//!
//! The binding pipeline consists of four collaborators:
//!
//! 1. **Payload resolver** - extracts a raw key/value mapping from the
//!    request (query string plus JSON or form body by default).
//! 2. **Validator** - runs a request object's rule tree against the payload,
//!    producing an ordered violation list.
//! 3. **Error response provider** - maps a non-empty violation list to the
//!    terminal response; resolved per request-object type, falling back to a
//!    process-wide default.
//! 4. **Request binder** - orchestrates the above and either injects the
//!    validated object into the handler or returns the error response
//!    without invoking it.
//!
//! # Usage
//!
//! ```
//! use axum::{routing::post, Extension, Json, Router};
//! use request_object::{Bound, Constraint, Payload, RequestBinder, RequestObject, Rules};
//!
//! #[derive(Clone)]
//! struct RegisterUser {
//!     payload: Payload,
//! }
//!
//! impl RequestObject for RegisterUser {
//!     fn rules(_payload: &Payload) -> Rules {
//!         Rules::new()
//!             .field("email", vec![Constraint::NotBlank, Constraint::Email])
//!             .field("password", vec![Constraint::min_length(6)])
//!     }
//!
//!     fn from_payload(payload: Payload) -> Self {
//!         Self { payload }
//!     }
//! }
//!
//! async fn register_user(Bound(user): Bound<RegisterUser>) -> Json<serde_json::Value> {
//!     // user passed validation
//!     Json(user.payload.to_value())
//! }
//!
//! let app: Router = Router::new()
//!     .route("/users", post(register_user))
//!     .layer(Extension(RequestBinder::default()));
//! ```
//!
//! # Validation error response
//!
//! With the default provider, an invalid payload yields a 400:
//!
//! ```json
//! {
//!   "message": "Please check your data",
//!   "errors": [
//!     {"path": "email", "message": "must be a valid email address"},
//!     {"path": "password", "message": "is required"}
//!   ]
//! }
//! ```
//!
//! Handlers that want the error case instead declare
//! [`BoundWithErrors<T>`] and receive the object together with the
//! violation list; they are then never skipped.

pub mod binder;
pub mod extract;
pub mod payload;
pub mod request;
pub mod respond;
pub mod rules;
pub mod validator;
pub mod violations;

pub use binder::{
    BindOutcome, BoundRequestObject, BoundViolations, InvalidRequestPayload, RequestBinder,
    RequestBinderBuilder,
};
pub use extract::{BindRejection, Bound, BoundWithErrors};
pub use payload::{HttpPayloadResolver, Payload, PayloadError, PayloadResolver};
pub use request::RequestObject;
pub use respond::{DefaultErrorResponseProvider, ErrorResponseProvider};
pub use rules::{Constraint, Rules};
pub use validator::{RuleValidator, Validator};
pub use violations::{Violation, ViolationList};
