//! Axum extractors over the request binder
//!
//! [`Bound<T>`] is a drop-in handler parameter that parses, validates, and
//! yields the request object, rejecting invalid payloads with the resolved
//! error response. [`BoundWithErrors<T>`] hands the violation list to the
//! handler instead, so the handler owns the error case and is never skipped.
//!
//! Both locate the [`RequestBinder`] in the request extensions; install it
//! once at startup:
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/users", post(create_user))
//!     .layer(Extension(RequestBinder::default()));
//! ```

use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::binder::{buffer_body, InvalidRequestPayload, RequestBinder};
use crate::request::RequestObject;
use crate::violations::ViolationList;

/// A request object that passed validation.
pub struct Bound<T>(pub T);

/// A request object together with its (possibly empty) violation list.
pub struct BoundWithErrors<T>(pub T, pub ViolationList);

/// Rejection for the binding extractors.
#[derive(Debug)]
pub enum BindRejection {
    /// Validation failed; the resolved provider produced this response.
    ErrorResponse(Response),
    /// No `RequestBinder` extension installed on the router.
    MissingBinder,
    /// Fatal configuration error: invalid payload with no resolvable
    /// error response provider.
    Fatal(InvalidRequestPayload),
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        match self {
            Self::ErrorResponse(response) => response,
            Self::MissingBinder => {
                tracing::error!(
                    "no RequestBinder extension installed; add `.layer(Extension(binder))` to the router"
                );
                internal_error()
            }
            Self::Fatal(err) => {
                tracing::error!(request_object = err.type_name, "{}", err);
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"message": "Internal server error"})),
    )
        .into_response()
}

#[async_trait]
impl<S, T> FromRequest<S> for Bound<T>
where
    T: RequestObject,
    S: Send + Sync,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let binder = req
            .extensions()
            .get::<RequestBinder>()
            .cloned()
            .ok_or(BindRejection::MissingBinder)?;

        let (mut parts, body) = req.into_parts();
        let (object, errors) = binder.resolve::<T>(&mut parts, buffer_body(body).await).await;

        if errors.is_empty() {
            return Ok(Bound(object));
        }

        match binder.error_response_for::<T>(&errors) {
            Ok(response) => Err(BindRejection::ErrorResponse(response)),
            Err(fatal) => Err(BindRejection::Fatal(fatal)),
        }
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for BoundWithErrors<T>
where
    T: RequestObject,
    S: Send + Sync,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let binder = req
            .extensions()
            .get::<RequestBinder>()
            .cloned()
            .ok_or(BindRejection::MissingBinder)?;

        let (mut parts, body) = req.into_parts();
        let (object, errors) = binder.resolve::<T>(&mut parts, buffer_body(body).await).await;

        Ok(BoundWithErrors(object, errors))
    }
}

impl<T> std::ops::Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Bound<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
