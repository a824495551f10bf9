//! Error response providers
//!
//! A provider maps a non-empty violation list to the terminal response that
//! short-circuits the handler. Selection order: the request-object type's
//! own provider, then a per-type override registered on the binder, then the
//! binder's process-wide default.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::violations::ViolationList;

/// Strategy converting a violation list into a terminal response.
pub trait ErrorResponseProvider: Send + Sync {
    fn error_response(&self, errors: &ViolationList) -> Response;
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'static str,
    errors: &'a ViolationList,
}

/// Default provider: HTTP 400 with the fixed JSON shape
/// `{"message": "Please check your data", "errors": [{"path", "message"}, ...]}`.
///
/// Stateless; a pure function of the violation list.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultErrorResponseProvider;

impl ErrorResponseProvider for DefaultErrorResponseProvider {
    fn error_response(&self, errors: &ViolationList) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                message: "Please check your data",
                errors,
            }),
        )
            .into_response()
    }
}
