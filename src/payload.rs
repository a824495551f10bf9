//! Payload extraction from incoming requests
//!
//! The binder never looks at the HTTP request directly; it consumes a
//! [`Payload`] - a raw key/value mapping - produced by a [`PayloadResolver`].
//! [`HttpPayloadResolver`] is the default resolver and merges the URL query
//! string with a JSON or form-encoded body (body values win).

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{header, request::Parts};
use serde_json::{Map, Value};
use thiserror::Error;

/// Raw key/value mapping extracted from an incoming request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a payload from a JSON value; returns `None` unless the value
    /// is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Looks up a value by dotted path (`"profile.name"` descends into
    /// nested objects).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Looks up a string value by dotted path.
    pub fn str(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_str()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Converts the payload back into a JSON object value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Payload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Payload resolution failures. These never abort binding; the binder folds
/// them into the violation list so handlers and error providers see them
/// through the normal invalid-payload path.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),

    #[error("failed to read request body: {0}")]
    Body(String),
}

/// Extracts the raw data mapping from an incoming request.
///
/// Implementations are chosen once at binder construction; a request-object
/// type can bypass the resolver entirely with
/// [`RequestObject::extract_payload`](crate::RequestObject::extract_payload).
#[async_trait]
pub trait PayloadResolver: Send + Sync {
    async fn resolve_payload(&self, parts: &Parts, body: &Bytes) -> Result<Payload, PayloadError>;
}

/// Default resolver: query-string pairs first, then the body on top.
///
/// The body is parsed as JSON for `application/json` and as a form for
/// `application/x-www-form-urlencoded`; other content types contribute
/// nothing (file uploads and the like are a collaborator concern).
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpPayloadResolver;

#[async_trait]
impl PayloadResolver for HttpPayloadResolver {
    async fn resolve_payload(&self, parts: &Parts, body: &Bytes) -> Result<Payload, PayloadError> {
        let mut payload = Payload::new();

        if let Some(query) = parts.uri.query() {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)?;
            for (key, value) in pairs {
                payload.insert(key, Value::String(value));
            }
        }

        if body.is_empty() {
            return Ok(payload);
        }

        match content_type(parts) {
            Some(mime) if mime.starts_with("application/json") => {
                let value: Value = serde_json::from_slice(body)?;
                match value {
                    Value::Object(map) => {
                        for (key, value) in map {
                            payload.insert(key, value);
                        }
                    }
                    _ => return Err(PayloadError::NotAnObject),
                }
            }
            Some(mime) if mime.starts_with("application/x-www-form-urlencoded") => {
                let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
                for (key, value) in pairs {
                    payload.insert(key, Value::String(value));
                }
            }
            _ => {}
        }

        Ok(payload)
    }
}

fn content_type(parts: &Parts) -> Option<&str> {
    parts.headers.get(header::CONTENT_TYPE)?.to_str().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde_json::json;

    fn parts(uri: &str, content_type: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri(uri);
        if let Some(mime) = content_type {
            builder = builder.header(header::CONTENT_TYPE, mime);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_dotted_path_lookup() {
        let payload = Payload::from_value(json!({
            "profile": {"name": "John", "links": {"home": "https://example.com"}},
            "age": 30,
        }))
        .unwrap();

        assert_eq!(payload.str("profile.name"), Some("John"));
        assert_eq!(payload.str("profile.links.home"), Some("https://example.com"));
        assert_eq!(payload.get("age"), Some(&json!(30)));
        assert!(payload.get("profile.missing").is_none());
        assert!(!payload.contains("age.nested"));
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(Payload::from_value(json!(["a", "b"])).is_none());
        assert!(Payload::from_value(json!("scalar")).is_none());
    }

    #[tokio::test]
    async fn test_json_body_merged_over_query() {
        let parts = parts("/users?source=query&kept=yes", Some("application/json"));
        let body = Bytes::from(serde_json::to_vec(&json!({"source": "body"})).unwrap());

        let payload = HttpPayloadResolver
            .resolve_payload(&parts, &body)
            .await
            .unwrap();

        assert_eq!(payload.str("source"), Some("body"));
        assert_eq!(payload.str("kept"), Some("yes"));
    }

    #[tokio::test]
    async fn test_form_body_parsed() {
        let parts = parts("/users", Some("application/x-www-form-urlencoded"));
        let body = Bytes::from_static(b"email=user%40example.com&name=John+Doe");

        let payload = HttpPayloadResolver
            .resolve_payload(&parts, &body)
            .await
            .unwrap();

        assert_eq!(payload.str("email"), Some("user@example.com"));
        assert_eq!(payload.str("name"), Some("John Doe"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let parts = parts("/users", Some("application/json"));
        let body = Bytes::from_static(b"{not json");

        let result = HttpPayloadResolver.resolve_payload(&parts, &body).await;
        assert!(matches!(result, Err(PayloadError::Json(_))));
    }

    #[tokio::test]
    async fn test_json_array_body_rejected() {
        let parts = parts("/users", Some("application/json"));
        let body = Bytes::from_static(b"[1, 2, 3]");

        let result = HttpPayloadResolver.resolve_payload(&parts, &body).await;
        assert!(matches!(result, Err(PayloadError::NotAnObject)));
    }

    #[tokio::test]
    async fn test_unknown_content_type_contributes_nothing() {
        let parts = parts("/users?a=1", Some("text/plain"));
        let body = Bytes::from_static(b"ignore me");

        let payload = HttpPayloadResolver
            .resolve_payload(&parts, &body)
            .await
            .unwrap();

        assert_eq!(payload.len(), 1);
        assert_eq!(payload.str("a"), Some("1"));
    }
}
