use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Correlation header shared with the fronting proxy
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one gateway request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id asserted by the client, if it sent a UUID
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let raw = headers.get(REQUEST_ID_HEADER)?.to_str().ok()?;
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// Client id when usable, otherwise a fresh one
    fn resolve(headers: &HeaderMap) -> Self {
        if let Some(id) = Self::from_headers(headers) {
            return id;
        }

        let id = Self::generate();
        if headers.contains_key(REQUEST_ID_HEADER) {
            tracing::debug!(request_id = %id, "Replacing malformed x-request-id");
        }
        id
    }

    fn header_value(&self) -> HeaderValue {
        let mut buf = Uuid::encode_buffer();
        // A hyphenated UUID is always a valid header value
        HeaderValue::from_str(self.0.hyphenated().encode_lower(&mut buf))
            .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// Tags each request with a [`RequestId`] and mirrors it on the response.
///
/// The canonical id is also written back onto the request headers so every later
/// layer sees the same value.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::resolve(request.headers());

    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.header_value());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.header_value());
    response
}

/// Span for one gateway request; `caller` is recorded once identity is checked
pub fn request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string);

    tracing::info_span!(
        "catalog_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = request_id.as_deref().unwrap_or("-"),
        caller = tracing::field::Empty,
    )
}
