use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::AppError;

/// Header in which the fronting auth layer asserts the caller's identity
pub const CALLER_HEADER: &str = "x-authenticated-user";

/// Identity of the authenticated caller, as asserted upstream of this service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caller(pub String);

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejects requests that carry no caller identity.
///
/// Credentials are not verified here; the header is trusted as set by the auth layer.
pub async fn require_caller(mut request: Request, next: Next) -> Result<Response, AppError> {
    let caller = request
        .headers()
        .get(CALLER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Caller(s.to_string()))
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    tracing::Span::current().record("caller", tracing::field::display(&caller));
    request.extensions_mut().insert(caller);

    Ok(next.run(request).await)
}
