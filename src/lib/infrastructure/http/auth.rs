//! HTTP Basic guard for the documentation, dashboard and management routes

use std::{fmt, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use constant_time_eq::constant_time_eq;
use tracing::debug;

use crate::infrastructure::http::errors::ApiError;

/// The configured documentation password. Only the password is checked, any username is accepted.
#[derive(Clone)]
pub struct DocsPassword(Arc<str>);

impl DocsPassword {
    /// Wrap the configured secret
    pub fn new(password: &str) -> Self {
        Self(Arc::from(password))
    }

    fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for DocsPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DocsPassword(..)")
    }
}

/// Password part of a `Basic` authorization header
fn basic_password(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (_, password) = credentials.split_once(':')?;

    Some(password.to_string())
}

/// Reject requests without valid Basic credentials
pub async fn require_docs_access(
    State(password): State<DocsPassword>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(candidate) = basic_password(request.headers()) else {
        debug!(uri = %request.uri(), "missing credentials");
        return Err(ApiError::new_401("Not authenticated"));
    };

    if !password.matches(&candidate) {
        debug!(uri = %request.uri(), "invalid credentials");
        return Err(ApiError::new_401("Invalid credentials"));
    }

    Ok(next.run(request).await)
}
