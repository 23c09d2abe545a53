//! Authentication middleware.
//!
//! Resolves `Authorization: Bearer <token>` to an `AdminCaller` and stores
//! it in the request extensions. Missing or unknown tokens stop the request
//! with 401 before any handler runs.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::AdminApiError;
use crate::ports::IdentityResolver;

/// Extract the bearer token, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn authenticate(
    State(identity): State<Arc<dyn IdentityResolver>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AdminApiError> {
    let Some(token) = bearer_token(req.headers()) else {
        debug!(path = %req.uri().path(), "Request without bearer token");
        return Err(AdminApiError::Unauthenticated);
    };

    let Some(caller) = identity.resolve(token).await else {
        warn!(path = %req.uri().path(), "Rejected unknown bearer token");
        return Err(AdminApiError::Unauthenticated);
    };

    debug!(
        caller = %caller.id,
        privileged = caller.privileged,
        method = %req.method(),
        path = %req.uri().path(),
        "Authenticated admin request"
    );
    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
