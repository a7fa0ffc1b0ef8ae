//! Bearer-token authentication middleware.
//!
//! Resolves the caller to a [`RequestUser`] and stores it in the request
//! extensions, where the audit layer picks it up. Requests without an
//! `Authorization` header proceed as anonymous.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use auditbind_core::error::AppError;
use auditbind_middleware::RequestUser;

use crate::state::AppState;

/// Resolves the bearer token, if any, to a user.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match request.headers().get(AUTHORIZATION) {
        None => RequestUser::Anonymous,
        Some(value) => {
            let token = value
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

            let user = state
                .directory
                .resolve(token.trim())
                .ok_or_else(|| AppError::authentication("Invalid bearer token"))?;

            if !user.is_active {
                return Err(AppError::authentication("User account is disabled"));
            }

            debug!(username = %user.username, "Request authenticated");
            RequestUser::Authenticated(user)
        }
    };

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}
