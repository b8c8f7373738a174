//! Role gating for destructive operations.
//!
//! Authentication itself is owned by an upstream gateway; this layer only
//! reads the role the gateway forwarded and checks it against the
//! configured elevated set. The check lives at the HTTP boundary, never
//! inside the inventory core.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's role, set by the upstream gateway.
pub const ROLE_HEADER: &str = "x-stockroom-role";

/// Extractor that requires an elevated role.
///
/// Rejects with 403 when the header is absent or the role is not in
/// `STOCKROOM_ELEVATED_ROLES`. The accepted role is exposed for logging.
///
/// # Example
///
/// ```rust,ignore
/// async fn delete_handler(
///     RequireElevated(role): RequireElevated,
/// ) -> impl IntoResponse {
///     tracing::info!(%role, "elevated operation");
/// }
/// ```
pub struct RequireElevated(pub String);

impl FromRequestParts<AppState> for RequireElevated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Forbidden("this operation requires an elevated role".to_owned())
            })?;

        if state.config().is_elevated_role(role) {
            Ok(Self(role.to_owned()))
        } else {
            Err(AppError::Forbidden(format!(
                "role {role} may not perform this operation"
            )))
        }
    }
}
