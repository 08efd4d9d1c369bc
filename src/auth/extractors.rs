use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::{debug, error, warn};

use super::claims::{Claims, Role};
use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState};

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Authenticate stage: requires `Authorization: Bearer <token>`, validates it
/// and attaches the claims to the request extensions.
pub async fn protect(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthenticated("Missing or malformed token".into()))?;

    let claims = keys.validate(token).map_err(|e| {
        debug!(error = %e, "token rejected");
        AppError::Unauthenticated("Invalid or expired token".into())
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Authorize stage: lets the request through only if the role claim is in
/// `allowed`. Must run after `protect`.
pub async fn authorize(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(claims) = req.extensions().get::<Claims>() else {
        error!("authorize ran without claims in the request");
        return Err(AppError::Internal("Error parsing claims".into()));
    };
    if !allowed.contains(&claims.role) {
        warn!(role = ?claims.role, "role not permitted");
        return Err(AppError::Forbidden("Access denied".into()));
    }
    Ok(next.run(req).await)
}

/// Runs `protect` on every method of `route`. Unmatched methods still
/// answer 405.
pub fn authenticated(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), protect))
}

/// Runs `protect` then `authorize(roles)` on every method of `route`.
pub fn restricted(
    route: MethodRouter<AppState>,
    state: &AppState,
    roles: &'static [Role],
) -> MethodRouter<AppState> {
    let route = route.route_layer(middleware::from_fn(
        move |req: Request, next: Next| authorize(roles, req, next),
    ));
    authenticated(route, state)
}

/// Claims attached by `protect`.
pub struct CurrentUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                error!("handler expected claims but none were attached");
                AppError::Internal("Error parsing claims".into())
            })
    }
}
