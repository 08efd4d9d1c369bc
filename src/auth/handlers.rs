use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use time::{macros::format_description, Duration, OffsetDateTime};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, LogoutResponse, PublicUser, RegisterRequest},
        extractors::{authenticated, CurrentUser},
        services::{self, Session},
    },
    config::CookieConfig,
    error::{AppError, AppJson},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

pub fn me_routes(state: &AppState) -> Router<AppState> {
    Router::new().route("/auth/me", authenticated(get(get_me), state))
}

/// `Set-Cookie` value for the session token. A non-positive `ttl` produces
/// a cookie that the browser drops immediately.
pub(crate) fn token_cookie(value: &str, ttl: Duration, secure: bool) -> Result<String, AppError> {
    let expires = OffsetDateTime::now_utc()
        .checked_add(ttl)
        .ok_or_else(|| {
            error!(ttl_secs = ttl.whole_seconds(), "cookie expiry out of range");
            AppError::Internal("Error setting session cookie".into())
        })?
        .format(format_description!(
            "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
        ))
        .map_err(|e| {
            error!(error = %e, "cookie formatting failed");
            AppError::Internal("Error setting session cookie".into())
        })?;
    let mut cookie = format!(
        "token={}; Path=/; Expires={}; Max-Age={}; HttpOnly",
        value,
        expires,
        ttl.whole_seconds().max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    Ok(cookie)
}

fn session_response(
    session: Session,
    cookie: &CookieConfig,
) -> Result<impl IntoResponse, AppError> {
    let set_cookie =
        token_cookie(&session.token, Duration::hours(cookie.ttl_hours), cookie.secure)?;
    Ok((
        [(SET_COOKIE, set_cookie)],
        Json(AuthResponse {
            success: true,
            token: session.token,
            userid: session.user_id.to_hex(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = services::register(&state, payload).await?;
    session_response(session, &state.config.cookie)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = services::login(&state, payload).await?;
    session_response(session, &state.config.cookie)
}

#[instrument(skip(state, claims))]
pub async fn get_me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<PublicUser>, AppError> {
    let user = services::who_am_i(&state, &claims).await?;
    Ok(Json(PublicUser::from(user)))
}

/// Stateless: tells the client to drop its cookie. Issued tokens stay valid
/// until they expire.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cleared = token_cookie("", Duration::hours(-1), state.config.cookie.secure)?;
    info!("session cookie cleared");
    Ok((
        [(SET_COOKIE, cleared)],
        Json(LogoutResponse {
            success: true,
            date: OffsetDateTime::now_utc(),
        }),
    ))
}
