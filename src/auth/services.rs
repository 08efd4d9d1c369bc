use bson::{oid::ObjectId, DateTime};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::auth::{
    claims::Claims,
    dto::{LoginRequest, RegisterRequest},
    password::{hash_password, verify_password},
    repo_types::{NewUser, User},
};
use crate::db::StoreError;
use crate::error::AppError;
use crate::state::AppState;

/// Issued token plus the id of the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: ObjectId,
}

/// `local@domain` where domain is dotted with a 2+ letter TLD or a bracketed
/// IPv4 literal. Local part may be a quoted string.
pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(
            r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#
        )
        .unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub async fn register(st: &AppState, req: RegisterRequest) -> Result<Session, AppError> {
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if req.name.trim().is_empty() || req.tel.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Name, tel and password are required".into(),
        ));
    }

    match st.users.exists_by_email(&req.email).await {
        Ok(false) => {}
        Ok(true) => {
            warn!(email = %req.email, "email already registered");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => {
            error!(error = %e, "exists_by_email failed");
            return Err(AppError::Internal("Error checking email".into()));
        }
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal("Error hashing password".into())
    })?;

    let new_user = NewUser {
        name: req.name,
        tel: req.tel,
        email: req.email,
        role: req.role,
        password_hash,
        created_at: DateTime::now(),
    };
    let email = new_user.email.clone();
    let role = new_user.role;

    // The unique index catches a concurrent registration that slipped past
    // the existence check.
    let user_id = match st.users.insert(new_user).await {
        Ok(id) => id,
        Err(StoreError::Duplicate) => {
            warn!(email = %email, "duplicate email on insert");
            return Err(AppError::Conflict("Email already registered".into()));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(AppError::Internal("Error creating user".into()));
        }
    };

    let token = st.jwt.issue(&email, role, st.jwt.ttl()).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal("Error generating token".into())
    })?;

    info!(user_id = %user_id, email = %email, "user registered");
    Ok(Session { token, user_id })
}

/// Unknown email and wrong password are reported with distinct messages,
/// both as 401.
pub async fn login(st: &AppState, req: LoginRequest) -> Result<Session, AppError> {
    if !is_valid_email(&req.email) {
        warn!(email = %req.email, "invalid email");
        return Err(AppError::Validation("Invalid email address".into()));
    }

    let user = match st.users.find_by_email(&req.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %req.email, "login unknown email");
            return Err(AppError::Unauthenticated("User not found".into()));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(AppError::Internal("Error fetching user data".into()));
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        warn!(email = %req.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthenticated("Invalid password".into()));
    }

    let token = st.jwt.issue(&user.email, user.role, st.jwt.ttl()).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal("Error generating token".into())
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Session {
        token,
        user_id: user.id,
    })
}

/// Resolves the account behind validated claims. A missing record means the
/// claims outlived the user.
pub async fn who_am_i(st: &AppState, claims: &Claims) -> Result<User, AppError> {
    match st.users.find_by_email(&claims.email).await {
        Ok(Some(u)) => Ok(u),
        Ok(None) => {
            error!(email = %claims.email, "claims reference a missing user");
            Err(AppError::Internal("Error fetching user data".into()))
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            Err(AppError::Internal("Error fetching user data".into()))
        }
    }
}
