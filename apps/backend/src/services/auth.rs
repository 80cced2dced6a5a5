//! Admin account lifecycle: one-time registration, login, logout, profile and
//! password changes.

use std::time::SystemTime;

use actix_web::web;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use crate::auth::jwt::mint_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::db::require_db;
use crate::entities::User;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::CurrentUser;
use crate::logging::security;
use crate::repos::users::{self, ProfileInput};
use crate::state::app_state::AppState;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Token plus the user it was minted for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

fn invalid_credentials() -> AppError {
    AppError::bad_request(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS)
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    web::block(move || hash_password(&password)).await?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
    Ok(web::block(move || verify_password(&password, &hash)).await?)
}

fn issue(state: &AppState, user: User) -> Result<AuthSession, AppError> {
    let token = mint_access_token(user.id, SystemTime::now(), &state.security)?;
    Ok(AuthSession { token, user })
}

/// 403 once any user exists, whatever the request carries.
pub async fn ensure_registration_open(state: &AppState, email: Option<&str>) -> Result<(), AppError> {
    if users::any_exists(require_db(state)?).await? {
        security::registration_blocked(email.unwrap_or_default());
        return Err(AppError::forbidden(
            ErrorCode::RegistrationClosed,
            "Registration is closed",
        ));
    }
    Ok(())
}

/// Create the admin account. Closed for good once any user exists.
pub async fn register(state: &AppState, registration: Registration) -> Result<AuthSession, AppError> {
    ensure_registration_open(state, Some(&registration.email)).await?;
    let db = require_db(state)?;

    let hash = hash_blocking(registration.password).await?;
    let user = users::create(db, registration.name, &registration.email, hash).await?;
    info!(user_id = %user.id, "admin account registered");

    issue(state, user)
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(state: &AppState, email: &str, password: String) -> Result<AuthSession, AppError> {
    let db = require_db(state)?;

    let Some(user) = users::find_by_email(db, email).await? else {
        security::login_failed("unknown_email", email);
        return Err(invalid_credentials());
    };

    if !verify_blocking(password, user.password_hash.clone()).await? {
        security::login_failed("wrong_password", email);
        return Err(invalid_credentials());
    }

    info!(user_id = %user.id, "admin logged in");
    issue(state, user)
}

/// Revoke the presented token until its own expiry.
pub async fn logout(state: &AppState, current: &CurrentUser) -> Result<(), AppError> {
    let expiry = OffsetDateTime::from_unix_timestamp(current.claims.exp)
        .map_err(|_| AppError::internal("token expiry out of range"))?;
    state.revocations.revoke(&current.token, expiry).await;
    security::token_revoked(&current.user.id.to_string());
    Ok(())
}

pub async fn update_profile(
    state: &AppState,
    current: &CurrentUser,
    profile: ProfileInput,
) -> Result<User, AppError> {
    let db = require_db(state)?;
    Ok(users::update_profile(db, current.user.id, profile).await?)
}

pub async fn change_password(
    state: &AppState,
    current: &CurrentUser,
    current_password: String,
    new_password: String,
) -> Result<(), AppError> {
    let db = require_db(state)?;

    if !verify_blocking(current_password, current.user.password_hash.clone()).await? {
        security::login_failed("wrong_current_password", &current.user.email);
        return Err(AppError::invalid_field(
            ErrorCode::InvalidCredentials,
            "currentPassword",
            "Current password is incorrect",
        ));
    }

    let hash = hash_blocking(new_password).await?;
    users::set_password_hash(db, current.user.id, hash).await?;
    info!(user_id = %current.user.id, "admin password changed");
    Ok(())
}
