use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};

use crate::auth::jwt::{verify_access_token, Claims};
use crate::db::require_db;
use crate::entities::User;
use crate::error::AppError;
use crate::repos::users;
use crate::state::app_state::AppState;

/// The authenticated admin, resolved from `Authorization: Bearer <jwt>`.
///
/// Resolution order: header present, token not revoked, signature and expiry
/// valid, user still exists. Every failure is a 401.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Raw bearer token, kept so logout can revoke it.
    pub token: String,
    pub claims: Claims,
}

/// The token from a well-formed `Bearer` header.
pub fn bearer_token(req: &HttpRequest) -> Result<String, AppError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::unauthorized_missing_bearer)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => {
            Ok(token.to_string())
        }
        _ => Err(AppError::unauthorized_missing_bearer()),
    }
}

/// Full resolution against the revocation store, JWT settings and database.
pub async fn resolve_current_user(req: &HttpRequest) -> Result<CurrentUser, AppError> {
    let token = bearer_token(req)?;

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("AppState not available"))?;

    if state.revocations.is_revoked(&token).await {
        return Err(AppError::unauthorized_revoked_jwt());
    }

    let claims = verify_access_token(&token, &state.security)?;

    let db = require_db(state)?;
    let user = users::find_by_id(db, claims.id)
        .await?
        .ok_or_else(AppError::unauthorized_user_not_found)?;

    Ok(CurrentUser {
        user,
        token,
        claims,
    })
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Already resolved by `RequireUser`.
            let resolved = req.extensions().get::<CurrentUser>().cloned();
            match resolved {
                Some(current) => Ok(current),
                None => resolve_current_user(&req).await,
            }
        })
    }
}
