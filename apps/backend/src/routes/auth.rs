use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::db::require_db;
use crate::entities::User;
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::http::{created, message, ok, Validator};
use crate::middleware::rate_limit::RateLimits;
use crate::middleware::RequireUser;
use crate::repos::users::{self, ProfileInput, UserAsset};
use crate::services::auth::{self as auth_service, Registration};
use crate::state::app_state::AppState;
use crate::uploads::{process_upload, StagedUpload, UploadKind, UploadOutcome};

pub const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;

fn password(v: &mut Validator, field: &str, label: &str, value: Option<String>) -> String {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        v.error(field, format!("{label} is required"));
    } else if value.chars().count() < MIN_PASSWORD_LEN {
        v.error(field, format!("{label} must be at least {MIN_PASSWORD_LEN} characters"));
    } else if value.chars().count() > MAX_PASSWORD_LEN {
        v.error(field, format!("{label} must be at most {MAX_PASSWORD_LEN} characters"));
    }
    value
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("name", "Name", self.name, 2, 50);
        let email = v.email("email", self.email);
        let password = password(&mut v, "password", "Password", self.password);
        v.finish()?;
        Ok(Registration {
            name,
            email,
            password,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Partial profile update; absent fields keep their stored value and
/// `null` clears an optional one.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePayload {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub github_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub linkedin_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub twitter_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub website_url: Option<Option<String>>,
}

impl ProfilePayload {
    pub fn validate_against(self, user: &User) -> Result<ProfileInput, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("name", "Name", self.name.or_else(|| Some(user.name.clone())), 2, 50);
        let email = v.email("email", self.email.or_else(|| Some(user.email.clone())));
        let title = v.optional_text("title", "Title", self.title.unwrap_or(user.title.clone()), 100);
        let bio = v.optional_text("bio", "Bio", self.bio.unwrap_or(user.bio.clone()), 1000);
        let location = v.optional_text(
            "location",
            "Location",
            self.location.unwrap_or(user.location.clone()),
            100,
        );
        let phone = v.optional_text("phone", "Phone", self.phone.unwrap_or(user.phone.clone()), 30);
        let github_url = v.optional_url(
            "githubUrl",
            "GitHub URL",
            self.github_url.unwrap_or(user.github_url.clone()),
        );
        let linkedin_url = v.optional_url(
            "linkedinUrl",
            "LinkedIn URL",
            self.linkedin_url.unwrap_or(user.linkedin_url.clone()),
        );
        let twitter_url = v.optional_url(
            "twitterUrl",
            "Twitter URL",
            self.twitter_url.unwrap_or(user.twitter_url.clone()),
        );
        let website_url = v.optional_url(
            "websiteUrl",
            "Website URL",
            self.website_url.unwrap_or(user.website_url.clone()),
        );
        v.finish()?;

        Ok(ProfileInput {
            name,
            email,
            title,
            bio,
            location,
            phone,
            github_url,
            linkedin_url,
            twitter_url,
            website_url,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UserAssetUpload {
    pub upload: UploadOutcome,
    pub user: User,
}

async fn register(
    state: web::Data<AppState>,
    body: ValidatedJson<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let request = body.into_inner();
    auth_service::ensure_registration_open(&state, request.email.as_deref()).await?;
    let registration = request.validate()?;
    let session = auth_service::register(&state, registration).await?;
    Ok(created("Admin registered successfully", session))
}

async fn login(
    state: web::Data<AppState>,
    body: ValidatedJson<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { email, password } = body.into_inner();
    let mut v = Validator::new();
    let email = v.email("email", email);
    let password = password.unwrap_or_default();
    if password.is_empty() {
        v.error("password", "Password is required");
    }
    v.finish()?;

    let session = auth_service::login(&state, &email, password).await?;
    Ok(ok("Login successful", session))
}

async fn logout(
    current: CurrentUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    auth_service::logout(&state, &current).await?;
    Ok(message("Logged out successfully"))
}

async fn me(current: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(ok("User retrieved successfully", current.user))
}

async fn update_profile(
    current: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<ProfilePayload>,
) -> Result<HttpResponse, AppError> {
    let profile = body.into_inner().validate_against(&current.user)?;
    let user = auth_service::update_profile(&state, &current, profile).await?;
    Ok(ok("Profile updated successfully", user))
}

async fn change_password(
    current: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let ChangePasswordRequest {
        current_password,
        new_password,
    } = body.into_inner();
    let mut v = Validator::new();
    let current_password = current_password.unwrap_or_default();
    if current_password.is_empty() {
        v.error("currentPassword", "Current password is required");
    }
    let new_password = password(&mut v, "newPassword", "New password", new_password);
    v.finish()?;

    auth_service::change_password(&state, &current, current_password, new_password).await?;
    Ok(message("Password changed successfully"))
}

async fn store_asset(
    state: &AppState,
    current: &CurrentUser,
    asset: UserAsset,
    staged: StagedUpload,
) -> Result<UserAssetUpload, AppError> {
    let upload = process_upload(state.media.as_ref(), state.optimizer.clone(), staged).await?;
    let user = users::set_asset_url(require_db(state)?, current.user.id, asset, upload.url.clone())
        .await?;
    Ok(UserAssetUpload { upload, user })
}

async fn upload_avatar(
    current: CurrentUser,
    state: web::Data<AppState>,
    staged: StagedUpload,
) -> Result<HttpResponse, AppError> {
    let result = store_asset(&state, &current, UserAsset::Avatar, staged).await?;
    Ok(ok("Avatar uploaded successfully", result))
}

async fn upload_resume(
    current: CurrentUser,
    state: web::Data<AppState>,
    staged: StagedUpload,
) -> Result<HttpResponse, AppError> {
    let result = store_asset(&state, &current, UserAsset::Resume, staged).await?;
    Ok(ok("Resume uploaded successfully", result))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, limits: &RateLimits) {
    cfg.service(
        web::resource("/register")
            .wrap(crate::rate_limiter!(limits, STRICT))
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/login")
            .wrap(crate::rate_limiter!(limits, AUTH))
            .route(web::post().to(login)),
    )
    .route("/logout", web::post().to(logout))
    .route("/me", web::get().to(me))
    .route("/profile", web::put().to(update_profile))
    .service(
        web::resource("/change-password")
            .wrap(crate::rate_limiter!(limits, STRICT))
            .route(web::put().to(change_password)),
    )
    .service(
        web::resource("/avatar")
            .app_data(UploadKind::Avatar)
            .wrap(RequireUser)
            .wrap(crate::rate_limiter!(limits, UPLOAD))
            .route(web::post().to(upload_avatar)),
    )
    .service(
        web::resource("/resume")
            .app_data(UploadKind::Resume)
            .wrap(RequireUser)
            .wrap(crate::rate_limiter!(limits, UPLOAD))
            .route(web::post().to(upload_resume)),
    );
}
