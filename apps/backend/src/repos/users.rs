//! User repository functions. Emails are stored and compared lowercase.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entities::users;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};

/// Profile fields editable through the profile endpoint.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileInput {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAsset {
    Avatar,
    Resume,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::User, "User not found")
}

fn email_conflict() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueEmail, "Email already registered")
}

pub async fn any_exists<C: ConnectionTrait>(conn: &C) -> Result<bool, DomainError> {
    Ok(users::Entity::find().count(conn).await? > 0)
}

/// The admin account (oldest user), if one exists.
pub async fn find_admin<C: ConnectionTrait>(conn: &C) -> Result<Option<users::Model>, DomainError> {
    Ok(users::Entity::find()
        .order_by_asc(users::Column::CreatedAt)
        .one(conn)
        .await?)
}

pub async fn find_by_id<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<users::Model>, DomainError> {
    Ok(users::Entity::find_by_id(id).one(conn).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, DomainError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email.trim().to_lowercase()))
        .one(conn)
        .await?)
}

async fn email_taken<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    exclude: Uuid,
) -> Result<bool, DomainError> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .filter(users::Column::Id.ne(exclude))
        .count(conn)
        .await?
        > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    name: String,
    email: &str,
    password_hash: String,
) -> Result<users::Model, DomainError> {
    let now = OffsetDateTime::now_utc();
    let model = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        email: Set(email.trim().to_lowercase()),
        password_hash: Set(password_hash),
        title: Set(None),
        bio: Set(None),
        location: Set(None),
        phone: Set(None),
        avatar_url: Set(None),
        resume_url: Set(None),
        github_url: Set(None),
        linkedin_url: Set(None),
        twitter_url: Set(None),
        website_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn update_profile<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    profile: ProfileInput,
) -> Result<users::Model, DomainError> {
    let existing = find_by_id(conn, id).await?.ok_or_else(not_found)?;
    let email = profile.email.trim().to_lowercase();
    if email != existing.email && email_taken(conn, &email, id).await? {
        return Err(email_conflict());
    }

    let mut model = existing.into_active_model();
    model.name = Set(profile.name);
    model.email = Set(email);
    model.title = Set(profile.title);
    model.bio = Set(profile.bio);
    model.location = Set(profile.location);
    model.phone = Set(profile.phone);
    model.github_url = Set(profile.github_url);
    model.linkedin_url = Set(profile.linkedin_url);
    model.twitter_url = Set(profile.twitter_url);
    model.website_url = Set(profile.website_url);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn set_password_hash<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    password_hash: String,
) -> Result<(), DomainError> {
    let mut model = find_by_id(conn, id)
        .await?
        .ok_or_else(not_found)?
        .into_active_model();
    model.password_hash = Set(password_hash);
    model.updated_at = Set(OffsetDateTime::now_utc());
    model.update(conn).await?;
    Ok(())
}

pub async fn set_asset_url<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    asset: UserAsset,
    url: String,
) -> Result<users::Model, DomainError> {
    let mut model = find_by_id(conn, id)
        .await?
        .ok_or_else(not_found)?
        .into_active_model();
    match asset {
        UserAsset::Avatar => model.avatar_url = Set(Some(url)),
        UserAsset::Resume => model.resume_url = Set(Some(url)),
    }
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}
