//! Project repository functions.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{fetch_page, first_duplicate, key_contains, key_eq, lookup_key, search_term};
use crate::entities::{projects, StringList};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::http::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub technologies: StringList,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub featured: bool,
    pub status: String,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Project, "Project not found")
}

fn title_conflict() -> DomainError {
    DomainError::conflict(ConflictKind::Duplicate, "Project with this title already exists")
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: &ProjectFilter,
    page: &PageParams,
) -> Result<Paginated<projects::Model>, DomainError> {
    let mut select = projects::Entity::find();
    if let Some(term) = search_term(&filter.search) {
        select = select.filter(key_contains(projects::Column::LookupKey, term));
    }
    if let Some(active) = filter.is_active {
        select = select.filter(projects::Column::IsActive.eq(active));
    }
    if let Some(featured) = filter.featured {
        select = select.filter(projects::Column::Featured.eq(featured));
    }
    if let Some(status) = search_term(&filter.status) {
        select = select.filter(projects::Column::Status.eq(status));
    }
    let select = select
        .order_by_asc(projects::Column::SortOrder)
        .order_by_desc(projects::Column::CreatedAt);
    Ok(fetch_page(conn, select, page).await?)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<projects::Model, DomainError> {
    projects::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

pub async fn title_taken<C: ConnectionTrait>(
    conn: &C,
    title: &str,
    exclude: Option<Uuid>,
) -> Result<bool, DomainError> {
    let mut select = projects::Entity::find().filter(key_eq(projects::Column::LookupKey, &[title]));
    if let Some(id) = exclude {
        select = select.filter(projects::Column::Id.ne(id));
    }
    Ok(select.count(conn).await? > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: ProjectInput,
) -> Result<projects::Model, DomainError> {
    if title_taken(conn, &input.title, None).await? {
        return Err(title_conflict());
    }

    let now = OffsetDateTime::now_utc();
    let model = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        lookup_key: Set(lookup_key(&[input.title.as_str()])),
        title: Set(input.title),
        description: Set(input.description),
        technologies: Set(input.technologies),
        github_url: Set(input.github_url),
        live_url: Set(input.live_url),
        image_url: Set(input.image_url),
        featured: Set(input.featured),
        status: Set(input.status),
        sort_order: Set(input.sort_order),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    inputs: Vec<ProjectInput>,
) -> Result<Vec<projects::Model>, DomainError> {
    if let Some(dup) = first_duplicate(inputs.iter().map(|i| &i.title)) {
        return Err(DomainError::conflict(
            ConflictKind::Duplicate,
            format!("Duplicate project title in batch: {dup}"),
        ));
    }
    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        created.push(create(conn, input).await?);
    }
    Ok(created)
}

pub async fn update<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    input: ProjectInput,
) -> Result<projects::Model, DomainError> {
    let existing = find(conn, id).await?;
    if title_taken(conn, &input.title, Some(id)).await? {
        return Err(title_conflict());
    }

    let mut model = existing.into_active_model();
    model.lookup_key = Set(lookup_key(&[input.title.as_str()]));
    model.title = Set(input.title);
    model.description = Set(input.description);
    model.technologies = Set(input.technologies);
    model.github_url = Set(input.github_url);
    model.live_url = Set(input.live_url);
    model.image_url = Set(input.image_url);
    model.featured = Set(input.featured);
    model.status = Set(input.status);
    model.sort_order = Set(input.sort_order);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn set_image_url<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    url: String,
) -> Result<projects::Model, DomainError> {
    let mut model = find(conn, id).await?.into_active_model();
    model.image_url = Set(Some(url));
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    let result = projects::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}

pub async fn toggle_active<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<projects::Model, DomainError> {
    let existing = find(conn, id).await?;
    let active = existing.is_active;
    let mut model = existing.into_active_model();
    model.is_active = Set(!active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn set_active_many<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
    active: bool,
) -> Result<u64, DomainError> {
    let result = projects::Entity::update_many()
        .col_expr(projects::Column::IsActive, Expr::value(active))
        .col_expr(projects::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
        .filter(projects::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_active<C: ConnectionTrait>(conn: &C) -> Result<u64, DomainError> {
    Ok(projects::Entity::find()
        .filter(projects::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}
