//! Experience repository functions. Natural key: (company, position).

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{fetch_page, first_duplicate, key_contains, key_eq, lookup_key, search_term};
use crate::entities::{experiences, StringList};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::http::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceInput {
    pub company: String,
    pub position: String,
    pub location: Option<String>,
    pub employment_type: String,
    pub start_date: Date,
    /// Always `None` when `is_current`.
    pub end_date: Option<Date>,
    pub is_current: bool,
    pub description: Option<String>,
    pub responsibilities: StringList,
    pub technologies: StringList,
    pub company_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub is_current: Option<bool>,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Experience, "Experience not found")
}

fn key_conflict() -> DomainError {
    DomainError::conflict(
        ConflictKind::Duplicate,
        "Experience with this company and position already exists",
    )
}

fn natural_key(input: &ExperienceInput) -> String {
    format!("{} @ {}", input.position, input.company)
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: &ExperienceFilter,
    page: &PageParams,
) -> Result<Paginated<experiences::Model>, DomainError> {
    let mut select = experiences::Entity::find();
    if let Some(term) = search_term(&filter.search) {
        select = select.filter(key_contains(experiences::Column::LookupKey, term));
    }
    if let Some(active) = filter.is_active {
        select = select.filter(experiences::Column::IsActive.eq(active));
    }
    if let Some(current) = filter.is_current {
        select = select.filter(experiences::Column::IsCurrent.eq(current));
    }
    let select = select
        .order_by_desc(experiences::Column::StartDate)
        .order_by_desc(experiences::Column::CreatedAt);
    Ok(fetch_page(conn, select, page).await?)
}

/// Active records, most recent start first.
pub async fn list_active<C: ConnectionTrait>(
    conn: &C,
) -> Result<Vec<experiences::Model>, DomainError> {
    Ok(experiences::Entity::find()
        .filter(experiences::Column::IsActive.eq(true))
        .order_by_desc(experiences::Column::StartDate)
        .order_by_desc(experiences::Column::CreatedAt)
        .all(conn)
        .await?)
}

pub async fn find<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<experiences::Model, DomainError> {
    experiences::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

pub async fn key_taken<C: ConnectionTrait>(
    conn: &C,
    company: &str,
    position: &str,
    exclude: Option<Uuid>,
) -> Result<bool, DomainError> {
    let mut select = experiences::Entity::find()
        .filter(key_eq(experiences::Column::LookupKey, &[company, position]));
    if let Some(id) = exclude {
        select = select.filter(experiences::Column::Id.ne(id));
    }
    Ok(select.count(conn).await? > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: ExperienceInput,
) -> Result<experiences::Model, DomainError> {
    if key_taken(conn, &input.company, &input.position, None).await? {
        return Err(key_conflict());
    }

    let now = OffsetDateTime::now_utc();
    let model = experiences::ActiveModel {
        id: Set(Uuid::new_v4()),
        lookup_key: Set(lookup_key(&[input.company.as_str(), input.position.as_str()])),
        company: Set(input.company),
        position: Set(input.position),
        location: Set(input.location),
        employment_type: Set(input.employment_type),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        is_current: Set(input.is_current),
        description: Set(input.description),
        responsibilities: Set(input.responsibilities),
        technologies: Set(input.technologies),
        company_url: Set(input.company_url),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    inputs: Vec<ExperienceInput>,
) -> Result<Vec<experiences::Model>, DomainError> {
    if let Some(dup) = first_duplicate(inputs.iter().map(natural_key)) {
        return Err(DomainError::conflict(
            ConflictKind::Duplicate,
            format!("Duplicate experience in batch: {dup}"),
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
    input: ExperienceInput,
) -> Result<experiences::Model, DomainError> {
    let existing = find(conn, id).await?;
    if key_taken(conn, &input.company, &input.position, Some(id)).await? {
        return Err(key_conflict());
    }

    let mut model = existing.into_active_model();
    model.lookup_key = Set(lookup_key(&[input.company.as_str(), input.position.as_str()]));
    model.company = Set(input.company);
    model.position = Set(input.position);
    model.location = Set(input.location);
    model.employment_type = Set(input.employment_type);
    model.start_date = Set(input.start_date);
    model.end_date = Set(input.end_date);
    model.is_current = Set(input.is_current);
    model.description = Set(input.description);
    model.responsibilities = Set(input.responsibilities);
    model.technologies = Set(input.technologies);
    model.company_url = Set(input.company_url);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    let result = experiences::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}

pub async fn toggle_active<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<experiences::Model, DomainError> {
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
    let result = experiences::Entity::update_many()
        .col_expr(experiences::Column::IsActive, Expr::value(active))
        .col_expr(experiences::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
        .filter(experiences::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
