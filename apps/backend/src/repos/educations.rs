//! Education repository functions. Natural key: (institution, degree).

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::{fetch_page, first_duplicate, key_contains, key_eq, lookup_key, search_term};
use crate::entities::educations;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::http::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub struct EducationInput {
    pub institution: String,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EducationFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Education, "Education not found")
}

fn key_conflict() -> DomainError {
    DomainError::conflict(
        ConflictKind::Duplicate,
        "Education with this institution and degree already exists",
    )
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: &EducationFilter,
    page: &PageParams,
) -> Result<Paginated<educations::Model>, DomainError> {
    let mut select = educations::Entity::find();
    if let Some(term) = search_term(&filter.search) {
        select = select.filter(key_contains(educations::Column::LookupKey, term));
    }
    if let Some(active) = filter.is_active {
        select = select.filter(educations::Column::IsActive.eq(active));
    }
    let select = select
        .order_by_desc(educations::Column::StartDate)
        .order_by_desc(educations::Column::CreatedAt);
    Ok(fetch_page(conn, select, page).await?)
}

pub async fn find<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<educations::Model, DomainError> {
    educations::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

pub async fn key_taken<C: ConnectionTrait>(
    conn: &C,
    institution: &str,
    degree: &str,
    exclude: Option<Uuid>,
) -> Result<bool, DomainError> {
    let mut select = educations::Entity::find()
        .filter(key_eq(educations::Column::LookupKey, &[institution, degree]));
    if let Some(id) = exclude {
        select = select.filter(educations::Column::Id.ne(id));
    }
    Ok(select.count(conn).await? > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: EducationInput,
) -> Result<educations::Model, DomainError> {
    if key_taken(conn, &input.institution, &input.degree, None).await? {
        return Err(key_conflict());
    }

    let now = OffsetDateTime::now_utc();
    let model = educations::ActiveModel {
        id: Set(Uuid::new_v4()),
        lookup_key: Set(lookup_key(&[input.institution.as_str(), input.degree.as_str()])),
        institution: Set(input.institution),
        degree: Set(input.degree),
        field_of_study: Set(input.field_of_study),
        location: Set(input.location),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        grade: Set(input.grade),
        description: Set(input.description),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    inputs: Vec<EducationInput>,
) -> Result<Vec<educations::Model>, DomainError> {
    let keys = inputs
        .iter()
        .map(|i| format!("{} @ {}", i.degree, i.institution));
    if let Some(dup) = first_duplicate(keys) {
        return Err(DomainError::conflict(
            ConflictKind::Duplicate,
            format!("Duplicate education in batch: {dup}"),
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
    input: EducationInput,
) -> Result<educations::Model, DomainError> {
    let existing = find(conn, id).await?;
    if key_taken(conn, &input.institution, &input.degree, Some(id)).await? {
        return Err(key_conflict());
    }

    let mut model = existing.into_active_model();
    model.lookup_key = Set(lookup_key(&[input.institution.as_str(), input.degree.as_str()]));
    model.institution = Set(input.institution);
    model.degree = Set(input.degree);
    model.field_of_study = Set(input.field_of_study);
    model.location = Set(input.location);
    model.start_date = Set(input.start_date);
    model.end_date = Set(input.end_date);
    model.grade = Set(input.grade);
    model.description = Set(input.description);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    let result = educations::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}

pub async fn toggle_active<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<educations::Model, DomainError> {
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
    let result = educations::Entity::update_many()
        .col_expr(educations::Column::IsActive, Expr::value(active))
        .col_expr(educations::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
        .filter(educations::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_active<C: ConnectionTrait>(conn: &C) -> Result<u64, DomainError> {
    Ok(educations::Entity::find()
        .filter(educations::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}
