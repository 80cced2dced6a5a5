//! Skill repository functions.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    categories, fetch_page, first_duplicate, key_contains, key_eq, lookup_key, search_term,
};
use crate::entities::skills;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::http::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub struct SkillInput {
    pub name: String,
    pub category_id: Uuid,
    pub proficiency: i16,
    pub years_of_experience: Option<i16>,
    pub icon: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub category_id: Option<Uuid>,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Skill, "Skill not found")
}

fn name_conflict() -> DomainError {
    DomainError::conflict(ConflictKind::Duplicate, "Skill with this name already exists")
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    if categories::exists(conn, id).await? {
        Ok(())
    } else {
        Err(DomainError::invalid_field("categoryId", "Category not found"))
    }
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: &SkillFilter,
    page: &PageParams,
) -> Result<Paginated<skills::Model>, DomainError> {
    let mut select = skills::Entity::find();
    if let Some(term) = search_term(&filter.search) {
        select = select.filter(key_contains(skills::Column::LookupKey, term));
    }
    if let Some(active) = filter.is_active {
        select = select.filter(skills::Column::IsActive.eq(active));
    }
    if let Some(category_id) = filter.category_id {
        select = select.filter(skills::Column::CategoryId.eq(category_id));
    }
    let select = select.order_by_asc(skills::Column::Name);
    Ok(fetch_page(conn, select, page).await?)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<skills::Model, DomainError> {
    skills::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

pub async fn name_taken<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, DomainError> {
    let mut select = skills::Entity::find().filter(key_eq(skills::Column::LookupKey, &[name]));
    if let Some(id) = exclude {
        select = select.filter(skills::Column::Id.ne(id));
    }
    Ok(select.count(conn).await? > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: SkillInput,
) -> Result<skills::Model, DomainError> {
    ensure_category(conn, input.category_id).await?;
    if name_taken(conn, &input.name, None).await? {
        return Err(name_conflict());
    }

    let now = OffsetDateTime::now_utc();
    let model = skills::ActiveModel {
        id: Set(Uuid::new_v4()),
        lookup_key: Set(lookup_key(&[input.name.as_str()])),
        name: Set(input.name),
        category_id: Set(input.category_id),
        proficiency: Set(input.proficiency),
        years_of_experience: Set(input.years_of_experience),
        icon: Set(input.icon),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    inputs: Vec<SkillInput>,
) -> Result<Vec<skills::Model>, DomainError> {
    if let Some(dup) = first_duplicate(inputs.iter().map(|i| &i.name)) {
        return Err(DomainError::conflict(
            ConflictKind::Duplicate,
            format!("Duplicate skill name in batch: {dup}"),
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
    input: SkillInput,
) -> Result<skills::Model, DomainError> {
    let existing = find(conn, id).await?;
    ensure_category(conn, input.category_id).await?;
    if name_taken(conn, &input.name, Some(id)).await? {
        return Err(name_conflict());
    }

    let mut model = existing.into_active_model();
    model.lookup_key = Set(lookup_key(&[input.name.as_str()]));
    model.name = Set(input.name);
    model.category_id = Set(input.category_id);
    model.proficiency = Set(input.proficiency);
    model.years_of_experience = Set(input.years_of_experience);
    model.icon = Set(input.icon);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    let result = skills::Entity::delete_by_id(id).exec(conn).await?;
    if result.rows_affected == 0 {
        return Err(not_found());
    }
    Ok(())
}

pub async fn toggle_active<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<skills::Model, DomainError> {
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
    let result = skills::Entity::update_many()
        .col_expr(skills::Column::IsActive, Expr::value(active))
        .col_expr(skills::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
        .filter(skills::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_active<C: ConnectionTrait>(conn: &C) -> Result<u64, DomainError> {
    Ok(skills::Entity::find()
        .filter(skills::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}
