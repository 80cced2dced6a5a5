//! Category repository functions.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{fetch_page, first_duplicate, key_contains, key_eq, lookup_key, search_term};
use crate::entities::{categories, skills};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::http::pagination::{PageParams, Paginated};

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Category, "Category not found")
}

fn name_conflict() -> DomainError {
    DomainError::conflict(ConflictKind::Duplicate, "Category with this name already exists")
}

pub async fn list<C: ConnectionTrait>(
    conn: &C,
    filter: &CategoryFilter,
    page: &PageParams,
) -> Result<Paginated<categories::Model>, DomainError> {
    let mut select = categories::Entity::find();
    if let Some(term) = search_term(&filter.search) {
        select = select.filter(key_contains(categories::Column::LookupKey, term));
    }
    if let Some(active) = filter.is_active {
        select = select.filter(categories::Column::IsActive.eq(active));
    }
    let select = select
        .order_by_asc(categories::Column::SortOrder)
        .order_by_asc(categories::Column::Name);
    Ok(fetch_page(conn, select, page).await?)
}

pub async fn find<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<categories::Model, DomainError> {
    categories::Entity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(not_found)
}

pub async fn exists<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<bool, DomainError> {
    Ok(categories::Entity::find_by_id(id).count(conn).await? > 0)
}

/// Case-insensitive name check, optionally ignoring one record.
pub async fn name_taken<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, DomainError> {
    let mut select = categories::Entity::find().filter(key_eq(categories::Column::LookupKey, &[name]));
    if let Some(id) = exclude {
        select = select.filter(categories::Column::Id.ne(id));
    }
    Ok(select.count(conn).await? > 0)
}

pub async fn create<C: ConnectionTrait>(
    conn: &C,
    input: CategoryInput,
) -> Result<categories::Model, DomainError> {
    if name_taken(conn, &input.name, None).await? {
        return Err(name_conflict());
    }

    let now = OffsetDateTime::now_utc();
    let model = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        lookup_key: Set(lookup_key(&[input.name.as_str()])),
        name: Set(input.name),
        description: Set(input.description),
        icon: Set(input.icon),
        sort_order: Set(input.sort_order),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?)
}

/// All-or-nothing when `conn` is a transaction.
pub async fn create_many<C: ConnectionTrait>(
    conn: &C,
    inputs: Vec<CategoryInput>,
) -> Result<Vec<categories::Model>, DomainError> {
    if let Some(dup) = first_duplicate(inputs.iter().map(|i| &i.name)) {
        return Err(DomainError::conflict(
            ConflictKind::Duplicate,
            format!("Duplicate category name in batch: {dup}"),
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
    input: CategoryInput,
) -> Result<categories::Model, DomainError> {
    let existing = find(conn, id).await?;
    if name_taken(conn, &input.name, Some(id)).await? {
        return Err(name_conflict());
    }

    let mut model = existing.into_active_model();
    model.lookup_key = Set(lookup_key(&[input.name.as_str()]));
    model.name = Set(input.name);
    model.description = Set(input.description);
    model.icon = Set(input.icon);
    model.sort_order = Set(input.sort_order);
    model.is_active = Set(input.is_active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

pub async fn skill_count<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<u64, DomainError> {
    Ok(skills::Entity::find()
        .filter(skills::Column::CategoryId.eq(id))
        .count(conn)
        .await?)
}

/// Refuses while any skill still references the category.
pub async fn delete<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<(), DomainError> {
    find(conn, id).await?;

    let in_use = skill_count(conn, id).await?;
    if in_use > 0 {
        return Err(DomainError::conflict(
            ConflictKind::CategoryInUse,
            format!("Cannot delete category: {in_use} skill(s) still reference it"),
        ));
    }

    categories::Entity::delete_by_id(id).exec(conn).await?;
    Ok(())
}

pub async fn toggle_active<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<categories::Model, DomainError> {
    let existing = find(conn, id).await?;
    let active = existing.is_active;
    let mut model = existing.into_active_model();
    model.is_active = Set(!active);
    model.updated_at = Set(OffsetDateTime::now_utc());
    Ok(model.update(conn).await?)
}

/// Returns the number of rows changed.
pub async fn set_active_many<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
    active: bool,
) -> Result<u64, DomainError> {
    let result = categories::Entity::update_many()
        .col_expr(categories::Column::IsActive, Expr::value(active))
        .col_expr(categories::Column::UpdatedAt, Expr::value(OffsetDateTime::now_utc()))
        .filter(categories::Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_active<C: ConnectionTrait>(conn: &C) -> Result<u64, DomainError> {
    Ok(categories::Entity::find()
        .filter(categories::Column::IsActive.eq(true))
        .count(conn)
        .await?)
}
