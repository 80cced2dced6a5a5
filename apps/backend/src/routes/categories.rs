use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::bulk::{BulkCreate, BulkToggle};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::Category;
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ObjectId, ValidatedJson};
use crate::http::{created, message, ok, PageParams, Validator};
use crate::repos::categories::{self, CategoryFilter, CategoryInput};
use crate::state::app_state::AppState;

/// Create/replace body; also the PATCH body, where absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub icon: Option<Option<String>>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl CategoryPayload {
    fn from_model(m: &Category) -> Self {
        Self {
            name: Some(m.name.clone()),
            description: Some(m.description.clone()),
            icon: Some(m.icon.clone()),
            sort_order: Some(i64::from(m.sort_order)),
            is_active: Some(m.is_active),
        }
    }

    fn overlay(self, patch: Self) -> Self {
        Self {
            name: patch.name.or(self.name),
            description: patch.description.or(self.description),
            icon: patch.icon.or(self.icon),
            sort_order: patch.sort_order.or(self.sort_order),
            is_active: patch.is_active.or(self.is_active),
        }
    }

    pub fn validate(self) -> Result<CategoryInput, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("name", "Name", self.name, 2, 50);
        let description = v.optional_text("description", "Description", self.description.flatten(), 500);
        let icon = v.optional_text("icon", "Icon", self.icon.flatten(), 100);
        let sort_order = v
            .int_in("sortOrder", "Sort order", self.sort_order, 0, i64::from(i32::MAX))
            .unwrap_or(0);
        v.finish()?;

        Ok(CategoryInput {
            name,
            description,
            icon,
            sort_order: i32::try_from(sort_order).unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let page = PageParams {
        page: q.page,
        limit: q.limit,
    };
    let filter = CategoryFilter {
        search: q.search,
        is_active: q.is_active,
    };
    let result = categories::list(require_db(&state)?, &filter, &page).await?;
    Ok(ok("Categories retrieved successfully", result))
}

async fn get(state: web::Data<AppState>, id: ObjectId) -> Result<HttpResponse, AppError> {
    let category = categories::find(require_db(&state)?, id.0).await?;
    Ok(ok("Category retrieved successfully", category))
}

async fn create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<CategoryPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let category = categories::create(require_db(&state)?, input).await?;
    Ok(created("Category created successfully", category))
}

async fn replace(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<CategoryPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let category = categories::update(require_db(&state)?, id.0, input).await?;
    Ok(ok("Category updated successfully", category))
}

async fn patch(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<CategoryPayload>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let existing = categories::find(db, id.0).await?;
    let input = CategoryPayload::from_model(&existing)
        .overlay(body.into_inner())
        .validate()?;
    let category = categories::update(db, id.0, input).await?;
    Ok(ok("Category updated successfully", category))
}

async fn delete(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    categories::delete(require_db(&state)?, id.0).await?;
    Ok(message("Category deleted successfully"))
}

async fn toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    let category = categories::toggle_active(require_db(&state)?, id.0).await?;
    let verb = if category.is_active { "activated" } else { "deactivated" };
    Ok(ok(format!("Category {verb} successfully"), category))
}

async fn bulk_create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkCreate<CategoryPayload>>,
) -> Result<HttpResponse, AppError> {
    let inputs = body.into_inner().validate_each(CategoryPayload::validate)?;
    let created_rows = with_txn(require_db(&state)?, move |txn| {
        Box::pin(async move {
            categories::create_many(txn, inputs)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;
    Ok(created(
        format!("{} categories created successfully", created_rows.len()),
        created_rows,
    ))
}

async fn bulk_toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkToggle>,
) -> Result<HttpResponse, AppError> {
    let (ids, active) = body.into_inner().validate()?;
    let modified = categories::set_active_many(require_db(&state)?, &ids, active).await?;
    Ok(ok(
        format!("{modified} categories updated successfully"),
        json!({ "modifiedCount": modified }),
    ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::get().to(list))
            .route(web::post().to(create)),
    )
    .route("/bulk", web::post().to(bulk_create))
    .route("/bulk/toggle-status", web::patch().to(bulk_toggle_status))
    .service(
        web::resource("/{id}")
            .route(web::get().to(get))
            .route(web::put().to(replace))
            .route(web::patch().to(patch))
            .route(web::delete().to(delete)),
    )
    .route("/{id}/toggle-status", web::patch().to(toggle_status));
}
