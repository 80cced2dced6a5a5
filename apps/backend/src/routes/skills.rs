use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::bulk::{BulkCreate, BulkToggle};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::Skill;
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ObjectId, ValidatedJson};
use crate::http::{created, message, ok, PageParams, Validator};
use crate::repos::skills::{self, SkillFilter, SkillInput};
use crate::state::app_state::AppState;

pub const DEFAULT_PROFICIENCY: i16 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPayload {
    pub name: Option<String>,
    pub category_id: Option<String>,
    pub proficiency: Option<i64>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub years_of_experience: Option<Option<i64>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub icon: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl SkillPayload {
    fn from_model(m: &Skill) -> Self {
        Self {
            name: Some(m.name.clone()),
            category_id: Some(m.category_id.to_string()),
            proficiency: Some(i64::from(m.proficiency)),
            years_of_experience: Some(m.years_of_experience.map(i64::from)),
            icon: Some(m.icon.clone()),
            is_active: Some(m.is_active),
        }
    }

    fn overlay(self, patch: Self) -> Self {
        Self {
            name: patch.name.or(self.name),
            category_id: patch.category_id.or(self.category_id),
            proficiency: patch.proficiency.or(self.proficiency),
            years_of_experience: patch.years_of_experience.or(self.years_of_experience),
            icon: patch.icon.or(self.icon),
            is_active: patch.is_active.or(self.is_active),
        }
    }

    pub fn validate(self) -> Result<SkillInput, FieldErrors> {
        let mut v = Validator::new();
        let name = v.required_text("name", "Skill name", self.name, 1, 50);

        let category_id = match self.category_id.as_deref().map(str::trim) {
            None | Some("") => {
                v.error("categoryId", "Category is required");
                Uuid::nil()
            }
            Some(raw) => Uuid::parse_str(raw).unwrap_or_else(|_| {
                v.error("categoryId", "Invalid category id");
                Uuid::nil()
            }),
        };

        let proficiency = v.int_in("proficiency", "Proficiency", self.proficiency, 1, 100);
        let years = v.int_in(
            "yearsOfExperience",
            "Years of experience",
            self.years_of_experience.flatten(),
            0,
            60,
        );
        let icon = v.optional_text("icon", "Icon", self.icon.flatten(), 100);
        v.finish()?;

        Ok(SkillInput {
            name,
            category_id,
            proficiency: proficiency
                .and_then(|p| i16::try_from(p).ok())
                .unwrap_or(DEFAULT_PROFICIENCY),
            years_of_experience: years.and_then(|y| i16::try_from(y).ok()),
            icon,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub category: Option<Uuid>,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<SkillQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let page = PageParams {
        page: q.page,
        limit: q.limit,
    };
    let filter = SkillFilter {
        search: q.search,
        is_active: q.is_active,
        category_id: q.category,
    };
    let result = skills::list(require_db(&state)?, &filter, &page).await?;
    Ok(ok("Skills retrieved successfully", result))
}

async fn get(state: web::Data<AppState>, id: ObjectId) -> Result<HttpResponse, AppError> {
    let skill = skills::find(require_db(&state)?, id.0).await?;
    Ok(ok("Skill retrieved successfully", skill))
}

async fn create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<SkillPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let skill = skills::create(require_db(&state)?, input).await?;
    Ok(created("Skill created successfully", skill))
}

async fn replace(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<SkillPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let skill = skills::update(require_db(&state)?, id.0, input).await?;
    Ok(ok("Skill updated successfully", skill))
}

async fn patch(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<SkillPayload>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let existing = skills::find(db, id.0).await?;
    let input = SkillPayload::from_model(&existing)
        .overlay(body.into_inner())
        .validate()?;
    let skill = skills::update(db, id.0, input).await?;
    Ok(ok("Skill updated successfully", skill))
}

async fn delete(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    skills::delete(require_db(&state)?, id.0).await?;
    Ok(message("Skill deleted successfully"))
}

async fn toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    let skill = skills::toggle_active(require_db(&state)?, id.0).await?;
    let verb = if skill.is_active { "activated" } else { "deactivated" };
    Ok(ok(format!("Skill {verb} successfully"), skill))
}

async fn bulk_create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkCreate<SkillPayload>>,
) -> Result<HttpResponse, AppError> {
    let inputs = body.into_inner().validate_each(SkillPayload::validate)?;
    let created_rows = with_txn(require_db(&state)?, move |txn| {
        Box::pin(async move { skills::create_many(txn, inputs).await.map_err(AppError::from) })
    })
    .await?;
    Ok(created(
        format!("{} skills created successfully", created_rows.len()),
        created_rows,
    ))
}

async fn bulk_toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkToggle>,
) -> Result<HttpResponse, AppError> {
    let (ids, active) = body.into_inner().validate()?;
    let modified = skills::set_active_many(require_db(&state)?, &ids, active).await?;
    Ok(ok(
        format!("{modified} skills updated successfully"),
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
