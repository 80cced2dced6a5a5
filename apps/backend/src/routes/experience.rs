use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::bulk::{BulkCreate, BulkToggle};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::{Experience, StringList};
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ObjectId, ValidatedJson};
use crate::http::{created, message, ok, PageParams, Validator};
use crate::repos::experiences::{self, ExperienceFilter, ExperienceInput};
use crate::serde_date::format_date;
use crate::state::app_state::AppState;

pub const EMPLOYMENT_TYPES: [&str; 5] = ["full-time", "part-time", "contract", "freelance", "internship"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePayload {
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    pub employment_type: Option<String>,
    pub start_date: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<String>>,
    pub is_current: Option<bool>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub technologies: Option<Vec<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub company_url: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl ExperiencePayload {
    fn from_model(m: &Experience) -> Self {
        Self {
            company: Some(m.company.clone()),
            position: Some(m.position.clone()),
            location: Some(m.location.clone()),
            employment_type: Some(m.employment_type.clone()),
            start_date: Some(format_date(&m.start_date)),
            end_date: Some(m.end_date.as_ref().map(format_date)),
            is_current: Some(m.is_current),
            description: Some(m.description.clone()),
            responsibilities: Some(m.responsibilities.0.clone()),
            technologies: Some(m.technologies.0.clone()),
            company_url: Some(m.company_url.clone()),
            is_active: Some(m.is_active),
        }
    }

    /// A patch that sets an end date without mentioning `isCurrent` ends the role.
    fn overlay(self, patch: Self) -> Self {
        let ends_role = matches!(patch.end_date, Some(Some(_))) && patch.is_current.is_none();
        Self {
            company: patch.company.or(self.company),
            position: patch.position.or(self.position),
            location: patch.location.or(self.location),
            employment_type: patch.employment_type.or(self.employment_type),
            start_date: patch.start_date.or(self.start_date),
            end_date: patch.end_date.or(self.end_date),
            is_current: if ends_role {
                Some(false)
            } else {
                patch.is_current.or(self.is_current)
            },
            description: patch.description.or(self.description),
            responsibilities: patch.responsibilities.or(self.responsibilities),
            technologies: patch.technologies.or(self.technologies),
            company_url: patch.company_url.or(self.company_url),
            is_active: patch.is_active.or(self.is_active),
        }
    }

    pub fn validate(self) -> Result<ExperienceInput, FieldErrors> {
        let mut v = Validator::new();
        let company = v.required_text("company", "Company", self.company, 1, 100);
        let position = v.required_text("position", "Position", self.position, 1, 100);
        let location = v.optional_text("location", "Location", self.location.flatten(), 100);
        let employment_type = v.one_of(
            "employmentType",
            "Employment type",
            self.employment_type,
            &EMPLOYMENT_TYPES,
            EMPLOYMENT_TYPES[0],
        );
        let start_date = v.required_date("startDate", "Start date", self.start_date);
        let end_date = v.optional_date("endDate", "End date", self.end_date.flatten());
        let is_current = self.is_current.unwrap_or(false);
        let description =
            v.optional_text("description", "Description", self.description.flatten(), 2000);
        let company_url = v.optional_url("companyUrl", "Company URL", self.company_url.flatten());

        let end_date = if is_current { None } else { end_date };
        if let Some(end) = end_date {
            if !v.has_error("startDate") && end < start_date {
                v.error("endDate", "End date must be on or after start date");
            }
        }
        v.finish()?;

        Ok(ExperienceInput {
            company,
            position,
            location,
            employment_type,
            start_date,
            end_date,
            is_current,
            description,
            responsibilities: StringList::cleaned(self.responsibilities.unwrap_or_default()),
            technologies: StringList::cleaned(self.technologies.unwrap_or_default()),
            company_url,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub is_current: Option<bool>,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ExperienceQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let page = PageParams {
        page: q.page,
        limit: q.limit,
    };
    let filter = ExperienceFilter {
        search: q.search,
        is_active: q.is_active,
        is_current: q.is_current,
    };
    let result = experiences::list(require_db(&state)?, &filter, &page).await?;
    Ok(ok("Experiences retrieved successfully", result))
}

async fn get(state: web::Data<AppState>, id: ObjectId) -> Result<HttpResponse, AppError> {
    let experience = experiences::find(require_db(&state)?, id.0).await?;
    Ok(ok("Experience retrieved successfully", experience))
}

async fn create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<ExperiencePayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let experience = experiences::create(require_db(&state)?, input).await?;
    Ok(created("Experience created successfully", experience))
}

async fn replace(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<ExperiencePayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let experience = experiences::update(require_db(&state)?, id.0, input).await?;
    Ok(ok("Experience updated successfully", experience))
}

async fn patch(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<ExperiencePayload>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let existing = experiences::find(db, id.0).await?;
    let input = ExperiencePayload::from_model(&existing)
        .overlay(body.into_inner())
        .validate()?;
    let experience = experiences::update(db, id.0, input).await?;
    Ok(ok("Experience updated successfully", experience))
}

async fn delete(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    experiences::delete(require_db(&state)?, id.0).await?;
    Ok(message("Experience deleted successfully"))
}

async fn toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    let experience = experiences::toggle_active(require_db(&state)?, id.0).await?;
    let verb = if experience.is_active { "activated" } else { "deactivated" };
    Ok(ok(format!("Experience {verb} successfully"), experience))
}

async fn bulk_create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkCreate<ExperiencePayload>>,
) -> Result<HttpResponse, AppError> {
    let inputs = body.into_inner().validate_each(ExperiencePayload::validate)?;
    let created_rows = with_txn(require_db(&state)?, move |txn| {
        Box::pin(async move {
            experiences::create_many(txn, inputs)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;
    Ok(created(
        format!("{} experiences created successfully", created_rows.len()),
        created_rows,
    ))
}

async fn bulk_toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkToggle>,
) -> Result<HttpResponse, AppError> {
    let (ids, active) = body.into_inner().validate()?;
    let modified = experiences::set_active_many(require_db(&state)?, &ids, active).await?;
    Ok(ok(
        format!("{modified} experiences updated successfully"),
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
