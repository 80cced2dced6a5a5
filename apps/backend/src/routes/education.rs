use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::bulk::{BulkCreate, BulkToggle};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::Education;
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ObjectId, ValidatedJson};
use crate::http::{created, message, ok, PageParams, Validator};
use crate::repos::educations::{self, EducationFilter, EducationInput};
use crate::serde_date::format_date;
use crate::state::app_state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPayload {
    pub institution: Option<String>,
    pub degree: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub location: Option<Option<String>>,
    pub start_date: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub grade: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl EducationPayload {
    fn from_model(m: &Education) -> Self {
        Self {
            institution: Some(m.institution.clone()),
            degree: Some(m.degree.clone()),
            field_of_study: Some(m.field_of_study.clone()),
            location: Some(m.location.clone()),
            start_date: Some(format_date(&m.start_date)),
            end_date: Some(m.end_date.as_ref().map(format_date)),
            grade: Some(m.grade.clone()),
            description: Some(m.description.clone()),
            is_active: Some(m.is_active),
        }
    }

    fn overlay(self, patch: Self) -> Self {
        Self {
            institution: patch.institution.or(self.institution),
            degree: patch.degree.or(self.degree),
            field_of_study: patch.field_of_study.or(self.field_of_study),
            location: patch.location.or(self.location),
            start_date: patch.start_date.or(self.start_date),
            end_date: patch.end_date.or(self.end_date),
            grade: patch.grade.or(self.grade),
            description: patch.description.or(self.description),
            is_active: patch.is_active.or(self.is_active),
        }
    }

    pub fn validate(self) -> Result<EducationInput, FieldErrors> {
        let mut v = Validator::new();
        let institution = v.required_text("institution", "Institution", self.institution, 1, 150);
        let degree = v.required_text("degree", "Degree", self.degree, 1, 100);
        let field_of_study =
            v.optional_text("fieldOfStudy", "Field of study", self.field_of_study.flatten(), 100);
        let location = v.optional_text("location", "Location", self.location.flatten(), 100);
        let start_date = v.required_date("startDate", "Start date", self.start_date);
        let end_date = v.optional_date("endDate", "End date", self.end_date.flatten());
        let grade = v.optional_text("grade", "Grade", self.grade.flatten(), 50);
        let description =
            v.optional_text("description", "Description", self.description.flatten(), 1000);

        if let Some(end) = end_date {
            if !v.has_error("startDate") && end < start_date {
                v.error("endDate", "End date must be on or after start date");
            }
        }
        v.finish()?;

        Ok(EducationInput {
            institution,
            degree,
            field_of_study,
            location,
            start_date,
            end_date,
            grade,
            description,
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<EducationQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let page = PageParams {
        page: q.page,
        limit: q.limit,
    };
    let filter = EducationFilter {
        search: q.search,
        is_active: q.is_active,
    };
    let result = educations::list(require_db(&state)?, &filter, &page).await?;
    Ok(ok("Education retrieved successfully", result))
}

async fn get(state: web::Data<AppState>, id: ObjectId) -> Result<HttpResponse, AppError> {
    let education = educations::find(require_db(&state)?, id.0).await?;
    Ok(ok("Education retrieved successfully", education))
}

async fn create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<EducationPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let education = educations::create(require_db(&state)?, input).await?;
    Ok(created("Education created successfully", education))
}

async fn replace(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<EducationPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let education = educations::update(require_db(&state)?, id.0, input).await?;
    Ok(ok("Education updated successfully", education))
}

async fn patch(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<EducationPayload>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let existing = educations::find(db, id.0).await?;
    let input = EducationPayload::from_model(&existing)
        .overlay(body.into_inner())
        .validate()?;
    let education = educations::update(db, id.0, input).await?;
    Ok(ok("Education updated successfully", education))
}

async fn delete(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    educations::delete(require_db(&state)?, id.0).await?;
    Ok(message("Education deleted successfully"))
}

async fn toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    let education = educations::toggle_active(require_db(&state)?, id.0).await?;
    let verb = if education.is_active { "activated" } else { "deactivated" };
    Ok(ok(format!("Education {verb} successfully"), education))
}

async fn bulk_create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkCreate<EducationPayload>>,
) -> Result<HttpResponse, AppError> {
    let inputs = body.into_inner().validate_each(EducationPayload::validate)?;
    let created_rows = with_txn(require_db(&state)?, move |txn| {
        Box::pin(async move {
            educations::create_many(txn, inputs)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;
    Ok(created(
        format!("{} education records created successfully", created_rows.len()),
        created_rows,
    ))
}

async fn bulk_toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkToggle>,
) -> Result<HttpResponse, AppError> {
    let (ids, active) = body.into_inner().validate()?;
    let modified = educations::set_active_many(require_db(&state)?, &ids, active).await?;
    Ok(ok(
        format!("{modified} education records updated successfully"),
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
