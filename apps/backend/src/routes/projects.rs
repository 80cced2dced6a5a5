use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::bulk::{BulkCreate, BulkToggle};
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::entities::{Project, StringList};
use crate::error::AppError;
use crate::errors::FieldErrors;
use crate::extractors::{CurrentUser, ObjectId, ValidatedJson};
use crate::http::{created, message, ok, PageParams, Validator};
use crate::middleware::rate_limit::RateLimits;
use crate::middleware::RequireUser;
use crate::repos::projects::{self, ProjectFilter, ProjectInput};
use crate::state::app_state::AppState;
use crate::uploads::{process_upload, StagedUpload, UploadKind, UploadOutcome};

pub const PROJECT_STATUSES: [&str; 3] = ["completed", "in-progress", "planned"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<Vec<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub github_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub live_url: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub image_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub status: Option<String>,
    pub sort_order: Option<i64>,
    pub is_active: Option<bool>,
}

impl ProjectPayload {
    fn from_model(m: &Project) -> Self {
        Self {
            title: Some(m.title.clone()),
            description: Some(m.description.clone()),
            technologies: Some(m.technologies.0.clone()),
            github_url: Some(m.github_url.clone()),
            live_url: Some(m.live_url.clone()),
            image_url: Some(m.image_url.clone()),
            featured: Some(m.featured),
            status: Some(m.status.clone()),
            sort_order: Some(i64::from(m.sort_order)),
            is_active: Some(m.is_active),
        }
    }

    fn overlay(self, patch: Self) -> Self {
        Self {
            title: patch.title.or(self.title),
            description: patch.description.or(self.description),
            technologies: patch.technologies.or(self.technologies),
            github_url: patch.github_url.or(self.github_url),
            live_url: patch.live_url.or(self.live_url),
            image_url: patch.image_url.or(self.image_url),
            featured: patch.featured.or(self.featured),
            status: patch.status.or(self.status),
            sort_order: patch.sort_order.or(self.sort_order),
            is_active: patch.is_active.or(self.is_active),
        }
    }

    pub fn validate(self) -> Result<ProjectInput, FieldErrors> {
        let mut v = Validator::new();
        let title = v.required_text("title", "Title", self.title, 1, 100);
        let description = v.required_text("description", "Description", self.description, 1, 2000);
        let github_url = v.optional_url("githubUrl", "GitHub URL", self.github_url.flatten());
        let live_url = v.optional_url("liveUrl", "Live URL", self.live_url.flatten());
        let image_url = v.optional_url("imageUrl", "Image URL", self.image_url.flatten());
        let status = v.one_of(
            "status",
            "Status",
            self.status,
            &PROJECT_STATUSES,
            PROJECT_STATUSES[0],
        );
        let sort_order = v
            .int_in("sortOrder", "Sort order", self.sort_order, 0, i64::from(i32::MAX))
            .unwrap_or(0);
        v.finish()?;

        Ok(ProjectInput {
            title,
            description,
            technologies: StringList::cleaned(self.technologies.unwrap_or_default()),
            github_url,
            live_url,
            image_url,
            featured: self.featured.unwrap_or(false),
            status,
            sort_order: i32::try_from(sort_order).unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub featured: Option<bool>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectImage {
    pub upload: UploadOutcome,
    pub project: Project,
}

async fn list(
    state: web::Data<AppState>,
    query: web::Query<ProjectQuery>,
) -> Result<HttpResponse, AppError> {
    let q = query.into_inner();
    let page = PageParams {
        page: q.page,
        limit: q.limit,
    };
    let filter = ProjectFilter {
        search: q.search,
        is_active: q.is_active,
        featured: q.featured,
        status: q.status,
    };
    let result = projects::list(require_db(&state)?, &filter, &page).await?;
    Ok(ok("Projects retrieved successfully", result))
}

async fn get(state: web::Data<AppState>, id: ObjectId) -> Result<HttpResponse, AppError> {
    let project = projects::find(require_db(&state)?, id.0).await?;
    Ok(ok("Project retrieved successfully", project))
}

async fn create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<ProjectPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let project = projects::create(require_db(&state)?, input).await?;
    Ok(created("Project created successfully", project))
}

async fn replace(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<ProjectPayload>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().validate()?;
    let project = projects::update(require_db(&state)?, id.0, input).await?;
    Ok(ok("Project updated successfully", project))
}

async fn patch(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    body: ValidatedJson<ProjectPayload>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    let existing = projects::find(db, id.0).await?;
    let input = ProjectPayload::from_model(&existing)
        .overlay(body.into_inner())
        .validate()?;
    let project = projects::update(db, id.0, input).await?;
    Ok(ok("Project updated successfully", project))
}

async fn delete(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    projects::delete(require_db(&state)?, id.0).await?;
    Ok(message("Project deleted successfully"))
}

async fn toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
) -> Result<HttpResponse, AppError> {
    let project = projects::toggle_active(require_db(&state)?, id.0).await?;
    let verb = if project.is_active { "activated" } else { "deactivated" };
    Ok(ok(format!("Project {verb} successfully"), project))
}

async fn bulk_create(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkCreate<ProjectPayload>>,
) -> Result<HttpResponse, AppError> {
    let inputs = body.into_inner().validate_each(ProjectPayload::validate)?;
    let created_rows = with_txn(require_db(&state)?, move |txn| {
        Box::pin(async move {
            projects::create_many(txn, inputs)
                .await
                .map_err(AppError::from)
        })
    })
    .await?;
    Ok(created(
        format!("{} projects created successfully", created_rows.len()),
        created_rows,
    ))
}

async fn bulk_toggle_status(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    body: ValidatedJson<BulkToggle>,
) -> Result<HttpResponse, AppError> {
    let (ids, active) = body.into_inner().validate()?;
    let modified = projects::set_active_many(require_db(&state)?, &ids, active).await?;
    Ok(ok(
        format!("{modified} projects updated successfully"),
        json!({ "modifiedCount": modified }),
    ))
}

/// The project must exist before anything is uploaded.
async fn upload_image(
    _admin: CurrentUser,
    state: web::Data<AppState>,
    id: ObjectId,
    staged: StagedUpload,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&state)?;
    projects::find(db, id.0).await?;

    let upload = process_upload(state.media.as_ref(), state.optimizer.clone(), staged).await?;
    let project = projects::set_image_url(db, id.0, upload.url.clone()).await?;
    Ok(ok(
        "Project image uploaded successfully",
        ProjectImage { upload, project },
    ))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, limits: &RateLimits) {
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
    .route("/{id}/toggle-status", web::patch().to(toggle_status))
    .service(
        web::resource("/{id}/image")
            .app_data(UploadKind::Project)
            .wrap(RequireUser)
            .wrap(crate::rate_limiter!(limits, UPLOAD))
            .route(web::post().to(upload_image)),
    );
}
