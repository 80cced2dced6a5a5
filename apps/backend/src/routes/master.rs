use actix_web::{web, HttpResponse};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::http::ok;
use crate::services::master;
use crate::state::app_state::AppState;

async fn master_data(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let today = OffsetDateTime::now_utc().date();
    let data = master::build(require_db(&state)?, today).await?;
    Ok(ok("Master data retrieved successfully", data))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource(["", "/"]).route(web::get().to(master_data)));
}
