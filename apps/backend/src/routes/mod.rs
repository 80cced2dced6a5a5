//! HTTP surface: `/health` plus everything under `/api`.
//!
//! Rate limiters attach here, per scope or resource; handlers never see them.

use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::rate_limit::RateLimits;

pub mod auth;
pub mod bulk;
pub mod categories;
pub mod education;
pub mod experience;
pub mod health;
pub mod master;
pub mod projects;
pub mod skills;

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    AppError::bad_request(ErrorCode::BadRequest, format!("Invalid query string: {err}")).into()
}

/// Register all routes. Shared by `main` and the integration tests so both
/// see the same limiter wiring.
pub fn configure(limits: RateLimits) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::QueryConfig::default().error_handler(query_error))
            .service(web::scope("/health").configure(health::configure_routes))
            .service(
                web::scope("/api")
                    .wrap(crate::rate_limiter!(&limits, GENERAL))
                    .service(
                        web::scope("/auth").configure(|c| auth::configure_routes(c, &limits)),
                    )
                    .service(web::scope("/categories").configure(categories::configure_routes))
                    .service(web::scope("/skills").configure(skills::configure_routes))
                    .service(web::scope("/experience").configure(experience::configure_routes))
                    .service(web::scope("/education").configure(education::configure_routes))
                    .service(
                        web::scope("/projects").configure(|c| projects::configure_routes(c, &limits)),
                    )
                    .service(
                        web::scope("/master")
                            .wrap(crate::rate_limiter!(&limits, PUBLIC))
                            .configure(master::configure_routes),
                    )
                    .default_service(web::to(not_found)),
            );
    }
}

/// Fallback for unmatched paths.
pub async fn not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::not_found(
        ErrorCode::NotFound,
        format!("Route {} {} not found", req.method(), req.path()),
    ))
}
