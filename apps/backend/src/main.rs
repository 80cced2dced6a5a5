use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::auth::revocation::{spawn_sweeper, DEFAULT_SWEEP_INTERVAL};
use backend::config::{AppConfig, DbProfile};
use backend::infra::state::build_state;
use backend::middleware::cors::cors_middleware;
use backend::middleware::rate_limit::RateLimits;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::security_headers::SecurityHeaders;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;
use backend::routes;
use backend::state::security_config::SecurityConfig;
use backend::uploads::{CloudinaryStore, InMemoryMediaStore, MediaStore};
use tracing::{info, warn};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let media: Arc<dyn MediaStore> = match &config.cloudinary {
        Some(cloudinary) => match CloudinaryStore::new(cloudinary.clone()) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                eprintln!("❌ Failed to initialise media storage: {e}");
                std::process::exit(1);
            }
        },
        None => {
            warn!("Cloudinary is not configured; uploads are kept in memory and lost on restart");
            Arc::new(InMemoryMediaStore::new())
        }
    };

    let security = SecurityConfig::new(config.jwt_secret.as_bytes()).with_token_ttl(config.jwt_ttl);
    let app_state = match build_state()
        .with_env(config.env)
        .with_db(DbProfile::Prod)
        .with_security(security)
        .with_media_store(media)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let _sweeper = spawn_sweeper(app_state.revocations.clone(), DEFAULT_SWEEP_INTERVAL);
    let limits = RateLimits::new(config.env.is_production());
    if !limits.enabled {
        info!(env = ?config.env, "rate limiting disabled outside production");
    }

    info!(host = %config.host, port = config.port, env = ?config.env, "starting portfolio backend");

    let data = web::Data::new(app_state);
    let origins = config.cors_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure(limits.clone()))
            .default_service(web::to(routes::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
