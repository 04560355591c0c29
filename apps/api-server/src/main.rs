//! # Folio API Server
//!
//! Actix-web entry point: posts with a role-driven status lifecycle, and
//! likes whose counters are resynced from the like relation.

use actix_web::{App, HttpServer, middleware::from_fn, web};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

#[cfg(feature = "scheduler")]
mod background;

use folio_core::ports::{PasswordService, RateLimiter, TokenService};
use folio_infra::{Argon2PasswordService, JwtTokenService};

use config::AppConfig;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting Folio API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await;
    let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::from_env());
    let limiter = build_rate_limiter();

    #[cfg(feature = "scheduler")]
    let jobs = background::BackgroundJobs::start(
        &background::SchedulerConfig::from_env(),
        state.likes.clone(),
    )
    .await?;

    HttpServer::new(move || {
        let limiter = limiter.clone();
        App::new()
            .wrap(TracingLogger::default())
            .wrap(from_fn(observability::propagate_request_id))
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(password_service.clone()))
            .configure(move |cfg| handlers::configure_routes(cfg, limiter))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    jobs.shutdown().await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "rate-limit")]
fn build_rate_limiter() -> Option<Arc<dyn RateLimiter>> {
    Some(Arc::new(folio_infra::InMemoryRateLimiter::from_env()))
}

#[cfg(not(feature = "rate-limit"))]
fn build_rate_limiter() -> Option<Arc<dyn RateLimiter>> {
    tracing::info!("Rate limiting disabled");
    None
}
