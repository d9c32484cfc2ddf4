// Route exports
pub mod matches;
pub mod search;

use crate::config::SearchSettings;
use crate::core::Matcher;
use crate::error::MatchError;
use crate::models::{ErrorResponse, HealthResponse};
use crate::services::CandidateStore;
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::ValidationErrors;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CandidateStore>,
    pub matcher: Matcher,
    pub search: SearchSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn CandidateStore>, matcher: Matcher, search: SearchSettings) -> Self {
        Self { store, matcher, search }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health_check))
            .configure(matches::configure)
            .configure(search::configure),
    );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        backend: state.store.backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Map a matching or search failure to its JSON error response
pub(crate) fn error_response(err: MatchError) -> HttpResponse {
    let status_code = err.status_code();
    if status_code >= 500 {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::info!("Request rejected: {}", err);
    }

    HttpResponse::build(StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)).json(
        ErrorResponse {
            error: err.label().to_string(),
            message: err.to_string(),
            status_code,
        },
    )
}

pub(crate) fn validation_response(errors: ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message: errors.to_string(),
        status_code: 400,
    })
}
