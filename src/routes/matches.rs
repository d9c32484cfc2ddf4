use crate::core::RatingSummary;
use crate::error::MatchError;
use crate::models::{MatchRequest, UserId};
use crate::routes::{error_response, validation_response, AppState};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/match/groups", web::get().to(match_groups))
        .route("/match/users", web::get().to(match_users))
        .route("/users/{user_id}/rating", web::get().to(user_rating));
}

/// Ranked groups for a user
///
/// GET /api/v1/match/groups?userId={userId}
async fn match_groups(state: web::Data<AppState>, query: web::Query<MatchRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    tracing::info!("Matching groups for user: {}", query.user_id);

    match state.matcher.match_groups(&*state.store, query.user_id).await {
        Ok(cards) => HttpResponse::Ok().json(cards),
        Err(e) => error_response(e),
    }
}

/// Ranked fellow travelers for a user
///
/// GET /api/v1/match/users?userId={userId}
async fn match_users(state: web::Data<AppState>, query: web::Query<MatchRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    tracing::info!("Matching users for user: {}", query.user_id);

    match state.matcher.match_users(&*state.store, query.user_id).await {
        Ok(avatars) => HttpResponse::Ok().json(avatars),
        Err(e) => error_response(e),
    }
}

/// Average rating received by a user
///
/// GET /api/v1/users/{userId}/rating
async fn user_rating(state: web::Data<AppState>, path: web::Path<UserId>) -> impl Responder {
    let user_id = path.into_inner();

    let values = match state.store.ratings_received(user_id).await {
        Ok(values) => values,
        Err(e) => return error_response(MatchError::from(e)),
    };

    HttpResponse::Ok().json(RatingSummary::from_values(&values))
}
