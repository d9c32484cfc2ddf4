use crate::core::search::{self, GroupSearch, UserSearch};
use crate::error::MatchError;
use crate::models::{LatestRequest, SearchGroupsRequest, SearchUsersRequest};
use crate::routes::{error_response, validation_response, AppState};
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// Configure search and listing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/groups/search", web::get().to(search_groups))
        .route("/groups/latest", web::get().to(latest_groups))
        .route("/users/search", web::get().to(search_users))
        .route("/users/latest", web::get().to(latest_users));
}

/// Faceted group search
///
/// GET /api/v1/groups/search?location=&dateFrom=&dateTo=&travelTypes=&lodgings=&languages=&ageRanges=&budget=&gender=&page=&limit=
async fn search_groups(state: web::Data<AppState>, query: web::Query<SearchGroupsRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    let criteria = match GroupSearch::try_from(&*query) {
        Ok(criteria) => criteria,
        Err(e) => return error_response(MatchError::from(e)),
    };
    let pagination = query.pagination(state.search.default_limit, state.search.max_limit);

    match search::search_groups(&*state.store, &criteria, pagination).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}

/// Faceted user search
///
/// GET /api/v1/users/search?travelTypes=&interests=&tripDurations=&lodgings=&languages=&budget=&gender=&page=&limit=
async fn search_users(state: web::Data<AppState>, query: web::Query<SearchUsersRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    let criteria = match UserSearch::try_from(&*query) {
        Ok(criteria) => criteria,
        Err(e) => return error_response(MatchError::from(e)),
    };
    let pagination = query.pagination(state.search.default_limit, state.search.max_limit);

    match search::search_users(&*state.store, &criteria, pagination).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/groups/latest?limit=
async fn latest_groups(state: web::Data<AppState>, query: web::Query<LatestRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    let limit = latest_limit(&state, &query);
    match search::latest_groups(&*state.store, limit).await {
        Ok(cards) => HttpResponse::Ok().json(cards),
        Err(e) => error_response(e),
    }
}

/// GET /api/v1/users/latest?limit=
async fn latest_users(state: web::Data<AppState>, query: web::Query<LatestRequest>) -> impl Responder {
    if let Err(errors) = query.validate() {
        return validation_response(errors);
    }

    let limit = latest_limit(&state, &query);
    match search::latest_profiles(&*state.store, limit).await {
        Ok(avatars) => HttpResponse::Ok().json(avatars),
        Err(e) => error_response(e),
    }
}

fn latest_limit(state: &AppState, query: &LatestRequest) -> usize {
    query
        .limit
        .unwrap_or(state.search.default_limit)
        .min(state.search.max_limit) as usize
}
