//! Explore page feeds, leaderboard and stats.

use actix_web::{HttpResponse, web};

use blogforge_core::services::{FEED_LIMIT, LEADERBOARD_LIMIT};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/explore/trending
pub async fn trending(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.explore.trending(FEED_LIMIT).await?))
}

/// GET /api/explore/for-you
pub async fn for_you(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let feed = state.explore.for_you(viewer.user_id(), FEED_LIMIT).await?;
    Ok(HttpResponse::Ok().json(feed))
}

/// GET /api/explore/following
pub async fn following(state: web::Data<AppState>, identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(state.explore.following(identity.user_id).await)
}

/// GET /api/explore/leaderboard
pub async fn leaderboard(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.explore.top_authors(LEADERBOARD_LIMIT).await?))
}

/// GET /api/explore/stats
pub async fn stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.explore.user_stats(identity.user_id).await?))
}

/// GET /api/explore/featured
pub async fn featured(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.explore.featured_post().await?))
}
