//! Cache diagnostics - exercise the write-through and read-through paths
//! directly and report where the post came from.

use actix_web::{HttpResponse, web};

use blogforge_core::PostError;
use blogforge_core::services::post_cache::{POST_CACHE_TTL, post_key};
use blogforge_core::services::{PostLookup, PostSource};
use blogforge_shared::ErrorResponse;
use blogforge_shared::dto::{CacheInfo, CacheProbeResponse, CreatePostRequest, PostIdQuery};

use super::posts::to_input;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, field_errors};
use crate::observability::RequestId;
use crate::state::AppState;

fn source_label(source: PostSource) -> &'static str {
    match source {
        PostSource::Cache => "cache",
        PostSource::Store => "database",
    }
}

/// POST /api/cache/posts
pub async fn create_and_cache(
    state: web::Data<AppState>,
    identity: Identity,
    request_id: RequestId,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    if req.has_missing_fields() {
        return Err(AppError::BadRequest(
            "Please send title, description, content and tags".to_string(),
        ));
    }

    let created = match state.posts.create_post(identity.user_id, to_input(req)).await {
        Ok(created) => created,
        Err(PostError::Validation(errors)) => {
            return Ok(HttpResponse::BadRequest().json(
                ErrorResponse::bad_request("Validation error")
                    .with_errors(field_errors(&errors))
                    .with_request_id(request_id.as_str()),
            ));
        }
        Err(PostError::Persistence(e)) => {
            tracing::error!(
                request_id = %request_id.as_str(),
                author_id = %identity.user_id,
                error = %e,
                "Cache write-through could not persist the post"
            );
            return Err(AppError::Internal("Failed to create post".to_string()));
        }
    };

    let message = if created.cached {
        "Post created and cached"
    } else {
        "Post created, but the cache write failed"
    };
    tracing::debug!(
        request_id = %request_id.as_str(),
        post_id = %created.post.id,
        cached = created.cached,
        "Cache probe write"
    );

    Ok(HttpResponse::Ok().json(CacheProbeResponse {
        message: message.to_string(),
        source: source_label(PostSource::Store).to_string(),
        cache: Some(CacheInfo {
            cached: created.cached,
            key: post_key(created.post.id),
            ttl: POST_CACHE_TTL.as_secs(),
        }),
        post: created.post,
    }))
}

/// GET /api/cache/posts?id=
pub async fn probe(
    state: web::Data<AppState>,
    query: web::Query<PostIdQuery>,
) -> AppResult<HttpResponse> {
    let Some(id) = query.id.as_deref().filter(|id| !id.is_empty()) else {
        return Err(AppError::BadRequest("Please provide a post ID".to_string()));
    };

    match state.posts.get_post(Some(id)).await? {
        PostLookup::Found { post, source } => {
            let message = match source {
                PostSource::Cache => "Retrieved from cache",
                PostSource::Store => "Retrieved from database",
            };
            Ok(HttpResponse::Ok().json(CacheProbeResponse {
                message: message.to_string(),
                source: source_label(source).to_string(),
                post,
                cache: None,
            }))
        }
        PostLookup::NotFound => Err(AppError::NotFound("Post not found".to_string())),
    }
}
