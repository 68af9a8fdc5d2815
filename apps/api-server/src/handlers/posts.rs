//! Post handlers - listing, authoring and reading.

use actix_web::{HttpResponse, web};

use blogforge_core::PostError;
use blogforge_core::domain::{CreatePostInput, DEFAULT_PAGE_SIZE, Post};
use blogforge_core::services::PostLookup;
use blogforge_shared::ApiResponse;
use blogforge_shared::dto::{CreatePostRequest, PageQuery};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, field_errors};
use crate::state::AppState;

/// Absent fields become empty values and fail validation field by field.
pub(crate) fn to_input(req: CreatePostRequest) -> CreatePostInput {
    CreatePostInput {
        title: req.title.unwrap_or_default(),
        description: req.description.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        tags: req.tags.map(|t| t.into_vec()).unwrap_or_default(),
    }
}

/// GET /api/posts?page=&page_size=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let page = state
        .posts
        .list_posts(
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await;

    HttpResponse::Ok().json(page)
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> HttpResponse {
    match state
        .posts
        .create_post(identity.user_id, to_input(body.into_inner()))
        .await
    {
        Ok(created) => HttpResponse::Created().json(ApiResponse::ok_with_message(
            created.post,
            "Blog created successfully!",
        )),
        Err(PostError::Validation(errors)) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::<Post>::invalid("Validation error", field_errors(&errors)),
        ),
        Err(PostError::Persistence(_)) => HttpResponse::InternalServerError().json(
            ApiResponse::<Post>::failure("Failed to create blog. Please try again."),
        ),
    }
}

/// GET /api/posts/mine
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(state.posts.posts_by_author(identity.user_id).await)
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    match state.posts.get_post(Some(path.as_str())).await? {
        PostLookup::Found { post, .. } => Ok(HttpResponse::Ok().json(post)),
        PostLookup::NotFound => Err(AppError::NotFound("Post not found".to_string())),
    }
}
