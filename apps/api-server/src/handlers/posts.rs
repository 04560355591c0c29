//! Post handlers: creation, reading and the status lifecycle.
//!
//! Every response body here is wrapped in [`ApiResponse`].

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::domain::{Post, PostStatus, StatusOptions};
use folio_shared::ApiResponse;
use folio_shared::dto::{
    CreatePostRequest, PostResponse, StatusOptionsResponse, UpdateStatusRequest,
};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        title: post.title,
        content: post.content,
        status: post.status.to_string(),
        likes_count: post.likes_count,
        published_at: post.published_at.map(|t| t.to_rfc3339()),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.map(|t| t.to_rfc3339()),
    }
}

fn options_response(options: StatusOptions) -> StatusOptionsResponse {
    StatusOptionsResponse {
        current: options.current.to_string(),
        allowed: options.allowed.iter().map(ToString::to_string).collect(),
        help: options.help.map(str::to_string),
    }
}

/// GET /api/posts
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// GET /api/posts/mine
pub async fn list_mine(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let posts = state.posts.list_by_author(&identity.actor()).await?;
    let body: Vec<PostResponse> = posts.into_iter().map(post_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(body)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let post = state
        .posts
        .create(&identity.actor(), req.title, req.content)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post_response(post))))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .visible_to(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}

/// GET /api/posts/{id}/status
pub async fn status_options(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let options = state
        .posts
        .status_options(&identity.actor(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(options_response(options))))
}

/// PUT /api/posts/{id}/status
pub async fn change_status(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let next: PostStatus = body.status.trim().parse()?;
    let post = state
        .posts
        .change_status(&identity.actor(), path.into_inner(), next)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        post_response(post),
        format!("Post is now {}", next),
    )))
}
