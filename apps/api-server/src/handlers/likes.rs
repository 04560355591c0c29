//! Like handlers.
//!
//! Mutations answer with the stored state after the counter resync, which
//! the client adopts in place of its optimistic guess.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::domain::{LikeAction, LikeSnapshot};
use folio_shared::dto::LikeStateResponse;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn like_response(snapshot: LikeSnapshot) -> LikeStateResponse {
    LikeStateResponse {
        liked: snapshot.liked,
        likes_count: snapshot.count,
    }
}

/// GET /api/posts/{id}/likes
pub async fn like_state(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    state.posts.visible_to(&identity.actor(), post_id).await?;
    let snapshot = state.likes.snapshot(post_id, identity.user_id()).await?;
    Ok(HttpResponse::Ok().json(like_response(snapshot)))
}

async fn apply(
    state: &AppState,
    identity: &OptionalIdentity,
    post_id: Uuid,
    action: LikeAction,
) -> AppResult<HttpResponse> {
    state.posts.visible_to(&identity.actor(), post_id).await?;
    let snapshot = state
        .likes
        .toggle(post_id, identity.user_id(), action)
        .await?;
    Ok(HttpResponse::Ok().json(like_response(snapshot)))
}

/// POST /api/posts/{id}/likes
pub async fn like(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    apply(&state, &identity, path.into_inner(), LikeAction::Like).await
}

/// DELETE /api/posts/{id}/likes
pub async fn unlike(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    apply(&state, &identity, path.into_inner(), LikeAction::Unlike).await
}
