//! Owner-scoped post management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkpost_core::DomainError;
use inkpost_core::domain::{NewPost, PostPatch, PostStatus};
use inkpost_shared::MessageResponse;
use inkpost_shared::dto::CreatePostRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// A malformed id names no post, which is reported like a foreign one.
fn post_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFoundOrUnauthorized)
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let status = req
        .status
        .as_deref()
        .map(str::parse::<PostStatus>)
        .transpose()?;

    let post = state
        .content
        .create(
            identity.account_id,
            NewPost {
                title: req.title,
                content: req.content,
                cover_image: req.cover_image,
                status,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts - every post of the caller, drafts included.
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.content.list_by_owner(identity.account_id).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    let post = state
        .content
        .update(id, identity.account_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = post_id(&path)?;
    state.content.delete(id, identity.account_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted")))
}
