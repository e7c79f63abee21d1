//! Event ingestion and owner-scoped analytics.

use actix_web::{HttpResponse, web};

use inkpost_shared::dto::TrackEventRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/analytics/track - unauthenticated, rate limited per client.
pub async fn track(
    state: web::Data<AppState>,
    body: web::Json<TrackEventRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let event = state.analytics.track(&req.kind, req.data).await?;

    Ok(HttpResponse::Ok().json(event))
}

/// GET /api/analytics/stats
pub async fn account_stats(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let stats = state.analytics.stats_for_account(identity.account_id).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/analytics/stats/{post_id}
pub async fn post_stats(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let stats = state
        .analytics
        .stats_for_post(&path, identity.account_id)
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/analytics/posts - post id to stats, zeros included.
pub async fn all_post_stats(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let stats = state
        .analytics
        .stats_for_all_owned_posts(identity.account_id)
        .await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/analytics/comments/{post_id}
pub async fn comments(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let comments = state
        .analytics
        .comments_for_post(&path, identity.account_id)
        .await?;
    Ok(HttpResponse::Ok().json(comments))
}
