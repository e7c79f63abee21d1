//! Public, API-key-scoped read path.

use actix_web::{HttpRequest, HttpResponse, web};

use inkpost_core::domain::redact_key;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-cms-api-key";

fn api_key(req: &HttpRequest) -> AppResult<&str> {
    req.headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| AppError::BadRequest("API Key required".to_string()))
}

/// GET /api/public/posts
pub async fn list_posts(req: HttpRequest, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let key = api_key(&req)?;
    let posts = state.gateway.list_public(key).await?;

    tracing::debug!(key = %redact_key(key), count = posts.len(), "Public posts served");
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/public/posts/{id}
pub async fn get_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let key = api_key(&req)?;
    let post = state.gateway.get_public_post(key, &path).await?;

    Ok(HttpResponse::Ok().json(post))
}
