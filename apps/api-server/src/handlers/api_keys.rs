//! API key management for the signed-in account.

use actix_web::{HttpResponse, web};

use inkpost_shared::MessageResponse;
use inkpost_shared::dto::CreateKeyRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/api-keys - body is optional.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: Option<web::Json<CreateKeyRequest>>,
) -> AppResult<HttpResponse> {
    let name = body.and_then(|b| b.into_inner().name);
    let key = state.keys.create_key(identity.account_id, name).await?;

    Ok(HttpResponse::Created().json(key))
}

/// GET /api/api-keys
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let keys = state.keys.list_keys(identity.account_id).await?;
    Ok(HttpResponse::Ok().json(keys))
}

/// DELETE /api/api-keys/{key}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    if state.keys.delete_key(&path, identity.account_id).await? {
        Ok(HttpResponse::Ok().json(MessageResponse::new("API Key deleted")))
    } else {
        Err(AppError::NotFound(
            "API Key not found or access denied".to_string(),
        ))
    }
}
