//! Writing assistant endpoints.

use actix_web::{HttpResponse, web};

use inkpost_shared::dto::{GeneratePostRequest, ImprovePostRequest, ImprovedContentResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/ai/generate
pub async fn generate(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<GeneratePostRequest>,
) -> AppResult<HttpResponse> {
    tracing::info!(account_id = %identity.account_id, "Generating post draft");
    let post = state.assistant.generate_post(&body.topic).await?;

    Ok(HttpResponse::Ok().json(post))
}

/// POST /api/ai/improve
pub async fn improve(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ImprovePostRequest>,
) -> AppResult<HttpResponse> {
    tracing::info!(account_id = %identity.account_id, "Improving post content");
    let improved_content = state
        .assistant
        .improve_post(&body.content, &body.instructions)
        .await?;

    Ok(HttpResponse::Ok().json(ImprovedContentResponse { improved_content }))
}

/// GET /api/ai/test
pub async fn test_connection(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let report = state.assistant.test_connection().await?;
    Ok(HttpResponse::Ok().json(report))
}
