//! Account registration, login and identity.

use actix_web::{HttpResponse, web};

use inkpost_core::domain::Account;
use inkpost_core::services::{NewAccount, Session};
use inkpost_shared::dto::{AccountResponse, AuthResponse, LoginRequest, RegisterRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn account_response(account: Account) -> AccountResponse {
    AccountResponse {
        id: account.id,
        email: account.email,
        display_name: account.display_name,
        created_at: account.created_at,
    }
}

fn auth_response(session: Session) -> AuthResponse {
    AuthResponse {
        access_token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in.max(0) as u64,
        account: account_response(session.account),
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state
        .accounts
        .register(NewAccount {
            email: req.email,
            password: req.password,
            display_name: req.display_name,
        })
        .await?;

    Ok(HttpResponse::Created().json(auth_response(session)))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(auth_response(session)))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let account = state.accounts.get(identity.account_id).await?;
    Ok(HttpResponse::Ok().json(account_response(account)))
}
