//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// POST /api/auth/register
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// POST /api/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// An account as shown to its owner. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub account: AccountResponse,
}

/// POST /api/posts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    /// `draft` or `published`; defaults to `published`.
    #[serde(default)]
    pub status: Option<String>,
}

/// POST /api/api-keys
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /api/analytics/track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEventRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// POST /api/ai/generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(default)]
    pub topic: String,
}

/// POST /api/ai/improve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImprovePostRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub instructions: String,
}

/// Response of POST /api/ai/improve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovedContentResponse {
    pub improved_content: String,
}
