use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name given to keys created without one.
pub const DEFAULT_KEY_NAME: &str = "Default Key";

/// API key entity - an opaque token mapping external callers to one account.
///
/// The token itself is the primary identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    #[serde(rename = "apiKey")]
    pub key: String,
    pub account_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Generate a fresh key for `account_id`.
    ///
    /// Uniqueness rests on UUIDv4 randomness; existing keys are not consulted.
    pub fn generate(account_id: Uuid, name: Option<String>) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_KEY_NAME.to_string());

        Self {
            key: Uuid::new_v4().to_string(),
            account_id,
            name,
            created_at: Utc::now(),
        }
    }
}

/// Short prefix of a key for log output.
pub fn redact_key(key: &str) -> String {
    let prefix: String = key.chars().take(8).collect();
    format!("{}…", prefix)
}
