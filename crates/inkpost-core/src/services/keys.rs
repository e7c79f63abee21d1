use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{ApiKey, redact_key};
use crate::error::DomainResult;
use crate::ports::ApiKeyRepository;

use super::access::AccessControl;

/// Creates, lists and deletes API keys scoped to their owning account.
pub struct KeyRegistry {
    keys: Arc<dyn ApiKeyRepository>,
    access: Arc<AccessControl>,
}

impl KeyRegistry {
    pub fn new(keys: Arc<dyn ApiKeyRepository>, access: Arc<AccessControl>) -> Self {
        Self { keys, access }
    }

    pub async fn create_key(&self, account_id: Uuid, name: Option<String>) -> DomainResult<ApiKey> {
        let key = self.keys.save(ApiKey::generate(account_id, name)).await?;
        tracing::info!(
            account_id = %account_id,
            key = %redact_key(&key.key),
            name = %key.name,
            "API key created"
        );
        Ok(key)
    }

    pub async fn list_keys(&self, account_id: Uuid) -> DomainResult<Vec<ApiKey>> {
        Ok(self.keys.find_by_account(account_id).await?)
    }

    /// Delete `key` if `account_id` owns it.
    ///
    /// `false` covers both "no such key" and "someone else's key".
    pub async fn delete_key(&self, key: &str, account_id: Uuid) -> DomainResult<bool> {
        let deleted = self.keys.delete_owned(key, account_id).await?;

        if deleted {
            self.access.forget(key).await;
            tracing::info!(account_id = %account_id, key = %redact_key(key), "API key deleted");
        } else {
            tracing::debug!(account_id = %account_id, key = %redact_key(key), "API key delete refused");
        }

        Ok(deleted)
    }
}
