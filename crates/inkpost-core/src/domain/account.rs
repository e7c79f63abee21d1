use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account entity - a registered tenant that owns posts and API keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with generated ID and timestamps.
    pub fn new(email: String, password_hash: String, display_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            display_name,
            created_at: now,
            updated_at: now,
        }
    }

    /// Email with the local part masked, safe for log output.
    pub fn masked_email(email: &str) -> String {
        match email.find('@') {
            Some(at_pos) => {
                let (local, domain) = email.split_at(at_pos);
                match local.chars().next() {
                    Some(first) if local.len() > 1 => format!("{}***{}", first, domain),
                    _ => format!("***{}", domain),
                }
            }
            None => "***".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_email() {
        assert_eq!(Account::masked_email("alice@example.com"), "a***@example.com");
        assert_eq!(Account::masked_email("a@example.com"), "***@example.com");
        assert_eq!(Account::masked_email("not-an-email"), "***");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = Account::new(
            "bob@example.com".to_string(),
            "$argon2id$secret".to_string(),
            "Bob".to_string(),
        );
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["displayName"], "Bob");
    }
}
