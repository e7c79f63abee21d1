use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Account;
use crate::error::{DomainError, DomainResult, RepoError};
use crate::ports::{AccountRepository, PasswordService, TokenService};

/// Registration input.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

/// An authenticated account plus its freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Account,
    pub token: String,
    pub expires_in: i64,
}

/// Account directory: registration, login and identity lookup.
pub struct AccountDirectory {
    accounts: Arc<dyn AccountRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AccountDirectory {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            accounts,
            passwords,
            tokens,
        }
    }

    fn validate(new_account: &NewAccount) -> DomainResult<()> {
        if new_account.email.is_empty() || !new_account.email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".to_string()));
        }
        if new_account.password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if new_account.display_name.trim().is_empty() {
            return Err(DomainError::Validation("Display name is required".to_string()));
        }
        Ok(())
    }

    fn open_session(&self, account: Account) -> DomainResult<Session> {
        let token = self
            .tokens
            .generate_token(account.id, &account.email)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(Session {
            account,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    pub async fn register(&self, new_account: NewAccount) -> DomainResult<Session> {
        Self::validate(&new_account)?;

        let email = new_account.email.trim().to_lowercase();
        if self.accounts.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = self.passwords.hash(&new_account.password)?;
        let account = Account::new(
            email,
            password_hash,
            new_account.display_name.trim().to_string(),
        );
        let account = match self.accounts.create(account).await {
            Ok(account) => account,
            // Lost a race with a concurrent registration for the same email.
            Err(RepoError::Constraint(_)) => {
                return Err(DomainError::Duplicate("Email already registered".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            account_id = %account.id,
            email = %Account::masked_email(&account.email),
            "Account registered"
        );
        self.open_session(account)
    }

    /// Unknown email and wrong password are the same `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<Session> {
        let email = email.trim().to_lowercase();
        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if !self.passwords.verify(password, &account.password_hash)? {
            tracing::debug!(email = %Account::masked_email(&email), "Login rejected");
            return Err(DomainError::Unauthorized);
        }

        self.open_session(account)
    }

    pub async fn get(&self, account_id: Uuid) -> DomainResult<Account> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::NotFound("Account"))
    }
}
