use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        access::is_authorized,
        claims::Claims,
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::AppError,
    users::{
        repo::AccountStore,
        repo_types::{Account, AccountPatch, NewAccount},
    },
};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Path ids that are not UUIDs cannot name an account.
fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound)
}

/// Fields a caller may change on an existing account.
#[derive(Debug, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Register, authenticate and manage accounts on top of an `AccountStore`.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    keys: JwtKeys,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    /// Creates a regular (non-admin) account.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<Account, AppError> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(AppError::validation("`email` is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("`password` is required"));
        }

        let password_hash = hash_password_blocking(password.to_owned()).await?;
        let account = self
            .store
            .insert(NewAccount {
                name: non_empty(name),
                email,
                password_hash,
                is_admin: false,
            })
            .await
            .map_err(|e| {
                warn!(error = %e, "insert account failed");
                AppError::from(e)
            })?;

        info!(account_id = %account.id, email = %account.email, "account registered");
        Ok(account)
    }

    /// Checks credentials and issues a bearer token.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AppError> {
        let email = normalize_email(email);
        let account = match self.store.find_by_email(&email).await? {
            Some(a) => a,
            None => {
                warn!("login unknown email");
                return Err(AppError::BadUsername);
            }
        };

        let ok =
            verify_password_blocking(password.to_owned(), account.password_hash.clone()).await?;
        if !ok {
            warn!(account_id = %account.id, "login invalid password");
            return Err(AppError::BadCredentials);
        }

        let token = self
            .keys
            .issue(&account)
            .map_err(|e| AppError::Internal(e.into()))?;
        info!(account_id = %account.id, "account logged in");
        Ok(token)
    }

    /// Every account; the admin gate sits in front of this call.
    pub async fn list(&self) -> Result<Vec<Account>, AppError> {
        Ok(self.store.list().await?)
    }

    pub async fn get_by_id(&self, id: &str, caller: &Claims) -> Result<Account, AppError> {
        self.load_authorized(id, caller).await
    }

    pub async fn update(
        &self,
        id: &str,
        caller: &Claims,
        changes: AccountChanges,
    ) -> Result<(), AppError> {
        let account = self.load_authorized(id, caller).await?;

        let password_hash = match non_empty(changes.password) {
            Some(plain) => Some(hash_password_blocking(plain).await?),
            None => None,
        };
        let patch = AccountPatch {
            name: non_empty(changes.name),
            password_hash,
        };
        if patch.is_empty() {
            debug!(account_id = %account.id, "update without changes");
            return Ok(());
        }

        self.store.update(account.id, patch).await?;
        info!(account_id = %account.id, caller_id = %caller.id, "account updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str, caller: &Claims) -> Result<(), AppError> {
        let account = self.load_authorized(id, caller).await?;
        self.store.delete_by_id(account.id).await?;
        info!(account_id = %account.id, caller_id = %caller.id, "account deleted");
        Ok(())
    }

    async fn load_authorized(&self, id: &str, caller: &Claims) -> Result<Account, AppError> {
        let id = parse_id(id)?;
        let account = self.store.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        if !is_authorized(caller, &account.email) {
            warn!(account_id = %id, caller_id = %caller.id, "access denied");
            return Err(AppError::Forbidden);
        }
        Ok(account)
    }
}
