//! In-memory `AccountStore` for tests that should not need a database.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{AccountStore, StoreError};
use crate::users::repo_types::{Account, AccountPatch, NewAccount};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(accounts: &HashMap<Uuid, Account>, name: &str, except: Option<Uuid>) -> bool {
    accounts
        .values()
        .any(|a| Some(a.id) != except && a.name.as_deref() == Some(name))
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut rows: Vec<Account> = self.accounts.read().await.values().cloned().collect();
        rows.sort_by_key(|a| a.created_at);
        Ok(rows)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateKey("users_email_key".into()));
        }
        if let Some(name) = account.name.as_deref() {
            if name_taken(&accounts, name, None) {
                return Err(StoreError::DuplicateKey("users_name_key".into()));
            }
        }

        let created = Account {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            is_admin: account.is_admin,
            created_at: OffsetDateTime::now_utc(),
        };
        accounts.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: AccountPatch) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if let Some(name) = patch.name.as_deref() {
            if name_taken(&accounts, name, Some(id)) {
                return Err(StoreError::DuplicateKey("users_name_key".into()));
            }
        }

        let account = accounts.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = patch.name {
            account.name = Some(name);
        }
        if let Some(hash) = patch.password_hash {
            account.password_hash = hash;
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), StoreError> {
        self.accounts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(email: &str, name: Option<&str>) -> NewAccount {
        NewAccount {
            name: name.map(str::to_string),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryAccountStore::new();
        store.insert(new_account("a@example.com", None)).await.unwrap();
        let err = store
            .insert(new_account("a@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn absent_names_do_not_collide() {
        let store = MemoryAccountStore::new();
        store.insert(new_account("a@example.com", None)).await.unwrap();
        store.insert(new_account("b@example.com", None)).await.unwrap();
        store
            .insert(new_account("c@example.com", Some("x")))
            .await
            .unwrap();
        let err = store
            .insert(new_account("d@example.com", Some("x")))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn update_and_delete_missing_id_report_not_found() {
        let store = MemoryAccountStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            store.update(id, AccountPatch::default()).await,
            Err(StoreError::NotFound)
        ));
        assert!(matches!(store.delete_by_id(id).await, Err(StoreError::NotFound)));
    }
}
