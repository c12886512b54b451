use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use billfold_core::{AccountId, DomainError, DomainResult};

use crate::Account;

/// Persistence boundary for account records.
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; fails with `Conflict` when the email is taken.
    fn insert(&self, account: Account) -> DomainResult<()>;

    fn find_by_id(&self, id: AccountId) -> Option<Account>;

    fn find_by_email(&self, email: &str) -> Option<Account>;

    fn list(&self) -> Vec<Account>;

    /// Replace the record with `id`; fails with `Conflict` when the new email
    /// belongs to a different account, `NotFound` when the record is gone.
    fn update(&self, account: Account) -> DomainResult<Account>;

    /// Remove by email. Idempotent: absence is not an error.
    fn delete_by_email(&self, email: &str);
}

impl<R> AccountRepository for Arc<R>
where
    R: AccountRepository + ?Sized,
{
    fn insert(&self, account: Account) -> DomainResult<()> {
        (**self).insert(account)
    }

    fn find_by_id(&self, id: AccountId) -> Option<Account> {
        (**self).find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> Option<Account> {
        (**self).find_by_email(email)
    }

    fn list(&self) -> Vec<Account> {
        (**self).list()
    }

    fn update(&self, account: Account) -> DomainResult<Account> {
        (**self).update(account)
    }

    fn delete_by_email(&self, email: &str) {
        (**self).delete_by_email(email)
    }
}

/// In-memory directory store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn insert(&self, account: Account) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("account store poisoned"))?;

        if map.values().any(|a| a.email == account.email) {
            return Err(DomainError::conflict(format!(
                "email already registered: {}",
                account.email
            )));
        }
        map.insert(account.id, account);
        Ok(())
    }

    fn find_by_id(&self, id: AccountId) -> Option<Account> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    fn find_by_email(&self, email: &str) -> Option<Account> {
        self.inner
            .read()
            .ok()?
            .values()
            .find(|a| a.email == email)
            .cloned()
    }

    fn list(&self) -> Vec<Account> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn update(&self, account: Account) -> DomainResult<Account> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("account store poisoned"))?;

        if !map.contains_key(&account.id) {
            return Err(DomainError::NotFound);
        }
        if map
            .values()
            .any(|a| a.email == account.email && a.id != account.id)
        {
            return Err(DomainError::conflict(format!(
                "email already registered: {}",
                account.email
            )));
        }
        map.insert(account.id, account.clone());
        Ok(account)
    }

    fn delete_by_email(&self, email: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|_, a| a.email != email);
        }
    }
}
