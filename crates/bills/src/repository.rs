use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use billfold_core::{AccountId, BillId, DomainError, DomainResult};

use crate::Bill;

/// Persistence boundary for bill records.
pub trait BillRepository: Send + Sync {
    fn insert(&self, bill: Bill) -> DomainResult<()>;

    fn find(&self, id: BillId) -> Option<Bill>;

    fn list_all(&self) -> Vec<Bill>;

    fn list_by_owner(&self, owner_id: AccountId) -> Vec<Bill>;

    /// Compare-and-swap replace: `bill.version` must match the stored
    /// version, otherwise the write is stale and fails with `Conflict`.
    /// On success the stored record carries `version + 1`.
    fn update(&self, bill: Bill) -> DomainResult<Bill>;

    /// Remove by id. Returns whether a record existed.
    fn remove(&self, id: BillId) -> bool;
}

impl<R> BillRepository for Arc<R>
where
    R: BillRepository + ?Sized,
{
    fn insert(&self, bill: Bill) -> DomainResult<()> {
        (**self).insert(bill)
    }

    fn find(&self, id: BillId) -> Option<Bill> {
        (**self).find(id)
    }

    fn list_all(&self) -> Vec<Bill> {
        (**self).list_all()
    }

    fn list_by_owner(&self, owner_id: AccountId) -> Vec<Bill> {
        (**self).list_by_owner(owner_id)
    }

    fn update(&self, bill: Bill) -> DomainResult<Bill> {
        (**self).update(bill)
    }

    fn remove(&self, id: BillId) -> bool {
        (**self).remove(id)
    }
}

/// In-memory bill store for dev/tests.
#[derive(Debug, Default)]
pub struct InMemoryBillRepository {
    inner: RwLock<HashMap<BillId, Bill>>,
}

impl InMemoryBillRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BillRepository for InMemoryBillRepository {
    fn insert(&self, bill: Bill) -> DomainResult<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("bill store poisoned"))?;
        map.insert(bill.id, bill);
        Ok(())
    }

    fn find(&self, id: BillId) -> Option<Bill> {
        self.inner.read().ok()?.get(&id).cloned()
    }

    fn list_all(&self) -> Vec<Bill> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn list_by_owner(&self, owner_id: AccountId) -> Vec<Bill> {
        match self.inner.read() {
            Ok(map) => map
                .values()
                .filter(|b| b.owner_id == owner_id)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    fn update(&self, mut bill: Bill) -> DomainResult<Bill> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| DomainError::conflict("bill store poisoned"))?;

        let stored = map.get(&bill.id).ok_or(DomainError::NotFound)?;
        if stored.version != bill.version {
            return Err(DomainError::conflict(format!(
                "stale bill update (stored version {}, got {})",
                stored.version, bill.version
            )));
        }

        bill.version += 1;
        map.insert(bill.id, bill.clone());
        Ok(bill)
    }

    fn remove(&self, id: BillId) -> bool {
        match self.inner.write() {
            Ok(mut map) => map.remove(&id).is_some(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BillDraft, BillStatus};
    use chrono::Utc;

    fn sample() -> Bill {
        BillDraft {
            date: Utc::now(),
            amount_cents: 1200,
            bill_type: "Meals".to_string(),
            description: String::new(),
        }
        .into_bill(AccountId::new())
    }

    #[test]
    fn stale_update_conflicts() {
        let repo = InMemoryBillRepository::new();
        let bill = sample();
        repo.insert(bill.clone()).unwrap();

        // First writer wins and bumps the version.
        let mut edit_a = bill.clone();
        edit_a.description = "first".to_string();
        let committed = repo.update(edit_a).unwrap();
        assert_eq!(committed.version, 1);

        // Second writer still holds version 0.
        let mut edit_b = bill;
        edit_b.status = BillStatus::Approved;
        let err = repo.update(edit_b).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let stored = repo.find(committed.id).unwrap();
        assert_eq!(stored.description, "first");
        assert_eq!(stored.status, BillStatus::Pending);
    }

    #[test]
    fn list_by_owner_filters() {
        let repo = InMemoryBillRepository::new();
        let mine = sample();
        let theirs = sample();
        repo.insert(mine.clone()).unwrap();
        repo.insert(theirs).unwrap();

        let listed = repo.list_by_owner(mine.owner_id);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);
        assert_eq!(repo.list_all().len(), 2);
    }

    #[test]
    fn remove_reports_existence() {
        let repo = InMemoryBillRepository::new();
        let bill = sample();
        repo.insert(bill.clone()).unwrap();

        assert!(repo.remove(bill.id));
        assert!(!repo.remove(bill.id));
        assert!(repo.find(bill.id).is_none());
    }
}
