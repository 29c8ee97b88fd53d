use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;

use crate::domain::{Account, AccountId};

use super::AccountRepository;

/// Account store backed by a lock-guarded `HashMap`. Nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

impl AccountRepository for InMemoryRepository {
    fn save(&self, account: Account) -> Result<()> {
        self.accounts.write().insert(account.id, account);
        Ok(())
    }

    fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.accounts.read().get(&id).cloned())
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.read().values().cloned().collect())
    }

    fn delete_account(&self, id: AccountId) -> Result<()> {
        self.accounts.write().remove(&id);
        Ok(())
    }

    fn delete_all_accounts(&self) -> Result<()> {
        self.accounts.write().clear();
        Ok(())
    }

    fn exists_by_owner(&self, owner_id: &str) -> Result<bool> {
        Ok(self
            .accounts
            .read()
            .values()
            .any(|account| account.owner_id == owner_id))
    }
}
