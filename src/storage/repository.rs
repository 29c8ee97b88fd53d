use anyhow::Result;

use crate::domain::{Account, AccountId};

/// Storage for account records, keyed by account id.
///
/// A repository holds data and nothing else: it never checks balances or
/// owner uniqueness, and a missing account is `Ok(None)`, not an error. The
/// `Result` wrapper is reserved for backends that can fail for infrastructure
/// reasons.
///
/// Every method takes `&self` and is safe to call from many threads at once
/// without outside locking. Atomicity across several calls is the caller's
/// job (see `LedgerService`).
pub trait AccountRepository: Send + Sync {
    /// Insert or replace the account stored under `account.id`.
    fn save(&self, account: Account) -> Result<()>;

    /// Save several accounts. No atomicity is promised at this layer.
    fn save_all(&self, accounts: Vec<Account>) -> Result<()> {
        for account in accounts {
            self.save(account)?;
        }
        Ok(())
    }

    fn get_account(&self, id: AccountId) -> Result<Option<Account>>;

    /// Snapshot of every stored account, in no particular order.
    fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Remove the account if present.
    fn delete_account(&self, id: AccountId) -> Result<()>;

    fn delete_all_accounts(&self) -> Result<()>;

    fn exists_by_owner(&self, owner_id: &str) -> Result<bool>;
}
