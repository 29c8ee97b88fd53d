use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{Account, AccountId, AccountView, Amount, CurrencyCode};
use crate::storage::{AccountRepository, InMemoryRepository};

use super::AppError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (HTTP API, shell, tests).
///
/// The store is safe to share on its own, but a single store call cannot cover
/// an operation that reads before it writes. One ledger-wide read/write lock
/// does: queries share the read side, and every operation that changes an
/// account holds the write side from its first lookup to its last write, so
/// mutations are totally ordered and a reader never sees half of a transfer.
pub struct LedgerService<R = InMemoryRepository> {
    repo: R,
    lock: RwLock<()>,
}

impl LedgerService<InMemoryRepository> {
    /// Create a ledger backed by a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryRepository::new())
    }
}

impl Default for LedgerService<InMemoryRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<R: AccountRepository> LedgerService<R> {
    /// Create a new ledger service over the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            lock: RwLock::new(()),
        }
    }

    // ========================
    // Account operations
    // ========================

    /// Open an account for `owner_id` and return its generated id.
    pub fn create_account(
        &self,
        owner_id: String,
        initial_balance: Amount,
        currency: CurrencyCode,
    ) -> Result<AccountId, AppError> {
        info!(owner_id = %owner_id, balance = %initial_balance, %currency, "Request for creating account");

        if initial_balance < Decimal::ZERO {
            return Err(AppError::InvalidAmount(
                "Initial balance cannot be negative".to_string(),
            ));
        }

        // The owner check and the insert share one write guard
        let _guard = self.lock.write();
        let repo = &self.repo;
        if repo.exists_by_owner(&owner_id)? {
            warn!(owner_id = %owner_id, "Account already exists for owner");
            return Err(AppError::AccountAlreadyExists(owner_id));
        }

        let mut account = Account::new(owner_id, initial_balance, currency);
        while repo.get_account(account.id)?.is_some() {
            account = account.with_id(Uuid::new_v4());
        }

        let account_id = account.id;
        repo.save(account)?;
        info!(%account_id, "New account created");
        Ok(account_id)
    }

    /// Get an account by id.
    pub fn get_account(&self, account_id: AccountId) -> Result<AccountView, AppError> {
        info!(%account_id, "Request for get account");
        let _guard = self.lock.read();
        Ok(require_account(&self.repo, account_id)?.into())
    }

    /// Snapshot of every account, oldest first.
    pub fn get_all_accounts(&self) -> Result<Vec<AccountView>, AppError> {
        info!("Request for get all accounts");
        let mut accounts = {
            let _guard = self.lock.read();
            self.repo.list_accounts()?
        };
        accounts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(accounts.into_iter().map(AccountView::from).collect())
    }

    /// Delete an account.
    pub fn delete_account(&self, account_id: AccountId) -> Result<(), AppError> {
        info!(%account_id, "Request for deleting account");
        let _guard = self.lock.write();
        let account = require_account(&self.repo, account_id)?;
        self.repo.delete_account(account.id)?;
        Ok(())
    }

    /// Remove every account. Used to reset the ledger.
    pub fn delete_all_accounts(&self) -> Result<(), AppError> {
        info!("Request for deleting all accounts");
        let _guard = self.lock.write();
        self.repo.delete_all_accounts()?;
        Ok(())
    }

    // ========================
    // Money operations
    // ========================

    /// Add `amount` to an account's balance.
    pub fn deposit_money(&self, account_id: AccountId, amount: Amount) -> Result<(), AppError> {
        info!(%account_id, %amount, "Request for deposit money");
        ensure_positive(amount)?;

        let _guard = self.lock.write();
        let account = require_account(&self.repo, account_id)?;
        let updated = credit(&account, amount)?;

        self.repo.save(updated)?;
        Ok(())
    }

    /// Remove `amount` from an account's balance.
    pub fn withdraw_money(&self, account_id: AccountId, amount: Amount) -> Result<(), AppError> {
        info!(%account_id, %amount, "Request for withdraw money");
        ensure_positive(amount)?;

        let _guard = self.lock.write();
        let account = require_account(&self.repo, account_id)?;
        let updated = debit(&account, amount)?;

        self.repo.save(updated)?;
        Ok(())
    }

    /// Move `amount` between two accounts as one unit.
    ///
    /// Both accounts are resolved and every check runs before anything is
    /// written; the two updated records then go to the store in a single
    /// `save_all` while the write guard is still held.
    pub fn transfer_money(
        &self,
        from_account_id: AccountId,
        to_account_id: AccountId,
        amount: Amount,
    ) -> Result<(), AppError> {
        info!(from = %from_account_id, to = %to_account_id, %amount, "Request for transfer money");
        ensure_positive(amount)?;

        let _guard = self.lock.write();
        let from_account = require_account(&self.repo, from_account_id)?;
        let to_account = require_account(&self.repo, to_account_id)?;

        if from_account.id == to_account.id {
            warn!(account_id = %from_account.id, "Rejected transfer to the same account");
            return Err(AppError::SelfTransfer(from_account.id));
        }

        if from_account.currency != to_account.currency {
            warn!(
                from_currency = %from_account.currency,
                to_currency = %to_account.currency,
                "Rejected cross-currency transfer"
            );
            return Err(AppError::CurrencyMismatch {
                from_currency: from_account.currency,
                to_currency: to_account.currency,
            });
        }

        let debited = debit(&from_account, amount)?;
        let credited = credit(&to_account, amount)?;

        self.repo.save_all(vec![debited, credited])?;
        Ok(())
    }
}

fn require_account<R: AccountRepository + ?Sized>(
    repo: &R,
    account_id: AccountId,
) -> Result<Account, AppError> {
    debug!(%account_id, "Getting account from store");
    repo.get_account(account_id)?
        .ok_or(AppError::AccountNotFound(account_id))
}

fn ensure_positive(amount: Amount) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount(
            "Amount must be positive".to_string(),
        ));
    }
    Ok(())
}

fn credit(account: &Account, amount: Amount) -> Result<Account, AppError> {
    account.credited(amount).ok_or_else(|| {
        warn!(account_id = %account.id, balance = %account.balance, %amount, "Credit not representable");
        AppError::InvalidAmount(format!(
            "Adding {} to account {} cannot be represented exactly",
            amount, account.id
        ))
    })
}

fn debit(account: &Account, amount: Amount) -> Result<Account, AppError> {
    if !account.can_cover(amount) {
        warn!(account_id = %account.id, balance = %account.balance, %amount, "Insufficient balance");
        return Err(AppError::InsufficientBalance {
            account_id: account.id,
            balance: account.balance,
            requested: amount,
        });
    }
    account.debited(amount).ok_or_else(|| {
        warn!(account_id = %account.id, balance = %account.balance, %amount, "Debit not representable");
        AppError::InvalidAmount(format!(
            "Removing {} from account {} cannot be represented exactly",
            amount, account.id
        ))
    })
}
