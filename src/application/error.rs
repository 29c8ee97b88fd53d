use thiserror::Error;

use crate::domain::{AccountId, Amount, CurrencyCode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Account already exists for owner: {0}")]
    AccountAlreadyExists(String),

    #[error("Insufficient balance in account {account_id}: balance {balance}, required {requested}")]
    InsufficientBalance {
        account_id: AccountId,
        balance: Amount,
        requested: Amount,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Cannot transfer from account {0} to itself")]
    SelfTransfer(AccountId),

    #[error("Currency mismatch between accounts: {from_currency} vs {to_currency}")]
    CurrencyMismatch {
        from_currency: CurrencyCode,
        to_currency: CurrencyCode,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
