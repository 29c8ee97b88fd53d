// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use coffer::application::LedgerService;
use coffer::domain::{AccountId, Amount, CurrencyCode};

/// Helper to create a test service with an empty in-memory store
pub fn test_service() -> LedgerService {
    LedgerService::in_memory()
}

/// Helper to parse a currency code
pub fn currency(code: &str) -> CurrencyCode {
    code.parse().unwrap()
}

/// Open a GBP account for `owner` with `balance`
pub fn open_gbp(service: &LedgerService, owner: &str, balance: Amount) -> Result<AccountId> {
    Ok(service.create_account(owner.to_string(), balance, currency("GBP"))?)
}

/// Current balance of an account
pub fn balance_of(service: &LedgerService, id: AccountId) -> Result<Amount> {
    Ok(service.get_account(id)?.balance)
}

/// Sum of all balances, read from a single snapshot
pub fn total_holdings(service: &LedgerService) -> Result<Amount> {
    Ok(service
        .get_all_accounts()?
        .iter()
        .map(|view| view.balance)
        .sum())
}
