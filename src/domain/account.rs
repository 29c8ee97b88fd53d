use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Amount, CurrencyCode};

pub type AccountId = Uuid;

/// A single owner's account. The balance is the only field that changes after
/// creation, and only through the ledger service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub owner_id: String,
    pub balance: Amount,
    pub currency: CurrencyCode,
    /// When the ledger accepted the account; orders listings
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(owner_id: String, balance: Amount, currency: CurrencyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            balance,
            currency,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = id;
        self
    }

    /// Returns true if the balance covers `amount` without going negative.
    pub fn can_cover(&self, amount: Amount) -> bool {
        self.balance >= amount
    }

    /// Copy of this account with `amount` added, or `None` if the new balance
    /// overflows or cannot be held without rounding.
    pub fn credited(&self, amount: Amount) -> Option<Self> {
        let balance = exact_add(self.balance, amount)?;
        Some(Self {
            balance,
            ..self.clone()
        })
    }

    /// Copy of this account with `amount` removed, or `None` if the result
    /// would be negative or cannot be held without rounding.
    pub fn debited(&self, amount: Amount) -> Option<Self> {
        if !self.can_cover(amount) {
            return None;
        }
        let balance = exact_sub(self.balance, amount)?;
        Some(Self {
            balance,
            ..self.clone()
        })
    }
}

// Decimal keeps at most 28 significant digits and rounds anything past that,
// so each result is checked by undoing the operation from both sides.
fn exact_add(a: Amount, b: Amount) -> Option<Amount> {
    let sum = a.checked_add(b)?;
    (sum.checked_sub(a)? == b && sum.checked_sub(b)? == a).then_some(sum)
}

fn exact_sub(a: Amount, b: Amount) -> Option<Amount> {
    let difference = a.checked_sub(b)?;
    (difference.checked_add(b)? == a && a.checked_sub(difference)? == b).then_some(difference)
}

/// The externally visible projection of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub account_id: AccountId,
    pub owner_id: String,
    pub balance: Amount,
    pub currency: CurrencyCode,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id,
            owner_id: account.owner_id.clone(),
            balance: account.balance,
            currency: account.currency.clone(),
        }
    }
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            account_id: account.id,
            owner_id: account.owner_id,
            balance: account.balance,
            currency: account.currency,
        }
    }
}
