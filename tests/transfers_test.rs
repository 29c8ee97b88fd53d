mod common;

use anyhow::Result;
use coffer::application::AppError;
use common::{balance_of, currency, open_gbp, test_service, total_holdings};
use rust_decimal_macros::dec;
use uuid::Uuid;

#[test]
fn test_transfer_moves_money() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;
    let b = open_gbp(&service, "b", dec!(20))?;

    service.transfer_money(a, b, dec!(30))?;

    assert_eq!(balance_of(&service, a)?, dec!(40));
    assert_eq!(balance_of(&service, b)?, dec!(50));

    Ok(())
}

#[test]
fn test_transfer_entire_balance() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;
    let b = open_gbp(&service, "b", dec!(0))?;

    service.transfer_money(a, b, dec!(70))?;

    assert_eq!(balance_of(&service, a)?, dec!(0));
    assert_eq!(balance_of(&service, b)?, dec!(70));

    Ok(())
}

#[test]
fn test_transfer_insufficient_balance_changes_nothing() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;
    let b = open_gbp(&service, "b", dec!(20))?;

    let result = service.transfer_money(a, b, dec!(70.01));
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance { account_id, .. }) if account_id == a
    ));

    assert_eq!(balance_of(&service, a)?, dec!(70));
    assert_eq!(balance_of(&service, b)?, dec!(20));

    Ok(())
}

#[test]
fn test_transfer_with_missing_side_changes_nothing() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;
    let missing = Uuid::new_v4();

    let result = service.transfer_money(a, missing, dec!(10));
    assert!(matches!(result, Err(AppError::AccountNotFound(id)) if id == missing));

    let result = service.transfer_money(missing, a, dec!(10));
    assert!(matches!(result, Err(AppError::AccountNotFound(id)) if id == missing));

    assert_eq!(balance_of(&service, a)?, dec!(70));

    Ok(())
}

#[test]
fn test_missing_source_reported_before_missing_destination() {
    let service = test_service();
    let from = Uuid::new_v4();
    let to = Uuid::new_v4();

    let result = service.transfer_money(from, to, dec!(10));
    assert!(matches!(result, Err(AppError::AccountNotFound(id)) if id == from));
}

#[test]
fn test_self_transfer_rejected() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;

    let result = service.transfer_money(a, a, dec!(10));
    assert!(matches!(result, Err(AppError::SelfTransfer(id)) if id == a));
    assert_eq!(balance_of(&service, a)?, dec!(70));

    // A missing account is still reported as missing
    let missing = Uuid::new_v4();
    assert!(matches!(
        service.transfer_money(missing, missing, dec!(10)),
        Err(AppError::AccountNotFound(_))
    ));

    Ok(())
}

#[test]
fn test_cross_currency_transfer_rejected() -> Result<()> {
    let service = test_service();
    let gbp = open_gbp(&service, "a", dec!(70))?;
    let usd = service.create_account("b".to_string(), dec!(20), currency("USD"))?;

    let result = service.transfer_money(gbp, usd, dec!(10));
    match result {
        Err(AppError::CurrencyMismatch {
            from_currency,
            to_currency,
        }) => {
            assert_eq!(from_currency.as_str(), "GBP");
            assert_eq!(to_currency.as_str(), "USD");
        }
        other => panic!("Expected CurrencyMismatch, got {:?}", other),
    }

    assert_eq!(balance_of(&service, gbp)?, dec!(70));
    assert_eq!(balance_of(&service, usd)?, dec!(20));

    Ok(())
}

#[test]
fn test_transfer_rejects_non_positive_amount() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(70))?;
    let b = open_gbp(&service, "b", dec!(20))?;

    for amount in [dec!(0), dec!(-30)] {
        assert!(matches!(
            service.transfer_money(a, b, amount),
            Err(AppError::InvalidAmount(_))
        ));
    }

    assert_eq!(balance_of(&service, a)?, dec!(70));
    assert_eq!(balance_of(&service, b)?, dec!(20));

    Ok(())
}

#[test]
fn test_chained_transfers_conserve_total() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(100))?;
    let b = open_gbp(&service, "b", dec!(50))?;
    let c = open_gbp(&service, "c", dec!(0))?;

    service.transfer_money(a, b, dec!(25.50))?;
    service.transfer_money(b, c, dec!(60))?;
    service.transfer_money(c, a, dec!(10.25))?;

    assert_eq!(balance_of(&service, a)?, dec!(84.75));
    assert_eq!(balance_of(&service, b)?, dec!(15.50));
    assert_eq!(balance_of(&service, c)?, dec!(49.75));
    assert_eq!(total_holdings(&service)?, dec!(150));

    Ok(())
}

#[test]
fn test_transfer_that_cannot_be_held_exactly_changes_nothing() -> Result<()> {
    let service = test_service();
    let a = open_gbp(&service, "a", dec!(1))?;
    let b = open_gbp(&service, "b", dec!(100000000000000000000))?;

    let result = service.transfer_money(a, b, dec!(0.000000001));

    assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    assert_eq!(balance_of(&service, a)?, dec!(1));
    assert_eq!(balance_of(&service, b)?, dec!(100000000000000000000));
    assert_eq!(total_holdings(&service)?, dec!(100000000000000000001));

    Ok(())
}
