use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, CurrencyCode};

/// Outcome marker carried by every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Error,
}

/// Envelope wrapping every response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResponse {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonResponse {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            message: None,
            data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: impl Serialize) -> Result<Self, serde_json::Error> {
        self.data = Some(serde_json::to_value(data)?);
        Ok(self)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(alias = "userId")]
    pub owner_id: String,
    pub balance: Amount,
    #[serde(alias = "currencyCode")]
    pub currency: CurrencyCode,
}

/// Body of both deposit and withdraw requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAmountRequest {
    pub account_id: AccountId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMoneyRequest {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_envelope_omits_empty_fields() {
        let body = serde_json::to_value(JsonResponse::success().with_message("done")).unwrap();
        assert_eq!(body, json!({ "status": "Success", "message": "done" }));
    }

    #[test]
    fn test_with_data_reports_serialisation_failure() {
        struct Unserialisable;

        impl Serialize for Unserialisable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not today"))
            }
        }

        assert!(JsonResponse::success().with_data(Unserialisable).is_err());

        let body = JsonResponse::success().with_data(42).unwrap();
        assert_eq!(body.data, Some(json!(42)));
    }

    #[test]
    fn test_create_request_accepts_legacy_field_names() {
        let req: CreateAccountRequest =
            serde_json::from_value(json!({ "userId": "u1", "balance": 500, "currencyCode": "gbp" }))
                .unwrap();
        assert_eq!(req.owner_id, "u1");
        assert_eq!(req.balance, dec!(500));
        assert_eq!(req.currency.as_str(), "GBP");
    }

    #[test]
    fn test_amounts_accept_strings_and_numbers() {
        let id = uuid::Uuid::new_v4();
        let as_string: AccountAmountRequest =
            serde_json::from_value(json!({ "accountId": id, "amount": "12.34" })).unwrap();
        let as_number: AccountAmountRequest =
            serde_json::from_value(json!({ "accountId": id, "amount": 12 })).unwrap();

        assert_eq!(as_string.amount, dec!(12.34));
        assert_eq!(as_number.amount, dec!(12));
    }
}
