//! Raw operator input and its conversion into typed API requests.
//!
//! Forms hold exactly what the operator typed. Conversion validates before
//! anything is dispatched, so a non-numeric amount never reaches the wire.

use std::collections::HashMap;

use crate::models::{
    Card, CreateAccountRequest, IdempotencyKey, StartTransactionRequest, ValidateCardRequest,
};
use crate::validation::{
    parse_minor_units, sanitize_string, validate_currency, validate_idempotency_key,
    validate_identifier, validate_non_negative, validate_pan, validate_positive_amount,
    ValidationError, ACCOUNT_ID_MAX_LEN, CARD_FIELD_MAX_LEN, TRANSACTION_ID_MAX_LEN,
};

/// Source of raw form field values, keyed by field name.
pub trait FormSource {
    fn read(&self, field: &str) -> Option<String>;

    fn read_or_empty(&self, field: &str) -> String {
        self.read(field).unwrap_or_default()
    }
}

impl FormSource for HashMap<String, String> {
    fn read(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl FormSource for HashMap<&str, &str> {
    fn read(&self, field: &str) -> Option<String> {
        self.get(field).map(|value| value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAccountForm {
    pub account_id: String,
    pub initial_balance: String,
}

impl CreateAccountForm {
    pub fn read(source: &impl FormSource) -> Self {
        Self {
            account_id: source.read_or_empty("accountId"),
            initial_balance: source.read_or_empty("initialBalance"),
        }
    }

    pub fn into_request(self) -> Result<CreateAccountRequest, ValidationError> {
        validate_identifier("accountId", &self.account_id, ACCOUNT_ID_MAX_LEN)?;

        let initial_balance = parse_minor_units("initialBalance", &self.initial_balance)?;
        validate_non_negative("initialBalance", initial_balance)?;

        Ok(CreateAccountRequest {
            account_id: self.account_id,
            initial_balance,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateCardForm {
    pub pan: String,
    pub expiry_date: String,
    pub cvv: String,
    pub account_id: String,
}

impl CreateCardForm {
    pub fn read(source: &impl FormSource) -> Self {
        Self {
            pan: source.read_or_empty("cardPan"),
            expiry_date: source.read_or_empty("cardExpiry"),
            cvv: source.read_or_empty("cardCvv"),
            account_id: source.read_or_empty("cardAccountId"),
        }
    }

    pub fn into_request(self) -> Result<Card, ValidationError> {
        validate_pan("pan", &self.pan)?;
        validate_identifier("expiryDate", &self.expiry_date, CARD_FIELD_MAX_LEN)?;
        validate_identifier("cvv", &self.cvv, CARD_FIELD_MAX_LEN)?;
        validate_identifier("accountId", &self.account_id, ACCOUNT_ID_MAX_LEN)?;

        Ok(Card {
            pan: self.pan,
            expiry_date: self.expiry_date,
            cvv: self.cvv,
            account_id: self.account_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateCardForm {
    pub pan: String,
    pub expiry_date: String,
    pub cvv: String,
}

impl ValidateCardForm {
    pub fn into_request(self) -> Result<ValidateCardRequest, ValidationError> {
        validate_pan("pan", &self.pan)?;
        validate_identifier("expiryDate", &self.expiry_date, CARD_FIELD_MAX_LEN)?;
        validate_identifier("cvv", &self.cvv, CARD_FIELD_MAX_LEN)?;

        Ok(ValidateCardRequest {
            pan: self.pan,
            expiry_date: self.expiry_date,
            cvv: self.cvv,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartTransactionForm {
    pub idempotency_key: String,
    pub transaction_id: String,
    pub card_pan: String,
    pub card_expiry_date: String,
    pub card_cvv: String,
    pub amount: String,
    pub currency: String,
}

impl StartTransactionForm {
    pub fn read(source: &impl FormSource) -> Self {
        Self {
            idempotency_key: source.read_or_empty("idempotencyKey"),
            transaction_id: source.read_or_empty("transactionId"),
            card_pan: source.read_or_empty("transactionCardPan"),
            card_expiry_date: source.read_or_empty("transactionCardExpiry"),
            card_cvv: source.read_or_empty("transactionCardCvv"),
            amount: source.read_or_empty("amount"),
            currency: source.read_or_empty("currency"),
        }
    }

    /// Identifiers and card fields are passed through exactly as entered.
    pub fn into_request(self) -> Result<StartTransactionRequest, ValidationError> {
        validate_idempotency_key(&self.idempotency_key)?;
        validate_identifier("transactionId", &self.transaction_id, TRANSACTION_ID_MAX_LEN)?;
        validate_pan("cardPan", &self.card_pan)?;
        validate_identifier("cardExpiryDate", &self.card_expiry_date, CARD_FIELD_MAX_LEN)?;
        validate_identifier("cardCvv", &self.card_cvv, CARD_FIELD_MAX_LEN)?;

        let amount = parse_minor_units("amount", &self.amount)?;
        validate_positive_amount(amount)?;

        let currency = sanitize_string(&self.currency);
        validate_currency(&currency)?;

        Ok(StartTransactionRequest {
            idempotency_key: IdempotencyKey::new(self.idempotency_key),
            transaction_id: self.transaction_id,
            card_pan: self.card_pan,
            card_expiry_date: self.card_expiry_date,
            card_cvv: self.card_cvv,
            amount,
            currency,
        })
    }
}
