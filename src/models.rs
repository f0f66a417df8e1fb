//! Request and response shapes of the payments API gateway.
//!
//! Field names follow the gateway's camelCase JSON. Money is always an integer
//! count of minor currency units.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Client-supplied token that deduplicates repeated submissions of one logical
/// transaction attempt. It is carried verbatim through every round trip and is
/// the join key between a list row, its detail view and its capture action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdempotencyKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for IdempotencyKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub available_balance: i64,
    pub posted_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub account_id: String,
    pub initial_balance: i64,
}

/// A list field sent as `null` reads the same as one left out.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub accounts: Vec<Account>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub account_id: String,
    pub money_in: i64,
    pub money_out: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub pan: String,
    pub expiry_date: String,
    pub cvv: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCardRequest {
    pub pan: String,
    pub expiry_date: String,
    pub cvv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransactionRequest {
    pub idempotency_key: IdempotencyKey,
    pub transaction_id: String,
    pub card_pan: String,
    pub card_expiry_date: String,
    pub card_cvv: String,
    pub amount: i64,
    pub currency: String,
}

/// `{result}` answer of start and capture. The text comes straight from the
/// authorization backend and is never interpreted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub idempotency_key: IdempotencyKey,
    pub transaction_id: String,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub auth_result: String,
    #[serde(default)]
    pub auth_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub transactions: Vec<TransactionSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub idempotency_key: IdempotencyKey,
    pub transaction_id: String,
    pub card_pan: String,
    pub card_expiry_date: String,
    #[serde(default)]
    pub card_cvv: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub auth_code: String,
    #[serde(default)]
    pub auth_result: String,
    #[serde(default)]
    pub auth_status: String,
    #[serde(default)]
    pub captured: bool,
}
