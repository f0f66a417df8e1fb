use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::PaymentsApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    Account, AccountsResponse, Card, CardValidation, CreateAccountRequest, Expenditure,
    IdempotencyKey, OperationResult, StartTransactionRequest, Transaction, TransactionSummary,
    TransactionsResponse, ValidateCardRequest,
};
use crate::transport::{ApiTransport, HttpMethod, Payload};

/// Gateway client built on [`ApiTransport`]. Construct one and hand it to
/// whatever needs it; there is no shared global instance.
#[derive(Clone)]
pub struct FinTechClient {
    transport: ApiTransport,
}

impl FinTechClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self { transport }
    }

    pub fn from_base_url(base_url: &str) -> ClientResult<Self> {
        Ok(Self::new(ApiTransport::new(base_url)?))
    }

    async fn get(&self, segments: &[&str]) -> ClientResult<Payload> {
        self.transport.request(HttpMethod::Get, segments, None).await
    }

    async fn post<B: Serialize>(&self, segments: &[&str], body: Option<&B>) -> ClientResult<Payload> {
        let body = body.map(serde_json::to_value).transpose()?;
        self.transport
            .request(HttpMethod::Post, segments, body.as_ref())
            .await
    }
}

/// Decodes a record-shaped payload. A text body is accepted only if it
/// happens to hold the JSON document, which covers gateways that omit the
/// content type.
fn decode_record<T: DeserializeOwned>(payload: Payload, what: &str) -> ClientResult<T> {
    match payload {
        Payload::Json(value) => serde_json::from_value(value)
            .map_err(|e| ClientError::UnexpectedPayload(format!("{what}: {e}"))),
        Payload::Text(text) if text.trim().is_empty() => Err(ClientError::UnexpectedPayload(
            format!("{what}: empty response body"),
        )),
        Payload::Text(text) => serde_json::from_str(&text).map_err(|_| {
            ClientError::UnexpectedPayload(format!("{what}: expected JSON, got text {text:?}"))
        }),
    }
}

/// Decodes a `{result}` answer. The result may arrive as a JSON object, a
/// bare JSON string or plain text.
fn decode_operation_result(payload: Payload) -> ClientResult<OperationResult> {
    match payload {
        Payload::Json(Value::String(result)) => Ok(OperationResult { result }),
        Payload::Json(value) => serde_json::from_value(value)
            .map_err(|e| ClientError::UnexpectedPayload(format!("operation result: {e}"))),
        Payload::Text(text) => Ok(serde_json::from_str::<OperationResult>(&text)
            .unwrap_or(OperationResult { result: text })),
    }
}

fn decode_transactions(payload: Payload) -> ClientResult<Vec<TransactionSummary>> {
    match payload {
        Payload::Json(Value::Array(items)) => {
            decode_record(Payload::Json(Value::Array(items)), "transactions")
        }
        payload if payload.is_empty() => Ok(Vec::new()),
        payload => Ok(decode_record::<TransactionsResponse>(payload, "transactions")?.transactions),
    }
}

fn decode_accounts(payload: Payload) -> ClientResult<Vec<Account>> {
    match payload {
        Payload::Json(Value::Array(items)) => {
            decode_record(Payload::Json(Value::Array(items)), "accounts")
        }
        payload if payload.is_empty() => Ok(Vec::new()),
        payload => Ok(decode_record::<AccountsResponse>(payload, "accounts")?.accounts),
    }
}

#[async_trait]
impl PaymentsApi for FinTechClient {
    async fn create_account(&self, request: &CreateAccountRequest) -> ClientResult<Account> {
        let payload = self.post(&["accounts"], Some(request)).await?;
        decode_record(payload, "account")
    }

    async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        decode_accounts(self.get(&["accounts"]).await?)
    }

    async fn get_account(&self, account_id: &str) -> ClientResult<Account> {
        let payload = self.get(&["accounts", account_id]).await?;
        decode_record(payload, "account")
    }

    async fn get_expenditure(&self, account_id: &str) -> ClientResult<Expenditure> {
        let payload = self.get(&["accounts", account_id, "expenditure"]).await?;
        decode_record(payload, "expenditure")
    }

    async fn create_card(&self, card: &Card) -> ClientResult<Card> {
        let payload = self.post(&["cards"], Some(card)).await?;
        decode_record(payload, "card")
    }

    async fn get_card(&self, pan: &str) -> ClientResult<Card> {
        let payload = self.get(&["cards", pan]).await?;
        decode_record(payload, "card")
    }

    async fn validate_card(&self, request: &ValidateCardRequest) -> ClientResult<CardValidation> {
        let payload = self.post(&["cards", "validate"], Some(request)).await?;
        decode_record(payload, "card validation")
    }

    async fn start_transaction(
        &self,
        request: &StartTransactionRequest,
    ) -> ClientResult<OperationResult> {
        tracing::debug!(
            idempotency_key = %request.idempotency_key,
            transaction_id = %request.transaction_id,
            "Starting transaction"
        );
        let payload = self.post(&["transactions", "start"], Some(request)).await?;
        decode_operation_result(payload)
    }

    async fn list_transactions_by_account(
        &self,
        account_id: &str,
    ) -> ClientResult<Vec<TransactionSummary>> {
        decode_transactions(self.get(&["accounts", account_id, "transactions"]).await?)
    }

    async fn get_transaction(&self, key: &IdempotencyKey) -> ClientResult<Transaction> {
        let payload = self.get(&["transactions", key.as_str()]).await?;
        decode_record(payload, "transaction")
    }

    async fn capture_transaction(&self, key: &IdempotencyKey) -> ClientResult<OperationResult> {
        let payload = self
            .post::<Value>(&["transactions", key.as_str(), "capture"], None)
            .await?;
        decode_operation_result(payload)
    }
}
