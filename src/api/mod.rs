//! Resource clients for the payments gateway.

pub mod client;

pub use client::FinTechClient;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{
    Account, Card, CardValidation, CreateAccountRequest, Expenditure, IdempotencyKey,
    OperationResult, StartTransactionRequest, Transaction, TransactionSummary,
    ValidateCardRequest,
};

/// Operations the console drives. Every call is a single request with no
/// retry; failures come back unmodified.
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    async fn create_account(&self, request: &CreateAccountRequest) -> ClientResult<Account>;

    async fn list_accounts(&self) -> ClientResult<Vec<Account>>;

    async fn get_account(&self, account_id: &str) -> ClientResult<Account>;

    async fn get_expenditure(&self, account_id: &str) -> ClientResult<Expenditure>;

    async fn create_card(&self, card: &Card) -> ClientResult<Card>;

    async fn get_card(&self, pan: &str) -> ClientResult<Card>;

    async fn validate_card(&self, request: &ValidateCardRequest) -> ClientResult<CardValidation>;

    /// Submits a transaction. Resubmitting with the same key is how a retry
    /// is expressed; the server deduplicates on it.
    async fn start_transaction(
        &self,
        request: &StartTransactionRequest,
    ) -> ClientResult<OperationResult>;

    /// An empty or missing list is `Ok(vec![])`.
    async fn list_transactions_by_account(
        &self,
        account_id: &str,
    ) -> ClientResult<Vec<TransactionSummary>>;

    async fn get_transaction(&self, key: &IdempotencyKey) -> ClientResult<Transaction>;

    async fn capture_transaction(&self, key: &IdempotencyKey) -> ClientResult<OperationResult>;
}
