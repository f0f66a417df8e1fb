#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use fintech_console::models::{
    Account, Card, CardValidation, CreateAccountRequest, Expenditure, IdempotencyKey,
    OperationResult, StartTransactionRequest, Transaction, TransactionSummary,
    ValidateCardRequest,
};
use fintech_console::presentation::{
    AccountListView, DetailView, Panel, RenderSink, TransactionListView, ViewState,
};
use fintech_console::{ClientError, ClientResult, PaymentsApi};

/// Keeps every frame it is asked to render.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub panels: Vec<(Panel, ViewState)>,
    pub transactions: Vec<TransactionListView>,
    pub accounts: Vec<AccountListView>,
    pub details: Vec<DetailView>,
}

impl RecordingSink {
    pub fn panel_states(&self, panel: Panel) -> Vec<ViewState> {
        self.panels
            .iter()
            .filter(|(p, _)| *p == panel)
            .map(|(_, state)| state.clone())
            .collect()
    }
}

impl RenderSink for RecordingSink {
    fn render_panel(&mut self, panel: Panel, state: &ViewState) {
        self.panels.push((panel, state.clone()));
    }

    fn render_transactions(&mut self, view: &TransactionListView) {
        self.transactions.push(view.clone());
    }

    fn render_accounts(&mut self, view: &AccountListView) {
        self.accounts.push(view.clone());
    }

    fn render_detail(&mut self, view: &DetailView) {
        self.details.push(view.clone());
    }
}

#[derive(Default)]
struct FakeState {
    accounts: HashMap<String, Account>,
    transactions: Vec<Transaction>,
    transaction_accounts: HashMap<String, String>,
    card_accounts: HashMap<String, String>,
    list_calls: Vec<String>,
    start_calls: Vec<StartTransactionRequest>,
    list_delays: VecDeque<Duration>,
    fail_capture: Option<ClientError>,
}

/// In-memory gateway with just enough behaviour for console tests.
#[derive(Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, account_id: &str, balance: i64) -> Self {
        self.state.lock().unwrap().accounts.insert(
            account_id.to_string(),
            Account {
                account_id: account_id.to_string(),
                available_balance: balance,
                posted_balance: balance,
            },
        );
        self
    }

    pub fn with_card(self, pan: &str, account_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .card_accounts
            .insert(pan.to_string(), account_id.to_string());
        self
    }

    pub fn with_transaction(self, account_id: &str, key: &str, transaction_id: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.transactions.push(Transaction {
                idempotency_key: IdempotencyKey::new(key),
                transaction_id: transaction_id.to_string(),
                card_pan: "4111111111111111".to_string(),
                card_expiry_date: "12/30".to_string(),
                card_cvv: "123".to_string(),
                amount: 500,
                currency: "USD".to_string(),
                auth_code: "AC-1".to_string(),
                auth_result: "AUTHORISED".to_string(),
                auth_status: "OK".to_string(),
                captured: false,
            });
            state
                .transaction_accounts
                .insert(key.to_string(), account_id.to_string());
        }
        self
    }

    /// Queues artificial latency for upcoming list calls, in call order.
    pub fn delay_next_lists(&self, delays: &[Duration]) {
        self.state.lock().unwrap().list_delays.extend(delays.iter().copied());
    }

    pub fn fail_next_capture(&self, error: ClientError) {
        self.state.lock().unwrap().fail_capture = Some(error);
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().list_calls.clone()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    pub fn start_calls(&self) -> Vec<StartTransactionRequest> {
        self.state.lock().unwrap().start_calls.clone()
    }

    pub fn is_captured(&self, key: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .any(|t| t.idempotency_key.as_str() == key && t.captured)
    }
}

fn not_found(what: &str) -> ClientError {
    ClientError::Http {
        status: 404,
        body: format!("{what} not found"),
    }
}

#[async_trait]
impl PaymentsApi for FakeApi {
    async fn create_account(&self, request: &CreateAccountRequest) -> ClientResult<Account> {
        let account = Account {
            account_id: request.account_id.clone(),
            available_balance: request.initial_balance,
            posted_balance: request.initial_balance,
        };
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.account_id.clone(), account.clone());
        Ok(account)
    }

    async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        let mut accounts: Vec<Account> =
            self.state.lock().unwrap().accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        Ok(accounts)
    }

    async fn get_account(&self, account_id: &str) -> ClientResult<Account> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| not_found("Account"))
    }

    async fn get_expenditure(&self, account_id: &str) -> ClientResult<Expenditure> {
        Ok(Expenditure {
            account_id: account_id.to_string(),
            money_in: 0,
            money_out: 0,
        })
    }

    async fn create_card(&self, card: &Card) -> ClientResult<Card> {
        self.state
            .lock()
            .unwrap()
            .card_accounts
            .insert(card.pan.clone(), card.account_id.clone());
        Ok(card.clone())
    }

    async fn get_card(&self, pan: &str) -> ClientResult<Card> {
        let state = self.state.lock().unwrap();
        let account_id = state.card_accounts.get(pan).ok_or_else(|| not_found("Card"))?;
        Ok(Card {
            pan: pan.to_string(),
            expiry_date: "12/30".to_string(),
            cvv: "123".to_string(),
            account_id: account_id.clone(),
        })
    }

    async fn validate_card(&self, request: &ValidateCardRequest) -> ClientResult<CardValidation> {
        let known = self
            .state
            .lock()
            .unwrap()
            .card_accounts
            .contains_key(&request.pan);
        Ok(CardValidation {
            is_valid: known,
            message: String::new(),
        })
    }

    async fn start_transaction(
        &self,
        request: &StartTransactionRequest,
    ) -> ClientResult<OperationResult> {
        let mut state = self.state.lock().unwrap();
        state.start_calls.push(request.clone());

        let key = request.idempotency_key.as_str().to_string();
        if state.transaction_accounts.contains_key(&key) {
            return Ok(OperationResult {
                result: "ALREADY_EXISTS".to_string(),
            });
        }

        let account_id = state
            .card_accounts
            .get(&request.card_pan)
            .cloned()
            .unwrap_or_default();
        state.transactions.push(Transaction {
            idempotency_key: request.idempotency_key.clone(),
            transaction_id: request.transaction_id.clone(),
            card_pan: request.card_pan.clone(),
            card_expiry_date: request.card_expiry_date.clone(),
            card_cvv: request.card_cvv.clone(),
            amount: request.amount,
            currency: request.currency.clone(),
            auth_code: "AC-1".to_string(),
            auth_result: "AUTHORISED".to_string(),
            auth_status: "OK".to_string(),
            captured: false,
        });
        state.transaction_accounts.insert(key, account_id);

        Ok(OperationResult {
            result: "STARTED".to_string(),
        })
    }

    async fn list_transactions_by_account(
        &self,
        account_id: &str,
    ) -> ClientResult<Vec<TransactionSummary>> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.list_calls.push(account_id.to_string());
            state.list_delays.pop_front()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state.lock().unwrap();
        Ok(state
            .transactions
            .iter()
            .filter(|t| {
                state
                    .transaction_accounts
                    .get(t.idempotency_key.as_str())
                    .map(|owner| owner == account_id)
                    .unwrap_or(false)
            })
            .map(|t| TransactionSummary {
                idempotency_key: t.idempotency_key.clone(),
                transaction_id: t.transaction_id.clone(),
                account_id: account_id.to_string(),
                auth_result: t.auth_result.clone(),
                auth_status: if t.captured {
                    "CAPTURED".to_string()
                } else {
                    t.auth_status.clone()
                },
            })
            .collect())
    }

    async fn get_transaction(&self, key: &IdempotencyKey) -> ClientResult<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| &t.idempotency_key == key)
            .cloned()
            .ok_or_else(|| not_found("Transaction"))
    }

    async fn capture_transaction(&self, key: &IdempotencyKey) -> ClientResult<OperationResult> {
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.fail_capture.take() {
            return Err(error);
        }

        let transaction = state
            .transactions
            .iter_mut()
            .find(|t| &t.idempotency_key == key)
            .ok_or_else(|| not_found("Transaction"))?;
        transaction.captured = true;

        Ok(OperationResult {
            result: "CAPTURE_STARTED".to_string(),
        })
    }
}
