//! Maps resource-client outcomes onto view models.
//!
//! Nothing here touches a concrete UI. Views are plain data handed to a
//! [`RenderSink`]; row actions carry the idempotency key as an opaque token
//! for whatever event layer binds them.

use crate::error::{ClientError, ClientResult};
use crate::models::{
    Account, Card, CardValidation, Expenditure, IdempotencyKey, OperationResult, Transaction,
    TransactionSummary,
};

pub const LOADING_TEXT: &str = "Making HTTP API call...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    CreateAccount,
    CreateCard,
    StartTransaction,
    ListTransactions,
    ListAccounts,
    AccountLookup,
    CardLookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

/// State of one result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Success(String),
    Error(String),
}

impl ViewState {
    /// Success text from `describe`, or the error's message verbatim.
    pub fn from_result<T>(result: &ClientResult<T>, describe: impl FnOnce(&T) -> String) -> Self {
        match result {
            Ok(value) => ViewState::Success(describe(value)),
            Err(e) => ViewState::Error(e.to_string()),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ViewState::Loading => LOADING_TEXT,
            ViewState::Success(text) | ViewState::Error(text) => text,
        }
    }

    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            ViewState::Loading => None,
            ViewState::Success(_) => Some(MessageKind::Success),
            ViewState::Error(_) => Some(MessageKind::Error),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error(_))
    }
}

pub fn account_created_message(account: &Account) -> String {
    format!(
        "Account Created:\nAccount ID: {}\nAvailable Balance: {}\nPosted Balance: {}",
        account.account_id, account.available_balance, account.posted_balance
    )
}

pub fn account_message(account: &Account) -> String {
    format!(
        "Account:\nAccount ID: {}\nAvailable Balance: {}\nPosted Balance: {}",
        account.account_id, account.available_balance, account.posted_balance
    )
}

pub fn expenditure_message(expenditure: &Expenditure) -> String {
    format!(
        "Expenditure:\nAccount ID: {}\nMoney In: {}\nMoney Out: {}",
        expenditure.account_id, expenditure.money_in, expenditure.money_out
    )
}

pub fn card_created_message(card: &Card) -> String {
    format!(
        "Card Created:\nPAN: {}\nExpiry Date: {}\nCVV: {}\nAccount ID: {}",
        card.pan, card.expiry_date, card.cvv, card.account_id
    )
}

pub fn card_message(card: &Card) -> String {
    format!(
        "Card:\nPAN: {}\nExpiry Date: {}\nAccount ID: {}",
        card.pan, card.expiry_date, card.account_id
    )
}

pub fn card_validation_message(validation: &CardValidation) -> String {
    let verdict = if validation.is_valid { "valid" } else { "invalid" };
    if validation.message.is_empty() {
        format!("Card is {verdict}")
    } else {
        format!("Card is {verdict}: {}", validation.message)
    }
}

pub fn transaction_started_message(result: &OperationResult) -> String {
    format!("Transaction Started:\nResult: {}", result.result)
}

pub fn capture_succeeded_message(key: &IdempotencyKey, result: &OperationResult) -> String {
    format!("Transaction {} captured successfully: {}", key, result.result)
}

pub fn capture_failed_message(error: &ClientError) -> String {
    format!("Failed to capture transaction: {}", error)
}

pub fn detail_error_message(error: &ClientError) -> String {
    format!("Error loading transaction details: {}", error)
}

/// Formats whole currency units with thousands separators, e.g. `$1,000`.
pub fn format_balance(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowAction {
    GetDetail(IdempotencyKey),
    Capture(IdempotencyKey),
}

impl RowAction {
    pub fn key(&self) -> &IdempotencyKey {
        match self {
            RowAction::GetDetail(key) | RowAction::Capture(key) => key,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::GetDetail(_) => "Get Details",
            RowAction::Capture(_) => "Capture",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub idempotency_key: IdempotencyKey,
    pub auth_result: String,
    pub auth_status: String,
    pub actions: Vec<RowAction>,
}

impl From<&TransactionSummary> for TransactionRow {
    fn from(summary: &TransactionSummary) -> Self {
        let key = summary.idempotency_key.clone();
        Self {
            transaction_id: summary.transaction_id.clone(),
            idempotency_key: key.clone(),
            auth_result: summary.auth_result.clone(),
            auth_status: summary.auth_status.clone(),
            actions: vec![RowAction::GetDetail(key.clone()), RowAction::Capture(key)],
        }
    }
}

/// One row per summary, each keyed by its own idempotency key.
pub fn transaction_rows(transactions: &[TransactionSummary]) -> Vec<TransactionRow> {
    transactions.iter().map(TransactionRow::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionListView {
    pub status: ViewState,
    pub table_visible: bool,
    pub rows: Vec<TransactionRow>,
}

impl TransactionListView {
    pub fn loading() -> Self {
        Self {
            status: ViewState::Loading,
            table_visible: false,
            rows: Vec::new(),
        }
    }

    pub fn from_result(account_id: &str, result: &ClientResult<Vec<TransactionSummary>>) -> Self {
        match result {
            Ok(transactions) if !transactions.is_empty() => Self {
                status: ViewState::Success(format!(
                    "Found {} transactions for account: {}",
                    transactions.len(),
                    account_id
                )),
                table_visible: true,
                rows: transaction_rows(transactions),
            },
            Ok(_) => Self {
                status: ViewState::Success(format!(
                    "No transactions found for account: {}",
                    account_id
                )),
                table_visible: false,
                rows: Vec::new(),
            },
            Err(e) => Self {
                status: ViewState::Error(e.to_string()),
                table_visible: false,
                rows: Vec::new(),
            },
        }
    }

    pub fn find_action(&self, action: &RowAction) -> Option<&TransactionRow> {
        self.rows.iter().find(|row| row.actions.contains(action))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub account_id: String,
    pub available_balance: String,
    pub posted_balance: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountListView {
    pub status: ViewState,
    pub table_visible: bool,
    pub rows: Vec<AccountRow>,
}

impl AccountListView {
    pub fn loading() -> Self {
        Self {
            status: ViewState::Loading,
            table_visible: false,
            rows: Vec::new(),
        }
    }

    pub fn from_result(result: &ClientResult<Vec<Account>>) -> Self {
        match result {
            Ok(accounts) if !accounts.is_empty() => Self {
                status: ViewState::Success(format!("Found {} accounts", accounts.len())),
                table_visible: true,
                rows: accounts
                    .iter()
                    .map(|account| AccountRow {
                        account_id: account.account_id.clone(),
                        available_balance: format_balance(account.available_balance),
                        posted_balance: format_balance(account.posted_balance),
                    })
                    .collect(),
            },
            Ok(_) => Self {
                status: ViewState::Success("No accounts found".to_string()),
                table_visible: false,
                rows: Vec::new(),
            },
            Err(e) => Self {
                status: ViewState::Error(e.to_string()),
                table_visible: false,
                rows: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: &'static str,
    pub value: String,
}

impl DetailField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

pub fn transaction_detail_fields(transaction: &Transaction) -> Vec<DetailField> {
    vec![
        DetailField::new("Idempotency Key", transaction.idempotency_key.as_str()),
        DetailField::new("Transaction ID", transaction.transaction_id.as_str()),
        DetailField::new("Card PAN", transaction.card_pan.as_str()),
        DetailField::new("Card Expiry", transaction.card_expiry_date.as_str()),
        DetailField::new(
            "Amount",
            format!("{} {}", transaction.amount, transaction.currency),
        ),
        DetailField::new("Auth Code", transaction.auth_code.as_str()),
        DetailField::new("Auth Result", transaction.auth_result.as_str()),
        DetailField::new("Auth Status", transaction.auth_status.as_str()),
        DetailField::new("Captured", if transaction.captured { "Yes" } else { "No" }),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailContent {
    Loading,
    Loaded(Vec<DetailField>),
    Failed(String),
}

/// The transaction detail modal. A failed fetch keeps it open with an
/// inline error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub open: bool,
    pub key: Option<IdempotencyKey>,
    pub content: DetailContent,
}

impl DetailView {
    pub fn closed() -> Self {
        Self {
            open: false,
            key: None,
            content: DetailContent::Loading,
        }
    }

    pub fn loading(key: &IdempotencyKey) -> Self {
        Self {
            open: true,
            key: Some(key.clone()),
            content: DetailContent::Loading,
        }
    }

    pub fn from_result(key: &IdempotencyKey, result: &ClientResult<Transaction>) -> Self {
        let content = match result {
            Ok(transaction) => DetailContent::Loaded(transaction_detail_fields(transaction)),
            Err(e) => DetailContent::Failed(detail_error_message(e)),
        };
        Self {
            open: true,
            key: Some(key.clone()),
            content,
        }
    }
}

/// Receives view models. Implementations decide how they are shown.
pub trait RenderSink: Send + 'static {
    fn render_panel(&mut self, panel: Panel, state: &ViewState);

    fn render_transactions(&mut self, view: &TransactionListView);

    fn render_accounts(&mut self, view: &AccountListView);

    fn render_detail(&mut self, view: &DetailView);
}
