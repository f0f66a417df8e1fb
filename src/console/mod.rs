//! Operator console: drives the resource clients and renders their outcomes.

pub mod refresh;

pub use refresh::{RefreshPolicy, RefreshState};

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::PaymentsApi;
use crate::error::ClientResult;
use crate::forms::{CreateAccountForm, CreateCardForm, StartTransactionForm, ValidateCardForm};
use crate::models::{
    Account, Card, CardValidation, Expenditure, IdempotencyKey, OperationResult, Transaction,
};
use crate::presentation::{
    account_created_message, account_message, capture_failed_message, capture_succeeded_message,
    card_created_message, card_message, card_validation_message, expenditure_message,
    transaction_started_message, AccountListView, DetailView, MessageKind, Panel, RenderSink,
    RowAction, TransactionListView, ViewState,
};
use refresh::{RefreshPlan, RefreshSlot};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
struct ListState {
    latest_sequence: u64,
    selected_account: Option<String>,
    /// What the list panel shows now, capture notifications included.
    status: Option<ViewState>,
    /// Last status produced by a list call. Restored after a capture.
    listed: Option<ViewState>,
}

struct Inner<A, S> {
    api: Arc<A>,
    sink: Mutex<S>,
    policy: RefreshPolicy,
    list: Mutex<ListState>,
    refresh: Mutex<RefreshSlot>,
}

/// Result of a row action dispatched from the transaction table.
#[derive(Debug)]
pub enum ActionOutcome {
    Detail(ClientResult<Transaction>),
    Capture(ClientResult<OperationResult>),
}

/// Controller behind the console. Cheap to clone; clones share state.
pub struct Console<A, S> {
    inner: Arc<Inner<A, S>>,
}

impl<A, S> Clone for Console<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S> Console<A, S>
where
    A: PaymentsApi + 'static,
    S: RenderSink,
{
    pub fn new(api: Arc<A>, sink: S, policy: RefreshPolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                sink: Mutex::new(sink),
                policy,
                list: Mutex::new(ListState {
                    latest_sequence: 0,
                    selected_account: None,
                    status: None,
                    listed: None,
                }),
                refresh: Mutex::new(RefreshSlot::new()),
            }),
        }
    }

    /// Runs `f` against the sink, e.g. to inspect what was rendered.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut sink = lock(&self.inner.sink);
        f(&mut *sink)
    }

    pub fn selected_account(&self) -> Option<String> {
        lock(&self.inner.list).selected_account.clone()
    }

    pub fn refresh_state(&self) -> RefreshState {
        lock(&self.inner.refresh).state.clone()
    }

    pub fn has_pending_refresh(&self) -> bool {
        lock(&self.inner.refresh).is_pending()
    }

    fn render_panel(&self, panel: Panel, state: &ViewState) {
        lock(&self.inner.sink).render_panel(panel, state);
    }

    async fn run_panel<T>(
        &self,
        panel: Panel,
        result: impl std::future::Future<Output = ClientResult<T>>,
        describe: impl FnOnce(&T) -> String,
    ) -> ClientResult<T> {
        self.render_panel(panel, &ViewState::Loading);
        let result = result.await;
        if let Err(e) = &result {
            tracing::warn!(panel = ?panel, error = %e, "Operation failed");
        }
        self.render_panel(panel, &ViewState::from_result(&result, describe));
        result
    }

    pub async fn create_account(&self, form: CreateAccountForm) -> ClientResult<Account> {
        let api = Arc::clone(&self.inner.api);
        self.run_panel(
            Panel::CreateAccount,
            async move { api.create_account(&form.into_request()?).await },
            account_created_message,
        )
        .await
    }

    pub async fn list_accounts(&self) -> ClientResult<Vec<Account>> {
        lock(&self.inner.sink).render_accounts(&AccountListView::loading());
        let result = self.inner.api.list_accounts().await;
        lock(&self.inner.sink).render_accounts(&AccountListView::from_result(&result));
        result
    }

    pub async fn lookup_account(&self, account_id: &str) -> ClientResult<Account> {
        self.run_panel(
            Panel::AccountLookup,
            self.inner.api.get_account(account_id),
            account_message,
        )
        .await
    }

    pub async fn account_expenditure(&self, account_id: &str) -> ClientResult<Expenditure> {
        self.run_panel(
            Panel::AccountLookup,
            self.inner.api.get_expenditure(account_id),
            expenditure_message,
        )
        .await
    }

    pub async fn create_card(&self, form: CreateCardForm) -> ClientResult<Card> {
        let api = Arc::clone(&self.inner.api);
        self.run_panel(
            Panel::CreateCard,
            async move { api.create_card(&form.into_request()?).await },
            card_created_message,
        )
        .await
    }

    pub async fn lookup_card(&self, pan: &str) -> ClientResult<Card> {
        self.run_panel(Panel::CardLookup, self.inner.api.get_card(pan), card_message)
            .await
    }

    pub async fn validate_card(&self, form: ValidateCardForm) -> ClientResult<CardValidation> {
        let api = Arc::clone(&self.inner.api);
        self.run_panel(
            Panel::CardLookup,
            async move { api.validate_card(&form.into_request()?).await },
            card_validation_message,
        )
        .await
    }

    /// Starts a transaction. Submitting the same form again resends the same
    /// idempotency key unchanged.
    pub async fn start_transaction(&self, form: StartTransactionForm) -> ClientResult<OperationResult> {
        let api = Arc::clone(&self.inner.api);
        self.run_panel(
            Panel::StartTransaction,
            async move { api.start_transaction(&form.into_request()?).await },
            transaction_started_message,
        )
        .await
    }

    /// Lists transactions for `account_id` and makes it the selected account.
    ///
    /// Returns `None` when a later list call was issued before this one
    /// resolved; only the latest call renders.
    pub async fn list_transactions(&self, account_id: &str) -> Option<TransactionListView> {
        let sequence = {
            let mut list = lock(&self.inner.list);
            list.latest_sequence += 1;
            list.selected_account = Some(account_id.to_string());
            list.status = Some(ViewState::Loading);
            list.latest_sequence
        };
        lock(&self.inner.sink).render_transactions(&TransactionListView::loading());

        let result = self.inner.api.list_transactions_by_account(account_id).await;
        let view = TransactionListView::from_result(account_id, &result);

        let mut list = lock(&self.inner.list);
        if list.latest_sequence != sequence {
            tracing::debug!(
                account_id = %account_id,
                sequence,
                latest = list.latest_sequence,
                "Dropping superseded transaction list response"
            );
            return None;
        }
        list.status = Some(view.status.clone());
        list.listed = Some(view.status.clone());
        lock(&self.inner.sink).render_transactions(&view);
        Some(view)
    }

    /// Opens the detail view for `key`. A failure is shown inside the view,
    /// which stays open.
    pub async fn show_detail(&self, key: &IdempotencyKey) -> ClientResult<Transaction> {
        lock(&self.inner.sink).render_detail(&DetailView::loading(key));
        let result = self.inner.api.get_transaction(key).await;
        lock(&self.inner.sink).render_detail(&DetailView::from_result(key, &result));
        result
    }

    pub fn close_detail(&self) {
        lock(&self.inner.sink).render_detail(&DetailView::closed());
    }

    /// Captures `key` and schedules a re-fetch of the selected account's list.
    pub async fn capture(&self, key: &IdempotencyKey) -> ClientResult<OperationResult> {
        let result = self.inner.api.capture_transaction(key).await;

        let (state, plan) = match &result {
            Ok(outcome) => {
                let previous = lock(&self.inner.list)
                    .listed
                    .clone()
                    .unwrap_or(ViewState::Success(String::new()));
                (
                    ViewState::Success(capture_succeeded_message(key, outcome)),
                    RefreshPlan::after_success(&self.inner.policy, previous),
                )
            }
            Err(e) => {
                tracing::warn!(idempotency_key = %key, error = %e, "Capture failed");
                (
                    ViewState::Error(capture_failed_message(e)),
                    RefreshPlan::after_failure(&self.inner.policy),
                )
            }
        };

        lock(&self.inner.list).status = Some(state.clone());
        self.render_panel(Panel::ListTransactions, &state);
        self.schedule_refresh(state, plan);

        result
    }

    /// Routes a row action token to its operation.
    pub async fn dispatch(&self, action: &RowAction) -> ActionOutcome {
        tracing::debug!(
            idempotency_key = %action.key(),
            action = action.label(),
            "Dispatching row action"
        );
        match action {
            RowAction::GetDetail(key) => ActionOutcome::Detail(self.show_detail(key).await),
            RowAction::Capture(key) => ActionOutcome::Capture(self.capture(key).await),
        }
    }

    fn schedule_refresh(&self, shown: ViewState, plan: RefreshPlan) {
        let kind = shown.kind().unwrap_or(MessageKind::Success);
        let console = self.clone();

        let mut slot = lock(&self.inner.refresh);
        slot.state = RefreshState::Showing {
            message: shown.text().to_string(),
            kind,
        };
        slot.replace(tokio::spawn(async move {
            tokio::time::sleep(plan.delay).await;
            console.fire_refresh(plan.restore).await;
        }));
    }

    async fn fire_refresh(&self, restore: Option<ViewState>) {
        lock(&self.inner.refresh).state = RefreshState::Idle;

        if let Some(previous) = restore {
            lock(&self.inner.list).status = Some(previous.clone());
            self.render_panel(Panel::ListTransactions, &previous);
        }

        match self.selected_account() {
            Some(account_id) => {
                tracing::debug!(account_id = %account_id, "Refreshing transaction list after capture");
                self.list_transactions(&account_id).await;
            }
            None => tracing::debug!("No account selected; skipping post-capture refresh"),
        }
    }

    /// Waits for the pending refresh, if any, to finish.
    pub async fn wait_for_refresh(&self) {
        let pending = lock(&self.inner.refresh).take();
        if let Some(handle) = pending {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!(error = %e, "Refresh task failed");
                }
            }
        }
    }

    /// Like [`wait_for_refresh`](Self::wait_for_refresh), but cancels the
    /// timer instead when no account is selected, since it would fetch nothing.
    pub async fn settle_refresh(&self) {
        if self.selected_account().is_some() {
            self.wait_for_refresh().await;
        } else {
            tracing::debug!("No account selected; cancelling post-capture refresh");
            self.cancel_refresh();
        }
    }

    pub fn cancel_refresh(&self) {
        lock(&self.inner.refresh).cancel();
    }
}
