use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::FinTechClient;
use crate::config::Config;
use crate::console::{Console, RefreshPolicy};
use crate::error::ClientResult;
use crate::forms::{CreateAccountForm, CreateCardForm, StartTransactionForm, ValidateCardForm};
use crate::models::IdempotencyKey;
use crate::presentation::{
    AccountListView, DetailContent, DetailView, Panel, RenderSink, RowAction, TransactionListView,
    ViewState,
};
use crate::transport::ApiTransport;

#[derive(Parser)]
#[command(name = "fintech-console")]
#[command(about = "Operator console for the payments API gateway", long_about = None)]
pub struct Cli {
    /// Overrides API_BASE_URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Account commands
    #[command(subcommand)]
    Accounts(AccountCommands),

    /// Card commands
    #[command(subcommand)]
    Cards(CardCommands),

    /// Transaction lifecycle commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Print and validate the resolved configuration
    Config,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create an account with an initial balance in minor units
    Create {
        #[arg(long)]
        account_id: String,
        #[arg(long, allow_hyphen_values = true)]
        initial_balance: String,
    },

    /// List all accounts
    List,

    /// Show one account
    Get {
        #[arg(value_name = "ACCOUNT_ID")]
        account_id: String,
    },

    /// Show money in and money out for an account
    Expenditure {
        #[arg(value_name = "ACCOUNT_ID")]
        account_id: String,
    },
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// Issue a card for an account
    Create {
        #[arg(long)]
        pan: String,
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
        #[arg(long)]
        account_id: String,
    },

    /// Show one card
    Get {
        #[arg(value_name = "PAN")]
        pan: String,
    },

    /// Check card details against the issuer
    Validate {
        #[arg(long)]
        pan: String,
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
    },
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Start (authorize) a transaction
    Start {
        /// Reuse a key to retry the same logical attempt. A new one is
        /// generated only when omitted.
        #[arg(long)]
        idempotency_key: Option<String>,
        #[arg(long)]
        transaction_id: String,
        #[arg(long)]
        card_pan: String,
        #[arg(long)]
        card_expiry: String,
        #[arg(long)]
        card_cvv: String,
        /// Amount in minor units
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// List transactions for an account
    List {
        #[arg(value_name = "ACCOUNT_ID")]
        account_id: String,
    },

    /// Show full detail of a transaction
    Show {
        #[arg(value_name = "IDEMPOTENCY_KEY")]
        idempotency_key: String,
    },

    /// Capture an authorized transaction, then show the refreshed list
    Capture {
        #[arg(value_name = "IDEMPOTENCY_KEY")]
        idempotency_key: String,
        /// Account whose list is re-fetched after the capture
        #[arg(long)]
        account_id: Option<String>,
    },
}

/// Prints view models to the terminal.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
    fn print_state(state: &ViewState) {
        match state {
            ViewState::Loading => tracing::debug!("{}", state.text()),
            ViewState::Success(text) => println!("✓ {}", text),
            ViewState::Error(text) => eprintln!("✗ {}", text),
        }
    }

    fn flush() {
        if let Err(e) = std::io::stdout().flush() {
            tracing::warn!(error = %e, "Failed to flush terminal output");
        }
    }
}

impl RenderSink for TerminalSink {
    fn render_panel(&mut self, _panel: Panel, state: &ViewState) {
        Self::print_state(state);
    }

    fn render_transactions(&mut self, view: &TransactionListView) {
        Self::print_state(&view.status);
        if !view.table_visible {
            return;
        }

        println!(
            "{:<20} {:<38} {:<14} {:<20} {}",
            "Transaction ID", "Idempotency Key", "Auth Result", "Auth Status", "Actions"
        );
        println!("{}", "-".repeat(120));
        for row in &view.rows {
            let actions: Vec<&str> = row.actions.iter().map(RowAction::label).collect();
            println!(
                "{:<20} {:<38} {:<14} {:<20} {}",
                row.transaction_id,
                row.idempotency_key,
                row.auth_result,
                row.auth_status,
                actions.join(" | ")
            );
        }
        Self::flush();
    }

    fn render_accounts(&mut self, view: &AccountListView) {
        Self::print_state(&view.status);
        if !view.table_visible {
            return;
        }

        println!("{:<24} {:>18} {:>18}", "Account ID", "Available", "Posted");
        println!("{}", "-".repeat(62));
        for row in &view.rows {
            println!(
                "{:<24} {:>18} {:>18}",
                row.account_id, row.available_balance, row.posted_balance
            );
        }
        Self::flush();
    }

    fn render_detail(&mut self, view: &DetailView) {
        if !view.open {
            return;
        }

        match &view.content {
            DetailContent::Loading => tracing::debug!("Loading transaction details..."),
            DetailContent::Loaded(fields) => {
                println!("Transaction details:");
                for field in fields {
                    println!("  {:<16} {}", format!("{}:", field.label), field.value);
                }
            }
            DetailContent::Failed(message) => eprintln!("✗ {}", message),
        }
    }
}

pub type TerminalConsole = Console<FinTechClient, TerminalSink>;

pub fn build_console(config: &Config) -> anyhow::Result<TerminalConsole> {
    let transport =
        ApiTransport::new(&config.api_base_url)?.with_body_logging(config.log_request_body);
    let client = Arc::new(FinTechClient::new(transport));

    Ok(Console::new(
        client,
        TerminalSink,
        RefreshPolicy::from_config(config),
    ))
}

fn finish<T>(result: ClientResult<T>) -> anyhow::Result<()> {
    result.map(|_| ()).map_err(anyhow::Error::from)
}

pub async fn handle_accounts(console: &TerminalConsole, command: AccountCommands) -> anyhow::Result<()> {
    match command {
        AccountCommands::Create {
            account_id,
            initial_balance,
        } => {
            let form = CreateAccountForm {
                account_id,
                initial_balance,
            };
            finish(console.create_account(form).await)
        }
        AccountCommands::List => finish(console.list_accounts().await),
        AccountCommands::Get { account_id } => finish(console.lookup_account(&account_id).await),
        AccountCommands::Expenditure { account_id } => {
            finish(console.account_expenditure(&account_id).await)
        }
    }
}

pub async fn handle_cards(console: &TerminalConsole, command: CardCommands) -> anyhow::Result<()> {
    match command {
        CardCommands::Create {
            pan,
            expiry,
            cvv,
            account_id,
        } => {
            let form = CreateCardForm {
                pan,
                expiry_date: expiry,
                cvv,
                account_id,
            };
            finish(console.create_card(form).await)
        }
        CardCommands::Get { pan } => finish(console.lookup_card(&pan).await),
        CardCommands::Validate { pan, expiry, cvv } => {
            let form = ValidateCardForm {
                pan,
                expiry_date: expiry,
                cvv,
            };
            finish(console.validate_card(form).await)
        }
    }
}

pub async fn handle_tx(console: &TerminalConsole, command: TxCommands) -> anyhow::Result<()> {
    match command {
        TxCommands::Start {
            idempotency_key,
            transaction_id,
            card_pan,
            card_expiry,
            card_cvv,
            amount,
            currency,
        } => {
            let idempotency_key = idempotency_key.unwrap_or_else(|| {
                let generated = Uuid::new_v4().to_string();
                println!("Idempotency key: {} (reuse it to retry this attempt)", generated);
                generated
            });
            let form = StartTransactionForm {
                idempotency_key,
                transaction_id,
                card_pan,
                card_expiry_date: card_expiry,
                card_cvv,
                amount,
                currency,
            };
            finish(console.start_transaction(form).await)
        }
        TxCommands::List { account_id } => match console.list_transactions(&account_id).await {
            Some(view) if view.status.is_error() => anyhow::bail!("{}", view.status.text()),
            _ => Ok(()),
        },
        TxCommands::Show { idempotency_key } => {
            finish(console.show_detail(&IdempotencyKey::new(idempotency_key)).await)
        }
        TxCommands::Capture {
            idempotency_key,
            account_id,
        } => {
            if let Some(account_id) = &account_id {
                console.list_transactions(account_id).await;
            }
            let result = console.capture(&IdempotencyKey::new(idempotency_key)).await;
            console.settle_refresh().await;
            finish(result)
        }
    }
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  API Base URL: {}", config.api_base_url);
    println!(
        "  Capture refresh delay (success): {} ms",
        config.capture_success_refresh.as_millis()
    );
    println!(
        "  Capture refresh delay (failure): {} ms",
        config.capture_failure_refresh.as_millis()
    );
    println!("  Log request body: {}", config.log_request_body);
    println!("  Log format: {:?}", config.log_format);

    ApiTransport::new(&config.api_base_url)?;

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}
