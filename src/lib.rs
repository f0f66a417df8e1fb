pub mod api;
pub mod cli;
pub mod config;
pub mod console;
pub mod error;
pub mod forms;
pub mod models;
pub mod presentation;
pub mod transport;
pub mod utils;
pub mod validation;

pub use api::{FinTechClient, PaymentsApi};
pub use console::Console;
pub use error::{ClientError, ClientResult};
