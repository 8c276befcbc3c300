#![forbid(unsafe_code)]

pub mod account;
pub mod bank;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod session;
pub mod statement;
pub mod types;

pub use account::Account;
pub use bank::Bank;
pub use config::BankConfig;
pub use error::TellerError;
pub use types::{Amount, Customer, EntryKind, LedgerEntry};
