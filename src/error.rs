use thiserror::Error;

use crate::types::{AccountNumber, Amount};

/// Reasons for which the bank refuses an operation
///
/// None of these leave an account partially modified.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TellerError {
    #[error("amount must be greater than zero (got R${amount:.2})")]
    InvalidAmount { amount: Amount },

    #[error("insufficient funds: requested R${requested:.2}, available R${available:.2}")]
    InsufficientFunds { requested: Amount, available: Amount },

    #[error(
        "withdrawal would exceed the daily limit of R${limit:.2}: \
         already withdrawn R${already_withdrawn:.2} today, R${remaining:.2} remaining"
    )]
    DailyLimitExceeded {
        limit: Amount,
        already_withdrawn: Amount,
        remaining: Amount,
    },

    #[error("amount of R${amount:.2} is too large for this account")]
    AmountTooLarge { amount: Amount },

    #[error("daily limit of {limit} withdrawals reached, try again tomorrow")]
    DailyWithdrawalsExceeded { limit: u32 },

    #[error("daily limit of {limit} operations reached, try again tomorrow")]
    DailyOperationsExceeded { limit: u32 },

    #[error("account not found: {0}")]
    AccountNotFound(AccountNumber),
}
