use crate::types::Amount;

/// Settings shared by every account a bank creates
#[derive(Debug, Clone, PartialEq)]
pub struct BankConfig {
    /// Branch code assigned to new accounts
    pub default_branch: String,
    /// Appended to the zero-padded ordinal of each account number
    pub number_suffix: String,
    pub daily_withdrawal_limit: Amount,
    /// Cap on deposits and withdrawals per account and day, unlimited when `None`
    pub max_daily_operations: Option<u32>,
    /// Cap on withdrawals per account and day, unlimited when `None`
    pub max_daily_withdrawals: Option<u32>,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            default_branch: "0001".to_string(),
            number_suffix: "X".to_string(),
            daily_withdrawal_limit: Amount::new(50000, 2),
            max_daily_operations: None,
            max_daily_withdrawals: None,
        }
    }
}
