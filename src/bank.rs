use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::account::Account;
use crate::clock::{Clock, SystemClock};
use crate::config::BankConfig;
use crate::error::TellerError;
use crate::types::{AccountNumber, Customer};

/// A RAM-backed registry of accounts, keyed by sequentially minted account numbers
///
/// Accounts are listed in the order they were created.
#[derive(Debug)]
pub struct Bank {
    config: BankConfig,
    clock: Arc<dyn Clock>,
    accounts: Vec<Account>,
    index: HashMap<AccountNumber, usize>,
    last_ordinal: u32,
}

impl Bank {
    pub fn new(config: BankConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: BankConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            accounts: Vec::new(),
            index: HashMap::new(),
            last_ordinal: 0,
        }
    }

    pub fn config(&self) -> &BankConfig {
        &self.config
    }

    fn mint_number(&mut self) -> AccountNumber {
        self.last_ordinal += 1;
        format!("{:04}-{}", self.last_ordinal, self.config.number_suffix)
    }

    /// Open a new, empty account for the customer on the default branch
    pub fn create_account_for(&mut self, customer: impl Into<Arc<Customer>>) -> &Account {
        let number = self.mint_number();
        let mut account = Account::new(
            number.clone(),
            self.config.default_branch.clone(),
            customer.into(),
            self.config.daily_withdrawal_limit,
            self.clock.clone(),
        )
        .with_max_daily_operations(self.config.max_daily_operations)
        .with_max_daily_withdrawals(self.config.max_daily_withdrawals);
        account.record_creation();

        info!(
            "Created account {} on branch {} for {}",
            number,
            account.branch(),
            account.customer().name
        );

        let position = self.accounts.len();
        self.accounts.push(account);
        self.index.insert(number, position);
        &self.accounts[position]
    }

    pub fn get_account(&self, number: &str) -> Option<&Account> {
        self.index.get(number).map(|&i| &self.accounts[i])
    }

    pub fn get_account_mut(&mut self, number: &str) -> Option<&mut Account> {
        let position = *self.index.get(number)?;
        self.accounts.get_mut(position)
    }

    /// Like `get_account_mut`, but a missing account is an error
    pub fn account_mut(&mut self, number: &str) -> Result<&mut Account, TellerError> {
        self.get_account_mut(number)
            .ok_or_else(|| TellerError::AccountNotFound(number.to_string()))
    }

    pub fn list_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new(BankConfig::default())
    }
}
