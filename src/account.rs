use log::{debug, warn};
use std::sync::Arc;

use crate::clock::Clock;
use crate::error::TellerError;
use crate::ledger::Ledger;
use crate::types::{round_cents, AccountNumber, Amount, Customer, EntryKind, LedgerEntry};

/// A customer's account: balance, withdrawal rules and the full history
///
/// The balance always equals the signed sum of the ledger's deposits and withdrawals and never
/// drops below zero. Every operation either passes all of its checks and then updates balance
/// and ledger together, or changes nothing.
#[derive(Debug)]
pub struct Account {
    number: AccountNumber,
    branch: String,
    customer: Arc<Customer>,
    balance: Amount,
    daily_limit: Amount,
    max_daily_operations: Option<u32>,
    max_daily_withdrawals: Option<u32>,
    ledger: Ledger,
}

impl Account {
    pub fn new(
        number: AccountNumber,
        branch: String,
        customer: Arc<Customer>,
        daily_limit: Amount,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            number,
            branch,
            customer,
            balance: Amount::ZERO,
            daily_limit: round_cents(daily_limit),
            max_daily_operations: None,
            max_daily_withdrawals: None,
            ledger: Ledger::new(clock),
        }
    }

    /// Limit the number of deposits and withdrawals per day
    pub fn with_max_daily_operations(mut self, limit: Option<u32>) -> Self {
        self.max_daily_operations = limit;
        self
    }

    /// Limit the number of withdrawals per day
    pub fn with_max_daily_withdrawals(mut self, limit: Option<u32>) -> Self {
        self.max_daily_withdrawals = limit;
        self
    }

    pub(crate) fn record_creation(&mut self) {
        self.ledger.append(EntryKind::Creation, Amount::ZERO, self.balance);
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn daily_limit(&self) -> Amount {
        self.daily_limit
    }

    fn validate_amount(&self, amount: Amount) -> Result<Amount, TellerError> {
        let amount = round_cents(amount);
        if amount <= Amount::ZERO {
            warn!("Rejected non-positive amount {} (account = {})", amount, self.number);
            return Err(TellerError::InvalidAmount { amount });
        }
        Ok(amount)
    }

    fn check_operation_count(&self) -> Result<(), TellerError> {
        if let Some(limit) = self.max_daily_operations {
            let today = self.ledger.today();
            if self.ledger.count_on(today) >= limit as usize {
                warn!("Daily operation cap reached (account = {})", self.number);
                return Err(TellerError::DailyOperationsExceeded { limit });
            }
        }
        Ok(())
    }

    fn check_withdrawal_count(&self) -> Result<(), TellerError> {
        if let Some(limit) = self.max_daily_withdrawals {
            let today = self.ledger.today();
            if self.ledger.count_kind_on(EntryKind::Withdraw, today) >= limit as usize {
                warn!("Daily withdrawal cap reached (account = {})", self.number);
                return Err(TellerError::DailyWithdrawalsExceeded { limit });
            }
        }
        Ok(())
    }

    /// Add money to the account and return the new balance
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount, TellerError> {
        let amount = self.validate_amount(amount)?;
        self.check_operation_count()?;

        let balance = self.balance.checked_add(amount).ok_or_else(|| {
            warn!("Rejected deposit of {} overflowing the balance (account = {})", amount, self.number);
            TellerError::AmountTooLarge { amount }
        })?;

        self.balance = round_cents(balance);
        self.ledger.append(EntryKind::Deposit, amount, self.balance);
        debug!(
            "Deposited {} (account = {}, balance = {})",
            amount, self.number, self.balance
        );
        Ok(self.balance)
    }

    /// Take money from the account and return the new balance
    ///
    /// Insufficient funds are reported before the daily limit, so a customer lacking money is
    /// never told about the limit instead.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, TellerError> {
        let amount = self.validate_amount(amount)?;

        if amount > self.balance {
            warn!(
                "Rejected withdrawal of {} exceeding balance {} (account = {})",
                amount, self.balance, self.number
            );
            return Err(TellerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }

        let already_withdrawn = self.withdrawn_today();
        let within_limit = already_withdrawn
            .checked_add(amount)
            .map_or(false, |total| total <= self.daily_limit);
        if !within_limit {
            warn!(
                "Rejected withdrawal of {} over the daily limit (account = {}, withdrawn today = {})",
                amount, self.number, already_withdrawn
            );
            return Err(TellerError::DailyLimitExceeded {
                limit: self.daily_limit,
                already_withdrawn,
                remaining: round_cents(self.daily_limit - already_withdrawn),
            });
        }

        self.check_withdrawal_count()?;
        self.check_operation_count()?;

        // amount <= balance, both non-negative
        let balance = self
            .balance
            .checked_sub(amount)
            .ok_or(TellerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            })?;
        self.balance = round_cents(balance);
        self.ledger.append(EntryKind::Withdraw, amount, self.balance);
        debug!(
            "Withdrew {} (account = {}, balance = {})",
            amount, self.number, self.balance
        );
        Ok(self.balance)
    }

    pub fn balance(&self) -> Amount {
        round_cents(self.balance)
    }

    /// Snapshot of the full history in chronological order
    pub fn statement(&self) -> Vec<LedgerEntry> {
        self.ledger.entries().collect()
    }

    /// Total withdrawn on the current day of the reference timezone
    pub fn withdrawn_today(&self) -> Amount {
        self.ledger.total_withdrawn_on(self.ledger.today())
    }

    /// How much may still be withdrawn today, regardless of the balance
    pub fn remaining_allowance_today(&self) -> Amount {
        round_cents(self.daily_limit - self.withdrawn_today()).max(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::clock::FixedClock;
    use chrono::{DateTime, FixedOffset};
    use rust_decimal_macros::dec;

    fn at(timestamp: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(timestamp).unwrap()
    }

    fn customer() -> Arc<Customer> {
        Arc::new(Customer {
            name: "Ana Souza".to_string(),
            address: "Rua das Flores, 10".to_string(),
            national_id: "123.456.789-00".to_string(),
            birth_date: "1990-01-31".to_string(),
        })
    }

    fn account_with_clock(clock: Arc<FixedClock>) -> Account {
        let mut account = Account::new(
            "0001-X".to_string(),
            "0001".to_string(),
            customer(),
            dec!(500.00),
            clock,
        );
        account.record_creation();
        account
    }

    fn account() -> Account {
        account_with_clock(Arc::new(FixedClock::new(at("2024-05-10T09:00:00-03:00"))))
    }

    fn ledger_sum(account: &Account) -> Amount {
        round_cents(account.statement().iter().map(|e| e.signed_amount()).sum())
    }

    #[test]
    fn new_account_is_empty() {
        let account = account();
        assert_eq!(account.balance(), Amount::ZERO);
        assert_eq!(account.statement().len(), 1);
        assert_eq!(account.statement()[0].kind, EntryKind::Creation);
        assert_eq!(account.customer().name, "Ana Souza");
        assert_eq!(account.branch(), "0001");
    }

    #[test]
    fn deposit_increases_balance() {
        let mut account = account();

        assert_eq!(account.deposit(dec!(150.00)).unwrap(), dec!(150.00));
        assert_eq!(account.deposit(dec!(0.5)).unwrap(), dec!(150.50));

        let last = account.statement().pop().unwrap();
        assert_eq!(last.kind, EntryKind::Deposit);
        assert_eq!(last.amount, dec!(0.50));
        assert_eq!(last.balance_after, dec!(150.50));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut account = account();

        assert_eq!(
            account.deposit(dec!(0)).unwrap_err(),
            TellerError::InvalidAmount { amount: dec!(0) }
        );
        account.deposit(dec!(-1)).unwrap_err();
        account.withdraw(dec!(0)).unwrap_err();
        account.withdraw(dec!(-10)).unwrap_err();
        // rounds to zero cents
        account.deposit(dec!(0.004)).unwrap_err();

        assert_eq!(account.balance(), Amount::ZERO);
        assert_eq!(account.statement().len(), 1);
    }

    #[test]
    fn withdraw_decreases_balance() {
        let mut account = account();
        account.deposit(dec!(100)).unwrap();

        assert_eq!(account.withdraw(dec!(40.25)).unwrap(), dec!(59.75));

        let last = account.statement().pop().unwrap();
        assert_eq!(last.kind, EntryKind::Withdraw);
        assert_eq!(last.amount, dec!(40.25));
        assert_eq!(last.balance_after, dec!(59.75));
    }

    #[test]
    fn insufficient_funds() {
        let mut account = account();
        account.deposit(dec!(10)).unwrap();

        assert_eq!(
            account.withdraw(dec!(10.01)).unwrap_err(),
            TellerError::InsufficientFunds {
                requested: dec!(10.01),
                available: dec!(10),
            }
        );
        // the whole balance can be withdrawn
        assert_eq!(account.withdraw(dec!(10)).unwrap(), Amount::ZERO);
    }

    #[test]
    fn daily_limit_reports_withdrawn_and_remaining() {
        let mut account = account();
        account.deposit(dec!(1000)).unwrap();
        account.withdraw(dec!(300.00)).unwrap();
        let before = account.statement();

        let err = account.withdraw(dec!(250.00)).unwrap_err();
        assert_eq!(
            err,
            TellerError::DailyLimitExceeded {
                limit: dec!(500.00),
                already_withdrawn: dec!(300.00),
                remaining: dec!(200.00),
            }
        );
        assert_eq!(account.balance(), dec!(700.00));
        assert_eq!(account.statement(), before);

        // exactly reaching the limit is fine
        assert_eq!(account.withdraw(dec!(200.00)).unwrap(), dec!(500.00));
        assert_eq!(account.remaining_allowance_today(), Amount::ZERO);
    }

    #[test]
    fn insufficient_funds_takes_precedence() {
        let mut account = account();
        account.deposit(dec!(400)).unwrap();
        account.withdraw(dec!(300)).unwrap();

        // exceeds both the balance (100) and the remaining allowance (200)
        let err = account.withdraw(dec!(450)).unwrap_err();
        assert!(matches!(err, TellerError::InsufficientFunds { .. }));
    }

    #[test]
    fn daily_limit_resets_on_the_next_day() {
        let clock = Arc::new(FixedClock::new(at("2024-05-10T22:00:00-03:00")));
        let mut account = account_with_clock(clock.clone());
        account.deposit(dec!(2000)).unwrap();
        account.withdraw(dec!(500)).unwrap();
        account.withdraw(dec!(0.01)).unwrap_err();

        // 03:30 UTC is 00:30 on the next day in the reference zone
        clock.set(at("2024-05-11T03:30:00Z"));
        assert_eq!(account.withdrawn_today(), Amount::ZERO);
        assert_eq!(account.withdraw(dec!(500)).unwrap(), dec!(1000));
    }

    #[test]
    fn daily_operation_cap() {
        let clock = Arc::new(FixedClock::new(at("2024-05-10T09:00:00-03:00")));
        let mut account = account_with_clock(clock.clone()).with_max_daily_operations(Some(2));

        account.deposit(dec!(10)).unwrap();
        account.withdraw(dec!(5)).unwrap();
        assert_eq!(
            account.deposit(dec!(1)).unwrap_err(),
            TellerError::DailyOperationsExceeded { limit: 2 }
        );
        assert_eq!(account.balance(), dec!(5));

        clock.set(at("2024-05-11T09:00:00-03:00"));
        assert_eq!(account.deposit(dec!(1)).unwrap(), dec!(6));
    }

    #[test]
    fn daily_withdrawal_cap() {
        let clock = Arc::new(FixedClock::new(at("2024-05-10T09:00:00-03:00")));
        let mut account = account_with_clock(clock.clone()).with_max_daily_withdrawals(Some(3));
        account.deposit(dec!(100)).unwrap();

        for _ in 0..3 {
            account.withdraw(dec!(10)).unwrap();
        }
        assert_eq!(
            account.withdraw(dec!(10)).unwrap_err(),
            TellerError::DailyWithdrawalsExceeded { limit: 3 }
        );
        // deposits are not capped
        assert_eq!(account.deposit(dec!(5)).unwrap(), dec!(75));
        assert_eq!(account.balance(), ledger_sum(&account));

        clock.set(at("2024-05-11T09:00:00-03:00"));
        assert_eq!(account.withdraw(dec!(10)).unwrap(), dec!(65));
    }

    #[test]
    fn withdrawal_cap_is_checked_after_daily_limit() {
        let mut account = account().with_max_daily_withdrawals(Some(1));
        account.deposit(dec!(1000)).unwrap();
        account.withdraw(dec!(400)).unwrap();

        let err = account.withdraw(dec!(200)).unwrap_err();
        assert!(matches!(err, TellerError::DailyLimitExceeded { .. }));
    }

    #[test]
    fn deposit_overflowing_balance_is_rejected() {
        let mut account = account();
        account.deposit(Amount::MAX).unwrap();
        let before = account.statement();

        assert_eq!(
            account.deposit(dec!(1)).unwrap_err(),
            TellerError::AmountTooLarge { amount: dec!(1) }
        );
        assert_eq!(account.balance(), Amount::MAX);
        assert_eq!(account.statement(), before);
    }

    #[test]
    fn huge_withdrawal_hits_daily_limit_without_overflow() {
        let mut account = account();
        account.deposit(dec!(1000)).unwrap();
        account.withdraw(dec!(300)).unwrap();
        account.deposit(Amount::MAX - dec!(700)).unwrap();

        // 300 already withdrawn plus the whole balance exceeds the representable range
        let err = account.withdraw(Amount::MAX).unwrap_err();
        assert_eq!(
            err,
            TellerError::DailyLimitExceeded {
                limit: dec!(500.00),
                already_withdrawn: dec!(300.00),
                remaining: dec!(200.00),
            }
        );
        assert_eq!(account.balance(), Amount::MAX);
    }

    #[test]
    fn balance_matches_ledger_after_every_operation() {
        let mut account = account();
        let amounts = [
            dec!(120.10),
            dec!(-33.33),
            dec!(0.01),
            dec!(-86.78),
            dec!(-1000),
            dec!(45.999),
            dec!(-46),
            dec!(0),
        ];

        for amount in amounts.iter().copied() {
            let _ = if amount.is_sign_negative() {
                account.withdraw(-amount)
            } else {
                account.deposit(amount)
            };
            assert_eq!(account.balance(), ledger_sum(&account));
            assert!(!account.balance().is_sign_negative());
        }
        assert_eq!(account.balance(), Amount::ZERO);
    }

    #[test]
    fn queries_are_idempotent() {
        let mut account = account();
        account.deposit(dec!(12.34)).unwrap();

        assert_eq!(account.balance(), account.balance());
        assert_eq!(account.statement(), account.statement());
    }

    #[test]
    fn rounding_is_half_up() {
        let mut account = account();
        assert_eq!(account.deposit(dec!(10.005)).unwrap(), dec!(10.01));
        assert_eq!(account.statement()[1].amount, dec!(10.01));
    }

    #[test]
    fn many_cent_deposits_do_not_drift() {
        let mut account = account();
        for _ in 0..1_000_000 {
            account.deposit(dec!(0.01)).unwrap();
        }
        assert_eq!(account.balance(), dec!(10000.00));
    }
}
