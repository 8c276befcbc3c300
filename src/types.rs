use chrono::{DateTime, FixedOffset};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub type AccountNumber = String;

pub type Amount = Decimal;

/// Round a monetary value to whole cents, halves are rounded up (away from zero)
pub fn round_cents(amount: Amount) -> Amount {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// The person owning an account
///
/// Treated as free-form data, neither the national ID nor the birth date are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub national_id: String,
    pub birth_date: String,
}

/// The kinds of events recorded in an account's ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Creation,
    Deposit,
    Withdraw,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntryKind::Creation => "Creation",
            EntryKind::Deposit => "Deposit",
            EntryKind::Withdraw => "Withdraw",
        };
        f.pad(name)
    }
}

/// A single immutable record in an account's history
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub kind: EntryKind,
    pub amount: Amount,
    pub balance_after: Amount,
}

impl LedgerEntry {
    /// The entry's effect on the balance, creation entries count as zero
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            EntryKind::Creation => Amount::ZERO,
            EntryKind::Deposit => self.amount,
            EntryKind::Withdraw => -self.amount,
        }
    }
}
