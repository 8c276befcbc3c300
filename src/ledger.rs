use chrono::NaiveDate;
use std::sync::Arc;

use crate::clock::{reference_zone, Clock};
use crate::types::{round_cents, Amount, EntryKind, LedgerEntry};

/// Append-only history of an account
///
/// Entries are kept in insertion order, which is also chronological order since every entry
/// is stamped by the ledger's clock at the time it is appended.
#[derive(Debug)]
pub struct Ledger {
    clock: Arc<dyn Clock>,
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Vec::new(),
        }
    }

    /// Record an entry stamped with the current instant
    /// No validation happens here, the caller is responsible for the business rules.
    pub fn append(&mut self, kind: EntryKind, amount: Amount, balance_after: Amount) {
        self.entries.push(LedgerEntry {
            timestamp: self.clock.now(),
            kind,
            amount: round_cents(amount),
            balance_after: round_cents(balance_after),
        });
    }

    /// The current calendar day in the reference timezone, as seen by this ledger's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn entries_on(&self, day: NaiveDate) -> impl Iterator<Item = &LedgerEntry> {
        let zone = reference_zone();
        self.entries
            .iter()
            .filter(move |e| e.timestamp.with_timezone(&zone).date_naive() == day)
    }

    /// Sum of all withdrawals that happened on the given day (reference timezone)
    pub fn total_withdrawn_on(&self, day: NaiveDate) -> Amount {
        let total: Amount = self
            .entries_on(day)
            .filter(|e| e.kind == EntryKind::Withdraw)
            .map(|e| e.amount)
            .sum();
        round_cents(total)
    }

    /// Number of balance-changing entries (deposits and withdrawals) on the given day
    pub fn count_on(&self, day: NaiveDate) -> usize {
        self.entries_on(day)
            .filter(|e| e.kind != EntryKind::Creation)
            .count()
    }

    /// Number of entries of the given kind on the given day
    pub fn count_kind_on(&self, kind: EntryKind, day: NaiveDate) -> usize {
        self.entries_on(day).filter(|e| e.kind == kind).count()
    }

    /// Iterate over copies of all entries in insertion order
    /// Call again to restart from the first entry.
    pub fn entries(&self) -> impl Iterator<Item = LedgerEntry> + '_ {
        self.entries.iter().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
