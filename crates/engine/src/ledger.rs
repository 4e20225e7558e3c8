//! Session-scoped income/expense bookkeeping.
//!
//! The ledger is a personal scratchpad: it never reads from or writes to the
//! contract, and its entries live only as long as the process. Removal goes
//! through stable ids rather than list positions, so a selection taken from
//! one rendered frame stays valid while the list changes.
use std::fmt;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Stable identifier for a ledger entry, assigned by the owning [`Ledger`]
/// from a monotonically increasing counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of the two independent sequences an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    #[must_use]
    pub fn other(self) -> EntryKind {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

/// A single user-entered record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub amount: MoneyCents,
    pub description: String,
}

/// Two insertion-ordered sequences of entries, one per [`EntryKind`].
#[derive(Debug, Default)]
pub struct Ledger {
    incomes: Vec<LedgerEntry>,
    expenses: Vec<LedgerEntry>,
    next_id: u64,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry to the `kind` sequence and returns its id.
    pub fn add(
        &mut self,
        amount: MoneyCents,
        description: impl Into<String>,
        kind: EntryKind,
    ) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.list_mut(kind).push(LedgerEntry {
            id,
            amount,
            description: description.into(),
        });
        id
    }

    /// Removes the entry with the given id from the `kind` sequence.
    ///
    /// Later entries shift left by one; the other sequence is untouched.
    /// An id not present in that sequence is a guarded error.
    pub fn remove(&mut self, id: EntryId, kind: EntryKind) -> ResultEngine<LedgerEntry> {
        let list = self.list_mut(kind);
        let position = list
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(EngineError::EntryNotFound(id))?;
        Ok(list.remove(position))
    }

    /// Entries of one kind, in insertion order.
    #[must_use]
    pub fn entries(&self, kind: EntryKind) -> &[LedgerEntry] {
        self.list(kind)
    }

    #[must_use]
    pub fn len(&self, kind: EntryKind) -> usize {
        self.list(kind).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.expenses.is_empty()
    }

    /// Saturating sum of the amounts of one kind.
    #[must_use]
    pub fn total(&self, kind: EntryKind) -> MoneyCents {
        self.list(kind)
            .iter()
            .fold(MoneyCents::ZERO, |acc, entry| {
                acc.saturating_add(entry.amount)
            })
    }

    fn list(&self, kind: EntryKind) -> &[LedgerEntry] {
        match kind {
            EntryKind::Income => &self.incomes,
            EntryKind::Expense => &self.expenses,
        }
    }

    fn list_mut(&mut self, kind: EntryKind) -> &mut Vec<LedgerEntry> {
        match kind {
            EntryKind::Income => &mut self.incomes,
            EntryKind::Expense => &mut self.expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(value: i64) -> MoneyCents {
        MoneyCents::new(value)
    }

    #[test]
    fn add_partitions_by_kind_in_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.add(cents(100), "a", EntryKind::Income);
        ledger.add(cents(200), "b", EntryKind::Expense);
        ledger.add(cents(300), "c", EntryKind::Income);

        let incomes: Vec<_> = ledger
            .entries(EntryKind::Income)
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(incomes, ["a", "c"]);
        assert_eq!(ledger.len(EntryKind::Expense), 1);
    }

    #[test]
    fn salary_then_coffee_then_remove_salary() {
        let mut ledger = Ledger::new();
        assert!(ledger.is_empty());

        let salary = ledger.add(cents(5000), "salary", EntryKind::Income);
        assert_eq!(ledger.entries(EntryKind::Income).len(), 1);
        assert_eq!(ledger.entries(EntryKind::Income)[0].amount, cents(5000));
        assert_eq!(ledger.entries(EntryKind::Income)[0].description, "salary");

        ledger.add(cents(1000), "coffee", EntryKind::Expense);
        assert_eq!(ledger.entries(EntryKind::Expense).len(), 1);
        assert_eq!(ledger.entries(EntryKind::Expense)[0].description, "coffee");

        let removed = ledger.remove(salary, EntryKind::Income).unwrap();
        assert_eq!(removed.description, "salary");
        assert!(ledger.entries(EntryKind::Income).is_empty());
        // The expense sequence is unaffected.
        assert_eq!(ledger.len(EntryKind::Expense), 1);
    }

    #[test]
    fn remove_shifts_later_entries_left() {
        let mut ledger = Ledger::new();
        ledger.add(cents(1), "first", EntryKind::Expense);
        let middle = ledger.add(cents(2), "second", EntryKind::Expense);
        ledger.add(cents(3), "third", EntryKind::Expense);

        ledger.remove(middle, EntryKind::Expense).unwrap();
        let rest: Vec<_> = ledger
            .entries(EntryKind::Expense)
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(rest, ["first", "third"]);
    }

    #[test]
    fn remove_unknown_id_is_guarded() {
        let mut ledger = Ledger::new();
        let id = ledger.add(cents(1), "only", EntryKind::Income);
        // Right id, wrong sequence.
        assert_eq!(
            ledger.remove(id, EntryKind::Expense),
            Err(EngineError::EntryNotFound(id))
        );
        // Stale id after removal.
        ledger.remove(id, EntryKind::Income).unwrap();
        assert_eq!(
            ledger.remove(id, EntryKind::Income),
            Err(EngineError::EntryNotFound(id))
        );
    }

    #[test]
    fn ids_stay_unique_across_removals() {
        let mut ledger = Ledger::new();
        let first = ledger.add(cents(1), "a", EntryKind::Income);
        ledger.remove(first, EntryKind::Income).unwrap();
        let second = ledger.add(cents(2), "b", EntryKind::Income);
        assert_ne!(first, second);
    }

    #[test]
    fn totals_sum_per_kind() {
        let mut ledger = Ledger::new();
        ledger.add(cents(5000), "salary", EntryKind::Income);
        ledger.add(cents(250), "tip", EntryKind::Income);
        ledger.add(cents(1000), "coffee", EntryKind::Expense);

        assert_eq!(ledger.total(EntryKind::Income), cents(5250));
        assert_eq!(ledger.total(EntryKind::Expense), cents(1000));
    }
}
