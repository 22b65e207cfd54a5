//! Totals, the expense ratio and the spending signal derived from a ledger.

use crate::ledger::ExpenseEntry;

/// An expense ratio above this percentage means the user is overspending.
pub const OVERSPENDING_THRESHOLD: f64 = 80.0;

/// An expense ratio below this percentage means the user is saving well.
pub const HEALTHY_SAVINGS_THRESHOLD: f64 = 20.0;

/// The headline numbers for a ledger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseSummary {
    /// The sum of food, fuel, groceries and other across all entries.
    pub total_expenses: f64,
    /// The sum of savings across all entries.
    pub total_savings: f64,
    /// The percentage of money recorded that was spent rather than saved.
    ///
    /// Zero when nothing has been spent or saved.
    pub expense_ratio: f64,
}

impl ExpenseSummary {
    /// Compute the totals and expense ratio for `entries`.
    pub fn from_entries(entries: &[ExpenseEntry]) -> Self {
        let total_expenses: f64 = entries.iter().map(ExpenseEntry::expenses).sum();
        let total_savings: f64 = entries.iter().map(|entry| entry.savings).sum();

        Self {
            total_expenses,
            total_savings,
            expense_ratio: expense_ratio(total_expenses, total_savings),
        }
    }

    /// The signal for this summary's expense ratio.
    pub fn signal(&self) -> SpendingSignal {
        SpendingSignal::from_ratio(self.expense_ratio)
    }
}

/// `100 * expenses / (expenses + savings)`, or zero if both are zero.
fn expense_ratio(total_expenses: f64, total_savings: f64) -> f64 {
    let total = total_expenses + total_savings;

    if total > 0.0 {
        total_expenses * 100.0 / total
    } else {
        0.0
    }
}

/// Advice for the user based on their expense ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendingSignal {
    /// More than 80% of money went to expenses.
    Overspending,
    /// Less than 20% of money went to expenses.
    HealthySavings,
    /// Anything from 20% to 80%, inclusive.
    Neutral,
}

impl SpendingSignal {
    /// Classify an expense ratio given as a percentage.
    ///
    /// The boundaries are strict, so exactly 80% and exactly 20% are neutral.
    pub fn from_ratio(expense_ratio: f64) -> Self {
        if expense_ratio > OVERSPENDING_THRESHOLD {
            Self::Overspending
        } else if expense_ratio < HEALTHY_SAVINGS_THRESHOLD {
            Self::HealthySavings
        } else {
            Self::Neutral
        }
    }

    /// The message to show the user, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Overspending => Some("You are spending too much! Try to reduce your expenses."),
            Self::HealthySavings => Some("You're doing great! Keep saving and investing."),
            Self::Neutral => None,
        }
    }
}
