//! Derived metrics for a ledger. Everything here is a pure function of the
//! entries and is recomputed on every dashboard render.

mod breakdown;
mod summary;

pub use breakdown::{CATEGORY_LABELS, CategoryTotals, SalaryGroup, salary_grouped_amounts};
pub use summary::{ExpenseSummary, SpendingSignal};
