//! Per-category breakdowns of a ledger for the dashboard charts.

use crate::ledger::ExpenseEntry;

/// The labels of the four spending categories, in display order.
pub const CATEGORY_LABELS: [&str; 4] = ["Food", "Fuel", "Groceries", "Other"];

/// One amount per spending category.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    /// Money spent on food.
    pub food: f64,
    /// Money spent on fuel.
    pub fuel: f64,
    /// Money spent on groceries.
    pub groceries: f64,
    /// Money spent on anything else.
    pub other: f64,
}

impl CategoryTotals {
    /// Sum each category over `entries`.
    pub fn from_entries(entries: &[ExpenseEntry]) -> Self {
        entries
            .iter()
            .fold(Self::default(), |totals, entry| Self {
                food: totals.food + entry.food,
                fuel: totals.fuel + entry.fuel,
                groceries: totals.groceries + entry.groceries,
                other: totals.other + entry.other,
            })
    }

    /// Average each category over `entries`, or all zeros if there are none.
    pub fn mean_of(entries: &[ExpenseEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let totals = Self::from_entries(entries);
        let count = entries.len() as f64;

        Self {
            food: totals.food / count,
            fuel: totals.fuel / count,
            groceries: totals.groceries / count,
            other: totals.other / count,
        }
    }

    /// The amounts paired with their labels, in [CATEGORY_LABELS] order.
    pub fn labelled(&self) -> [(&'static str, f64); 4] {
        [
            (CATEGORY_LABELS[0], self.food),
            (CATEGORY_LABELS[1], self.fuel),
            (CATEGORY_LABELS[2], self.groceries),
            (CATEGORY_LABELS[3], self.other),
        ]
    }

    /// The sum of all four categories.
    pub fn total(&self) -> f64 {
        self.food + self.fuel + self.groceries + self.other
    }
}

/// Category amounts grouped under the salary of the account they belong to.
///
/// Each bar is the mean amount per entry for that category.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryGroup {
    /// The monthly salary this group is drawn for.
    pub salary: f64,
    /// The mean per-entry amount for each category.
    pub amounts: CategoryTotals,
}

/// Group the category amounts of `entries` by `salary`.
///
/// A ledger belongs to a single account, so there is one group.
pub fn salary_grouped_amounts(entries: &[ExpenseEntry], salary: f64) -> Vec<SalaryGroup> {
    if entries.is_empty() {
        return Vec::new();
    }

    vec![SalaryGroup {
        salary,
        amounts: CategoryTotals::mean_of(entries),
    }]
}
