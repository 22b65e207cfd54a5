//! Card components for the headline numbers and the spending advice.

use maud::{Markup, html};

use crate::{
    alert::Alert,
    analysis::{ExpenseSummary, SpendingSignal},
    html::format_currency,
};

const CARD_STYLE: &str = "p-4 rounded-lg shadow bg-white dark:bg-gray-800";

fn metric_card(id: &str, title: &str, value: &str) -> Markup {
    html! {
        div id=(id) class=(CARD_STYLE) {
            p class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p class="mt-1 text-2xl font-semibold text-gray-900 dark:text-white" { (value) }
        }
    }
}

/// Renders the total expenses, total savings and expense ratio side by side.
pub(super) fn summary_cards_view(summary: &ExpenseSummary) -> Markup {
    html! {
        section id="summary-cards" class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4" {
            (metric_card("total-expenses", "Total Expenses", &format_currency(summary.total_expenses)))
            (metric_card("total-savings", "Total Savings", &format_currency(summary.total_savings)))
            (metric_card("expense-ratio", "Expense Ratio", &format!("{:.2}%", summary.expense_ratio)))
        }
    }
}

/// Renders the advice for `signal`, or nothing for a neutral ratio.
pub(super) fn signal_view(signal: SpendingSignal) -> Markup {
    let alert = match (signal, signal.message()) {
        (SpendingSignal::Overspending, Some(message)) => Alert::warning(message, ""),
        (SpendingSignal::HealthySavings, Some(message)) => Alert::success(message, ""),
        _ => return html! {},
    };

    html! {
        div id="spending-signal" class="w-full" { (alert.into_html()) }
    }
}
